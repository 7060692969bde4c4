/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! the set of aircraft ids we already reported.
//!
//! Entries are kept while the aircraft is observed in range. Once an aircraft has not been observed
//! in range for `forget_after` it is dropped, which means it gets reported again should it return.
//! The set is bounded - inserting more than `max_entries` ids evicts the oldest inserted ones first

use std::{collections::{HashMap,VecDeque}, time::Duration};
use serde::{Serialize,Deserialize};
use odin_common::datetime::{EpochMillis, deserialize_optional_duration, hours};

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct SeenConfig {
    pub max_entries: usize,
    #[serde(deserialize_with = "deserialize_optional_duration", skip_serializing)]
    pub forget_after: Option<Duration>,
}

impl Default for SeenConfig {
    fn default()->Self {
        SeenConfig { max_entries: 10_000, forget_after: Some( hours(1)) }
    }
}

#[derive(Debug,Clone,Copy)]
struct SeenEntry {
    seq: u64, // insertion sequence number so that re-inserted ids don't get evicted by stale queue entries
    last_seen: EpochMillis,
}

#[derive(Debug)]
pub struct SeenSet {
    max_entries: usize,
    forget_after: Option<Duration>,
    entries: HashMap<String,SeenEntry>,
    order: VecDeque<(u64,String)>,
    next_seq: u64,
}

impl SeenSet {
    pub fn new (max_entries: usize, forget_after: Option<Duration>)->Self {
        SeenSet {
            max_entries: max_entries.max(1),
            forget_after,
            entries: HashMap::new(),
            order: VecDeque::new(),
            next_seq: 0
        }
    }

    pub fn from_config (config: &SeenConfig)->Self {
        Self::new( config.max_entries, config.forget_after)
    }

    pub fn has_seen (&self, id: &str)->bool {
        self.entries.contains_key( id)
    }

    /// remember `id` as reported. Marking an already known id just refreshes it
    pub fn mark_seen (&mut self, id: impl ToString, now: EpochMillis) {
        let id = id.to_string();
        if let Some(e) = self.entries.get_mut( &id) {
            e.last_seen = now;
            return
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert( id.clone(), SeenEntry { seq, last_seen: now });
        self.order.push_back( (seq,id) );

        while self.entries.len() > self.max_entries {
            if !self.evict_oldest() { break }
        }
    }

    /// update the last in-range observation time of a known id. Returns false if id is not known
    pub fn refresh (&mut self, id: &str, now: EpochMillis)->bool {
        if let Some(e) = self.entries.get_mut( id) {
            e.last_seen = now;
            true
        } else {
            false
        }
    }

    /// drop all ids that have not been observed in range within `forget_after`. Returns number of dropped ids
    pub fn purge_stale (&mut self, now: EpochMillis)->usize {
        let Some(forget_after) = self.forget_after else { return 0 };

        let len = self.entries.len();
        self.entries.retain( |_,e| now.duration_since( e.last_seen) <= forget_after);
        let n_purged = len - self.entries.len();

        if n_purged > 0 {
            let entries = &self.entries;
            self.order.retain( |(seq,id)| entries.get( id).map( |e| e.seq == *seq).unwrap_or(false));
        }
        n_purged
    }

    pub fn len (&self)->usize { self.entries.len() }
    pub fn is_empty (&self)->bool { self.entries.is_empty() }
    pub fn max_entries (&self)->usize { self.max_entries }
    pub fn forget_after (&self)->Option<Duration> { self.forget_after }

    fn evict_oldest (&mut self)->bool {
        while let Some((seq,id)) = self.order.pop_front() {
            if self.entries.get( &id).map( |e| e.seq == seq).unwrap_or(false) {
                self.entries.remove( &id);
                return true
            }
        }
        false
    }
}

impl Default for SeenSet {
    fn default()->Self { Self::from_config( &SeenConfig::default()) }
}
