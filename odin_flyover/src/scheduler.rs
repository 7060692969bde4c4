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

use std::time::Duration;
use async_trait::async_trait;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info};

/// something that is executed periodically. Cycles have to handle their own errors
#[async_trait]
pub trait Cycle: Send {
    async fn run_cycle (&mut self);
}

/// runs a [Cycle] at fixed intervals. Cycles are awaited within the same task, which means a slow cycle
/// delays the next one but never overlaps with it. Ticks that are missed because of a slow cycle are skipped
pub struct Scheduler {
    check_interval: Duration
}

impl Scheduler {
    pub fn new (check_interval: Duration)->Self {
        Scheduler { check_interval }
    }

    pub fn check_interval (&self)->Duration { self.check_interval }

    /// run the first cycle immediately and then every `check_interval` until `cancel` is triggered.
    /// Returns the number of completed cycles
    pub async fn run<C: Cycle + ?Sized> (&self, cycle: &mut C, cancel: CancellationToken)->usize {
        let mut ticker = interval( self.check_interval);
        ticker.set_missed_tick_behavior( MissedTickBehavior::Skip);
        let mut n_cycles = 0;

        info!("starting flyover checks every {:?}", self.check_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {} // first tick completes immediately
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = cycle.run_cycle() => { n_cycles += 1 }
            }
        }

        debug!("scheduler terminated after {n_cycles} cycles");
        n_cycles
    }

    pub async fn run_once<C: Cycle + ?Sized> (&self, cycle: &mut C) {
        cycle.run_cycle().await
    }
}
