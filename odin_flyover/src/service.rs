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

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};
use odin_common::datetime::EpochMillis;
use crate::{
    config::FlyoverConfig,
    detection::FlyoverMonitor,
    airport::{AirportResolver,AirportTable},
    seen::SeenSet,
    fr24::Fr24Source,
    notifier::{Notifier,Messenger,TelegramMessenger,SlackMessenger,ConsoleMessenger},
    narrator::{Narrator,NarratorHandle},
    scheduler::Cycle,
    errors::Result
};

/// the detection cycle with its consumers: detections go to the notifier and, if configured, are
/// queued for narration
pub struct FlyoverService {
    monitor: FlyoverMonitor,
    notifier: Notifier,
    narrator: Option<NarratorHandle>,
}

impl FlyoverService {
    pub fn new (monitor: FlyoverMonitor, notifier: Notifier, narrator: Option<NarratorHandle>)->Self {
        FlyoverService { monitor, notifier, narrator }
    }

    /// wire up the live service. The narrator worker (if any) is stopped by `cancel`
    pub fn from_config (config: &FlyoverConfig, cancel: CancellationToken)->Result<Self> {
        let source = Fr24Source::new( config.source.clone())?;

        let airports = match &config.airports {
            Some(path) => AirportTable::from_path_or_empty( path),
            None => {
                warn!("no airport data configured, origin and destination names will not be resolved");
                AirportTable::new()
            }
        };

        let seen = SeenSet::from_config( &config.seen);
        let monitor = FlyoverMonitor::new( config.location, source, AirportResolver::new( airports), seen);
        let notifier = Notifier::new( create_messengers( config)?);
        let narrator = match &config.narrator {
            Some(cfg) => Some( Narrator::spawn_from_config( cfg, cancel.clone())?),
            None => None
        };

        info!("monitoring {} with {} messenger(s), narration {}", config.location, notifier.num_messengers(),
              if narrator.is_some() { "enabled" } else { "disabled" });

        Ok( FlyoverService::new( monitor, notifier, narrator) )
    }

    pub fn monitor (&self)->&FlyoverMonitor { &self.monitor }

    /// run a single detection cycle for the given time. Returns the number of new detections.
    /// Detections are queued for narration before we dispatch notifications so that a slow messenger
    /// does not hold up narration
    pub async fn process (&mut self, now: EpochMillis)->usize {
        let detections = self.monitor.run_cycle( now).await;
        if detections.is_empty() { return 0 }

        if let Some(narrator) = &self.narrator {
            for d in &detections {
                if !narrator.enqueue( d.clone()) {
                    debug!("narrator not running, skipping narration of {}", d.callsign);
                }
            }
        }

        self.notifier.dispatch( &detections).await;

        detections.len()
    }

    /// wait for queued narrations to finish
    pub async fn shutdown (self)->Result<()> {
        if let Some(narrator) = self.narrator {
            let n = narrator.shutdown().await?;
            debug!("{n} detections narrated");
        }
        Ok(())
    }
}

#[async_trait]
impl Cycle for FlyoverService {
    async fn run_cycle (&mut self) {
        self.process( EpochMillis::now()).await;
    }
}

pub fn create_messengers (config: &FlyoverConfig)->Result<Vec<Box<dyn Messenger>>> {
    let mut messengers: Vec<Box<dyn Messenger>> = Vec::new();

    if let Some(cfg) = &config.telegram {
        messengers.push( Box::new( TelegramMessenger::new( cfg.clone())?));
    }
    if let Some(cfg) = &config.slack {
        messengers.push( Box::new( SlackMessenger::new( cfg.clone())?));
    }
    if config.console || messengers.is_empty() {
        messengers.push( Box::new( ConsoleMessenger{}));
    }

    Ok(messengers)
}
