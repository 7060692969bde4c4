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

//! service configuration.
//!
//! The configuration can either be read from a RON file or assembled from environment variables.
//! String values in RON files can refer to environment variables as `${NAME}`, which keeps secrets such
//! as bot tokens or API keys out of config files

use std::{path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::meter};
use odin_common::{datetime::{deserialize_duration, millis}, strings::{env_expand_with, non_empty}};
use crate::{
    ReferenceLocation, DEFAULT_RADIUS_METERS,
    errors::{config_error,Result},
    fr24::Fr24Config, seen::SeenConfig, notifier::{TelegramConfig,SlackConfig},
    narrator::{GeminiConfig,NarratorConfig}
};

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct FlyoverConfig {
    pub location: ReferenceLocation,

    #[serde(default="default_check_interval", deserialize_with="deserialize_duration", skip_serializing)]
    pub check_interval: Duration,

    #[serde(default)]
    pub source: Fr24Config,

    #[serde(default)]
    pub seen: SeenConfig,

    /// CSV file with `iata,city,country` records
    #[serde(default)]
    pub airports: Option<PathBuf>,

    #[serde(default)]
    pub telegram: Option<TelegramConfig>,

    #[serde(default)]
    pub slack: Option<SlackConfig>,

    /// print notifications to stdout. This is also used if there is no other messenger
    #[serde(default)]
    pub console: bool,

    #[serde(default)]
    pub narrator: Option<NarratorConfig>,
}

fn default_check_interval()->Duration { millis(5000) }

impl FlyoverConfig {
    pub fn new (location: ReferenceLocation)->Self {
        FlyoverConfig {
            location,
            check_interval: default_check_interval(),
            source: Fr24Config::default(),
            seen: SeenConfig::default(),
            airports: None,
            telegram: None,
            slack: None,
            console: false,
            narrator: None,
        }
    }

    /// read a RON config file, expanding `${VAR}` references from the process environment
    pub fn from_ron_file (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string( path)
            .map_err( |e| config_error!("cannot read config file {:?}: {}", path, e))?;
        Self::from_ron_str_with( &contents, |name| std::env::var(name).ok())
    }

    pub fn from_ron_str_with<F> (s: &str, lookup: F)->Result<Self> where F: Fn(&str)->Option<String> {
        let expanded = env_expand_with( s, lookup);
        let config: FlyoverConfig = ron::from_str( &expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// assemble the configuration from the process environment
    pub fn from_env ()->Result<Self> {
        Self::from_vars( |name| std::env::var(name).ok())
    }

    /// assemble the configuration from variables provided by `lookup`. `LATITUDE` and `LONGITUDE` are
    /// required, all other variables are optional
    pub fn from_vars<F> (lookup: F)->Result<Self> where F: Fn(&str)->Option<String> {
        let var = |name: &str| lookup(name).and_then( |v| non_empty(&v));

        let latitude = parse_f64( "LATITUDE", var("LATITUDE"))?
            .ok_or_else( || config_error!("LATITUDE not set"))?;
        let longitude = parse_f64( "LONGITUDE", var("LONGITUDE"))?
            .ok_or_else( || config_error!("LONGITUDE not set"))?;
        let radius = parse_f64( "RADIUS_METERS", var("RADIUS_METERS"))?.unwrap_or( DEFAULT_RADIUS_METERS);

        let mut config = FlyoverConfig::new( ReferenceLocation::new( latitude, longitude, radius));

        if let Some(ms) = parse_f64( "CHECK_INTERVAL_MS", var("CHECK_INTERVAL_MS"))? {
            config.check_interval = millis( ms.max(0.0) as u64);
        }

        config.airports = var("AIRPORTS_FILE").map( PathBuf::from);

        if let (Some(bot_token), Some(chat_id)) = (var("TELEGRAM_BOT_TOKEN"), var("TELEGRAM_CHAT_ID")) {
            config.telegram = Some( TelegramConfig::new( bot_token, chat_id));
        }

        if let (Some(token), Some(channel_id)) = (var("SLACK_TOKEN"), var("SLACK_CHANNEL_ID")) {
            config.slack = Some( SlackConfig::new( token, channel_id));
        }

        if let (Some(api_key), Some(api_url)) = (var("GEMINI_API_KEY"), var("GEMINI_API_URL")) {
            let mut gemini = GeminiConfig::new( api_key, api_url);
            if let Some(prompt) = var("GEMINI_PROMPT") { gemini.prompt = prompt }
            config.narrator = Some( NarratorConfig::new( gemini));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate (&self)->Result<()> {
        let loc = &self.location;
        if !(loc.latitude.is_finite() && (-90.0..=90.0).contains( &loc.latitude)) {
            return Err( config_error!("invalid latitude {}", loc.latitude))
        }
        if !(loc.longitude.is_finite() && (-180.0..=180.0).contains( &loc.longitude)) {
            return Err( config_error!("invalid longitude {}", loc.longitude))
        }
        let radius = loc.radius.get::<meter>();
        if !(radius.is_finite() && radius > 0.0) {
            return Err( config_error!("invalid radius {}", radius))
        }
        if self.check_interval.is_zero() {
            return Err( config_error!("check interval must not be zero"))
        }
        Ok(())
    }

    /// true if telegram or slack notifications are configured
    pub fn has_remote_messenger (&self)->bool {
        self.telegram.is_some() || self.slack.is_some()
    }
}

fn parse_f64 (name: &str, val: Option<String>)->Result<Option<f64>> {
    match val {
        Some(s) => s.parse::<f64>()
            .map( Some)
            .map_err( |_| config_error!("{} is not a number: {}", name, s)),
        None => Ok(None)
    }
}
