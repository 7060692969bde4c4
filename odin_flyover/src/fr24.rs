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

//! [FlightSource] implementation for the FlightRadar24 zone feed.
//!
//! The feed returns a JSON object in which each flight is an array value keyed by the FR24 flight id.
//! Other values (`full_count`, `version`, `stats` etc.) are metadata we ignore

use std::time::Duration;
use reqwest::Client;
use serde::{Serialize,Deserialize};
use serde_json::Value;
use async_trait::async_trait;
use tracing::{debug,warn};
use odin_common::datetime::{deserialize_duration, secs};
use crate::{AircraftSnapshot, FlightSource, Region, errors::{parse_error,Result}};

pub const FR24_FEED_URL: &str = "https://data-cloud.flightradar24.com/zones/fcgi/feed.js";
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// the fixed feed query parameters (everything besides the bounds)
const FEED_PARAMS: [(&str,&str);13] = [
    ("faa","1"), ("satellite","1"), ("mlat","1"), ("flarm","1"), ("adsb","1"), ("gnd","1"), ("air","1"),
    ("vehicles","1"), ("estimated","1"), ("maxage","14400"), ("gliders","1"), ("stats","1"), ("limit","5000")
];

// indices into the flight array
const LAT: usize = 1;
const LON: usize = 2;
const HEADING: usize = 3;
const ALTITUDE: usize = 4;
const GROUND_SPEED: usize = 5;
const AIRCRAFT_CODE: usize = 8;
const REGISTRATION: usize = 9;
const ORIGIN: usize = 11;
const DESTINATION: usize = 12;
const NUMBER: usize = 13;
const CALLSIGN: usize = 16;
const AIRLINE_ICAO: usize = 18;

const MIN_FLIGHT_FIELDS: usize = 17;

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct Fr24Config {
    pub feed_url: String,
    pub user_agent: String,
    #[serde(deserialize_with="deserialize_duration", skip_serializing)]
    pub timeout: Duration,
}

impl Default for Fr24Config {
    fn default()->Self {
        Fr24Config {
            feed_url: FR24_FEED_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: secs(10),
        }
    }
}

pub struct Fr24Source {
    config: Fr24Config,
    client: Client,
}

impl Fr24Source {
    pub fn new (config: Fr24Config)->Result<Self> {
        let client = Client::builder()
            .user_agent( config.user_agent.as_str())
            .timeout( config.timeout)
            .build()?;
        Ok( Fr24Source { config, client } )
    }
}

/// the bounds parameter value as the feed expects it: "north,south,west,east"
pub fn bounds_param (region: &Region)->String {
    format!("{:.6},{:.6},{:.6},{:.6}", region.north, region.south, region.west, region.east)
}

#[async_trait]
impl FlightSource for Fr24Source {
    async fn get_snapshots (&self, region: &Region)->Result<Vec<AircraftSnapshot>> {
        let bounds = bounds_param( region);
        let mut query: Vec<(&str,&str)> = Vec::with_capacity( FEED_PARAMS.len() + 1);
        query.push( ("bounds", bounds.as_str()) );
        query.extend_from_slice( &FEED_PARAMS);

        debug!("requesting FR24 feed for bounds {bounds}");
        let response: Value = self.client.get( &self.config.feed_url)
            .query( &query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_feed( &response)
    }
}

/// extract aircraft snapshots from a zone feed response
pub fn parse_feed (response: &Value)->Result<Vec<AircraftSnapshot>> {
    let Some(entries) = response.as_object() else {
        return Err( parse_error!("feed response is not a JSON object"))
    };

    let mut snapshots = Vec::new();
    for (id, val) in entries {
        if let Some(fields) = val.as_array() {
            if fields.len() >= MIN_FLIGHT_FIELDS {
                snapshots.push( parse_flight( id, fields));
            } else {
                warn!("ignoring incomplete flight record {id} with {} fields", fields.len());
            }
        }
    }
    Ok(snapshots)
}

fn parse_flight (id: &str, fields: &[Value])->AircraftSnapshot {
    let number = string_at( fields, NUMBER);
    let airline = match &number {
        Some(n) if n.chars().count() >= 2 => Some( n.chars().take(2).collect()),
        _ => string_at( fields, AIRLINE_ICAO)
    };

    AircraftSnapshot {
        id: id.to_string(),
        latitude: f64_at( fields, LAT),
        longitude: f64_at( fields, LON),
        altitude: i64_at( fields, ALTITUDE),
        ground_speed: i64_at( fields, GROUND_SPEED),
        heading: f64_at( fields, HEADING),
        registration: string_at( fields, REGISTRATION),
        number,
        callsign: string_at( fields, CALLSIGN),
        airline,
        origin: string_at( fields, ORIGIN),
        destination: string_at( fields, DESTINATION),
        aircraft_code: string_at( fields, AIRCRAFT_CODE),
    }
}

fn string_at (fields: &[Value], idx: usize)->Option<String> {
    match fields.get(idx)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "N/A" { None } else { Some(s.to_string()) }
        }
        Value::Number(n) => Some( n.to_string()),
        _ => None
    }
}

fn f64_at (fields: &[Value], idx: usize)->Option<f64> {
    match fields.get(idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None
    }
}

fn i64_at (fields: &[Value], idx: usize)->Option<i64> {
    f64_at( fields, idx).filter( |v| v.is_finite()).map( |v| v.round() as i64)
}
