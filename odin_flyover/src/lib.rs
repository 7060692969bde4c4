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
#![allow(unused)]

//! odin_flyover watches the airspace around a fixed location and reports aircraft that come within a
//! configured radius. Each poll cycle retrieves aircraft snapshots for the region around the location
//! from a [FlightSource], filters out the ones that are outside the radius or have already been reported
//! ([seen::SeenSet]), turns the remaining ones into [Detection] records and hands them to the
//! [notifier::Notifier] and (optionally) the [narrator::Narrator]

use std::fmt;
use serde::{Serialize,Deserialize};
use async_trait::async_trait;
use uom::si::f64::Length;
use uom::si::length::{meter,kilometer};
use odin_common::{BoundingBox, geo::GeoPoint};

pub mod errors;
use errors::Result;

pub mod proximity;
pub mod airport;
pub mod seen;
pub mod detection;
pub mod notifier;
pub mod narrator;
pub mod scheduler;
pub mod fr24;
pub mod config;
pub mod service;

/// the fixed reference point we monitor, plus the radius (in meters) within which we report aircraft
#[derive(Deserialize,Serialize,Debug,Clone,Copy,PartialEq)]
pub struct ReferenceLocation {
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    #[serde(default="default_radius")]
    pub radius: Length, // serialized in meters
}

pub const DEFAULT_RADIUS_METERS: f64 = 17_000.0;

fn default_radius()->Length { Length::new::<meter>( DEFAULT_RADIUS_METERS) }

impl ReferenceLocation {
    pub fn new (latitude: f64, longitude: f64, radius_meters: f64)->Self {
        ReferenceLocation { latitude, longitude, radius: Length::new::<meter>(radius_meters) }
    }

    pub fn position (&self)->GeoPoint { GeoPoint::from_lon_lat_degrees( self.longitude, self.latitude) }

    pub fn radius_km (&self)->f64 { self.radius.get::<kilometer>() }
}

impl fmt::Display for ReferenceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "[{:.5},{:.5}] r={:.1}km", self.latitude, self.longitude, self.radius_km())
    }
}

/// the region we request aircraft for (degrees)
pub type Region = BoundingBox<f64>;

/// what a [FlightSource] reports for a single aircraft in one poll cycle. Sources are not required to
/// provide any field other than the `id`
#[derive(Debug,Clone,Default,PartialEq)]
pub struct AircraftSnapshot {
    pub id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<i64>,     // feet
    pub ground_speed: Option<i64>, // knots
    pub heading: Option<f64>,      // degrees
    pub registration: Option<String>,
    pub number: Option<String>,    // flight number
    pub callsign: Option<String>,
    pub airline: Option<String>,
    pub origin: Option<String>,      // IATA
    pub destination: Option<String>, // IATA
    pub aircraft_code: Option<String>,
}

impl AircraftSnapshot {
    pub fn new (id: impl ToString)->Self {
        AircraftSnapshot { id: id.to_string(), ..Default::default() }
    }

    pub fn position (&self)->Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some( GeoPoint::from_lon_lat_degrees( lon, lat)),
            _ => None
        }
    }
}

impl fmt::Display for AircraftSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Aircraft( id: {}", self.id)?;
        if let Some(cs) = &self.callsign { write!( f, ", cs: \"{cs}\"")?; }
        if let Some(pos) = self.position() { write!( f, ", pos: {pos}")?; }
        if let Some(alt) = self.altitude { write!( f, ", alt: {alt}")?; }
        if let Some(hdg) = self.heading { write!( f, ", hdg: {hdg:.0}")?; }
        write!( f, ")")
    }
}

/// the enriched record for an aircraft that newly entered our radius. This is what we report, and its
/// JSON serialization is what we pass to the summarizer
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="camelCase")]
pub struct Detection {
    pub id: String,
    pub callsign: String,
    pub aircraft: String,
    pub registration: String,
    pub airline: String,
    pub from_iata: String,
    pub to_iata: String,
    pub from_country: String,
    pub to_country: String,
    pub distance: u32, // rounded km
    pub altitude: Option<i64>,
    pub speed: Option<i64>,
    pub direction: String,
}

/// abstraction for where we get aircraft snapshots from. This is our dependency injection point for
/// live data sources and test mocks
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// the region to request in order to cover the radius around the location
    fn region_around (&self, location: &ReferenceLocation)->Region {
        location.position().bounds_around( location.radius)
    }

    /// current snapshots of all aircraft reported for the region
    async fn get_snapshots (&self, region: &Region)->Result<Vec<AircraftSnapshot>>;
}
