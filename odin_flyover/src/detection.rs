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

use tracing::{debug,info,error};
use odin_common::datetime::EpochMillis;
use crate::{
    AircraftSnapshot, Detection, FlightSource, ReferenceLocation,
    airport::AirportResolver, proximity::{classify_direction, distance_km}, seen::SeenSet
};

pub const UNKNOWN_FLIGHT: &str = "Unknown Flight";
pub const UNKNOWN_AIRCRAFT: &str = "N/A";
pub const UNKNOWN_REGISTRATION: &str = "No Reg";
pub const UNKNOWN_AIRLINE: &str = "Unknown";
pub const UNKNOWN_IATA: &str = "?";

/// owns everything a detection cycle needs: the reference location, the flight source, the airport
/// resolver and the set of already reported aircraft
pub struct FlyoverMonitor {
    location: ReferenceLocation,
    source: Box<dyn FlightSource>,
    resolver: AirportResolver,
    seen: SeenSet,
}

impl FlyoverMonitor {
    pub fn new (location: ReferenceLocation, source: impl FlightSource + 'static, resolver: AirportResolver, seen: SeenSet)->Self {
        FlyoverMonitor { location, source: Box::new(source), resolver, seen }
    }

    pub fn location (&self)->&ReferenceLocation { &self.location }
    pub fn seen (&self)->&SeenSet { &self.seen }

    /// fetch the current snapshots and turn the ones that newly entered our radius into detections.
    /// A failed fetch is logged and results in no detections
    pub async fn run_cycle (&mut self, now: EpochMillis)->Vec<Detection> {
        let region = self.source.region_around( &self.location);

        match self.source.get_snapshots( &region).await {
            Ok(snapshots) => {
                debug!("retrieved {} aircraft snapshots", snapshots.len());
                self.detect( &snapshots, now)
            }
            Err(e) => {
                error!("failed to retrieve flight data: {e}");
                Vec::new()
            }
        }
    }

    /// filter and enrich a given list of snapshots. Detections are returned in snapshot order, and each
    /// returned aircraft is marked as seen so that it is not reported again while it stays in range
    pub fn detect (&mut self, snapshots: &[AircraftSnapshot], now: EpochMillis)->Vec<Detection> {
        let n_purged = self.seen.purge_stale( now);
        if n_purged > 0 { debug!("forgot {n_purged} aircraft that left the area") }

        let ref_pos = (self.location.latitude, self.location.longitude);
        let radius_km = self.location.radius_km();
        let mut detections = Vec::new();

        for snap in snapshots {
            let (Some(lat), Some(lon)) = (snap.latitude, snap.longitude) else { continue };

            let dist = distance_km( ref_pos, (lat,lon));
            if !(dist <= radius_km) { continue } // also skips NaN

            if self.seen.refresh( &snap.id, now) { continue }

            let detection = self.create_detection( snap, dist);
            info!("new aircraft in range: {} at {} km", detection.callsign, detection.distance);
            self.seen.mark_seen( &snap.id, now);
            detections.push( detection);
        }

        detections
    }

    fn create_detection (&self, snap: &AircraftSnapshot, dist: f64)->Detection {
        let callsign = non_empty( &snap.callsign)
            .or_else( || non_empty( &snap.number))
            .unwrap_or( UNKNOWN_FLIGHT);

        Detection {
            id: snap.id.clone(),
            callsign: callsign.to_string(),
            aircraft: or_default( &snap.aircraft_code, UNKNOWN_AIRCRAFT),
            registration: or_default( &snap.registration, UNKNOWN_REGISTRATION),
            airline: or_default( &snap.airline, UNKNOWN_AIRLINE),
            from_iata: or_default( &snap.origin, UNKNOWN_IATA),
            to_iata: or_default( &snap.destination, UNKNOWN_IATA),
            from_country: self.resolver.resolve_country( non_empty( &snap.origin)),
            to_country: self.resolver.resolve_country( non_empty( &snap.destination)),
            distance: dist.round() as u32,
            altitude: snap.altitude,
            speed: snap.ground_speed,
            direction: classify_direction( snap.heading).to_string(),
        }
    }
}

fn non_empty (s: &Option<String>)->Option<&str> {
    s.as_deref().map( str::trim).filter( |s| !s.is_empty())
}

fn or_default (s: &Option<String>, default: &str)->String {
    non_empty( s).unwrap_or( default).to_string()
}
