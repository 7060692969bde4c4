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

//! geometric filter functions used by the detection cycle

use uom::si::length::kilometer;
use odin_common::{angle::Compass8, geo::GeoPoint};

pub const UNKNOWN_DIRECTION: &str = "unknown direction";

/// great circle distance in km between two (lat,lon) degree pairs. NaN coordinates propagate
pub fn distance_km (a: (f64,f64), b: (f64,f64))->f64 {
    let pa = GeoPoint::from_lon_lat_degrees( a.1, a.0);
    let pb = GeoPoint::from_lon_lat_degrees( b.1, b.0);
    pa.haversine_distance_to( &pb).get::<kilometer>()
}

/// label of the 8-point compass sector a heading falls into
pub fn classify_direction (heading: Option<f64>)->&'static str {
    match heading {
        Some(hdg) if hdg.is_finite() => Compass8::from_degrees(hdg).label(),
        _ => UNKNOWN_DIRECTION
    }
}
