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
#![allow(unused,uncommon_codepoints,non_snake_case)]

//! this module provides support for simple geometries on a spherical earth surface.
//! We use the [geo](https://docs.rs/geo/latest/geo/index.html) crate for the underlying point type and
//! the [uom](https://docs.rs/uom/latest/uom/) crate to keep lengths unit-safe. The new type pattern
//! keeps value semantics (normalized lon/lat degrees) explicit.

use std::fmt;
use serde::{Serialize,Deserialize};
use geo::Point;
use uom::si::f64::Length;
use uom::si::length::meter;

use crate::BoundingBox;
use crate::angle::{normalize_180, normalize_90, Angle360};
use crate::geo_constants::MEAN_EARTH_RADIUS;

/// a wrapper for geo::Point that uses geodetic degrees stored as f64 (x: longitude, y: latitude)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoPoint(Point);

impl GeoPoint {
    pub fn from_lon_lat_degrees (lon: f64, lat: f64) -> Self {
        GeoPoint( Point::new( normalize_180(lon), normalize_90(lat)))
    }

    pub fn longitude_degrees(&self) -> f64 { self.0.x() }
    pub fn latitude_degrees(&self) -> f64 { self.0.y() }

    /// great circle distance based on the haversine formula
    pub fn haversine_distance_to (&self, other: &GeoPoint)->Length {
        let φ1 = self.0.y().to_radians();
        let φ2 = other.0.y().to_radians();
        let Δφ = φ2 - φ1;
        let Δλ = (other.0.x() - self.0.x()).to_radians();

        let a = (Δφ / 2.0).sin().powi(2) + φ1.cos() * φ2.cos() * (Δλ / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2( (1.0 - a).sqrt());

        Length::new::<meter>( MEAN_EARTH_RADIUS * c)
    }

    /// initial bearing of the great circle from self to other
    pub fn bearing_to (&self, other: &GeoPoint)->Angle360 {
        let φ1 = self.0.y().to_radians();
        let φ2 = other.0.y().to_radians();
        let Δλ = (other.0.x() - self.0.x()).to_radians();

        let y = Δλ.sin() * φ2.cos();
        let x = φ1.cos() * φ2.sin() - φ1.sin() * φ2.cos() * Δλ.cos();
        Angle360::from_radians( y.atan2(x))
    }

    /// the point reached when travelling `dist` along the great circle with initial `bearing`
    pub fn destination (&self, bearing: Angle360, dist: Length)->GeoPoint {
        let δ = dist.get::<meter>() / MEAN_EARTH_RADIUS;
        let θ = bearing.radians();
        let φ1 = self.0.y().to_radians();
        let λ1 = self.0.x().to_radians();

        let φ2 = (φ1.sin() * δ.cos() + φ1.cos() * δ.sin() * θ.cos()).asin();
        let λ2 = λ1 + (θ.sin() * δ.sin() * φ1.cos()).atan2( δ.cos() - φ1.sin() * φ2.sin());

        GeoPoint::from_lon_lat_degrees( λ2.to_degrees(), φ2.to_degrees())
    }

    /// the bounding box of a square with half side length `radius` that is centered on self.
    /// The corners are computed as destinations along the SW and NE diagonals, i.e. the box encloses
    /// the circle of given radius around self
    pub fn bounds_around (&self, radius: Length)->BoundingBox<f64> {
        let diag = radius * std::f64::consts::SQRT_2;
        let sw = self.destination( Angle360::from_degrees(225.0), diag);
        let ne = self.destination( Angle360::from_degrees(45.0), diag);

        BoundingBox::new( sw.longitude_degrees(), sw.latitude_degrees(), ne.longitude_degrees(), ne.latitude_degrees())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.0.x(),self.0.y())
    }
}

/// serialized as `{"lon": .., "lat": ..}`
#[derive(Serialize,Deserialize)]
struct LonLat { lon: f64, lat: f64 }

impl Serialize for GeoPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: serde::Serializer {
        LonLat { lon: self.0.x(), lat: self.0.y() }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: serde::Deserializer<'de> {
        let ll = LonLat::deserialize(deserializer)?;
        Ok( GeoPoint::from_lon_lat_degrees( ll.lon, ll.lat) )
    }
}
