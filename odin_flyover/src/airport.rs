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

//! IATA airport code resolution

use std::{collections::HashMap, io::Read, path::Path};
use serde::{Serialize,Deserialize};
use tracing::{warn,info};
use crate::errors::Result;

pub const UNKNOWN_COUNTRY: &str = "Unknown Country";

/// what we know about an airport
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct AirportInfo {
    pub iata: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

impl AirportInfo {
    /// "City, Country", or whichever of the two we have
    pub fn display_name (&self)->Option<String> {
        match (self.city.trim(), self.country.trim()) {
            ("", "") => None,
            (city, "") => Some( city.to_string()),
            ("", country) => Some( country.to_string()),
            (city, country) => Some( format!("{city}, {country}"))
        }
    }
}

/// the external lookup backend. Implementations can be local tables or remote services
pub trait AirportLookup: Send + Sync {
    fn lookup (&self, iata: &str)->Result<Option<AirportInfo>>;
}

/// in-memory airport index keyed by upper case IATA code
#[derive(Debug,Default)]
pub struct AirportTable {
    airports: HashMap<String,AirportInfo>
}

impl AirportTable {
    pub fn new()->Self { AirportTable { airports: HashMap::new() } }

    /// read CSV data with an `iata,city,country` header line
    pub fn from_reader<R: Read> (reader: R)->Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim( csv::Trim::All).from_reader( reader);
        let mut airports = HashMap::new();

        for rec in rdr.deserialize() {
            let info: AirportInfo = rec?;
            if !info.iata.is_empty() {
                airports.insert( info.iata.to_uppercase(), info);
            }
        }
        Ok( AirportTable { airports } )
    }

    pub fn from_path (path: impl AsRef<Path>)->Result<Self> {
        let file = std::fs::File::open( path.as_ref())?;
        Self::from_reader( file)
    }

    /// a missing or unreadable data file is not fatal - we just can't resolve airport names
    pub fn from_path_or_empty (path: impl AsRef<Path>)->Self {
        let path = path.as_ref();
        match Self::from_path( path) {
            Ok(table) => {
                info!("loaded {} airports from {:?}", table.len(), path);
                table
            }
            Err(e) => {
                warn!("failed to load airport data from {:?}: {}", path, e);
                AirportTable::new()
            }
        }
    }

    pub fn insert (&mut self, info: AirportInfo) {
        self.airports.insert( info.iata.to_uppercase(), info);
    }

    pub fn len (&self)->usize { self.airports.len() }
    pub fn is_empty (&self)->bool { self.airports.is_empty() }
}

impl AirportLookup for AirportTable {
    fn lookup (&self, iata: &str)->Result<Option<AirportInfo>> {
        Ok( self.airports.get( iata.to_uppercase().as_str()).cloned() )
    }
}

/// maps optional IATA codes to display names. This never fails - unknown codes or lookup errors
/// resolve to [UNKNOWN_COUNTRY]
pub struct AirportResolver {
    lookup: Box<dyn AirportLookup>
}

impl AirportResolver {
    pub fn new (lookup: impl AirportLookup + 'static)->Self {
        AirportResolver { lookup: Box::new(lookup) }
    }

    pub fn resolve_country (&self, iata: Option<&str>)->String {
        let iata = match iata.map( str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => return UNKNOWN_COUNTRY.to_string()
        };

        match self.lookup.lookup( iata) {
            Ok(Some(info)) => info.display_name().unwrap_or_else( || UNKNOWN_COUNTRY.to_string()),
            Ok(None) => UNKNOWN_COUNTRY.to_string(),
            Err(e) => {
                warn!("airport lookup for {iata} failed: {e}");
                UNKNOWN_COUNTRY.to_string()
            }
        }
    }
}
