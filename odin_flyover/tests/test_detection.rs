#![allow(unused)]

/// tests for the detection cycle
/// run with "cargo test --test test_detection -- --nocapture"

use std::sync::{Arc,Mutex};
use async_trait::async_trait;
use odin_common::datetime::{EpochMillis, minutes, hours};
use odin_flyover::{
    AircraftSnapshot, FlightSource, ReferenceLocation, Region,
    airport::{AirportInfo,AirportResolver,AirportTable},
    detection::FlyoverMonitor,
    errors::{OdinFlyoverError,Result},
    notifier::format_message,
    seen::SeenSet
};

/// returns whatever snapshots are currently set, or an error if `fail` is set
#[derive(Clone,Default)]
struct ScriptedSource {
    snapshots: Arc<Mutex<Vec<AircraftSnapshot>>>,
    fail: Arc<Mutex<bool>>,
}

impl ScriptedSource {
    fn set (&self, snapshots: Vec<AircraftSnapshot>) { *self.snapshots.lock().unwrap() = snapshots }
    fn set_failing (&self, fail: bool) { *self.fail.lock().unwrap() = fail }
}

#[async_trait]
impl FlightSource for ScriptedSource {
    async fn get_snapshots (&self, _region: &Region)->Result<Vec<AircraftSnapshot>> {
        if *self.fail.lock().unwrap() {
            Err( OdinFlyoverError::OpFailedError("feed not reachable".into()))
        } else {
            Ok( self.snapshots.lock().unwrap().clone())
        }
    }
}

fn airports ()->AirportTable {
    let mut table = AirportTable::new();
    table.insert( AirportInfo { iata: "IST".into(), city: "Istanbul".into(), country: "Turkey".into() });
    table.insert( AirportInfo { iata: "JFK".into(), city: "New York".into(), country: "United States".into() });
    table
}

fn location ()->ReferenceLocation { ReferenceLocation::new( 40.0, 29.05, 17000.0) }

fn monitor (source: ScriptedSource, seen: SeenSet)->FlyoverMonitor {
    FlyoverMonitor::new( location(), source, AirportResolver::new( airports()), seen)
}

fn a1 ()->AircraftSnapshot {
    AircraftSnapshot {
        latitude: Some(40.0),
        longitude: Some(29.0),
        altitude: Some(35000),
        ground_speed: Some(450),
        heading: Some(10.0),
        callsign: Some("TK123".into()),
        number: Some("TK123".into()),
        airline: Some("TK".into()),
        registration: Some("TC-JFV".into()),
        aircraft_code: Some("B738".into()),
        origin: Some("IST".into()),
        destination: Some("JFK".into()),
        ..AircraftSnapshot::new("a1")
    }
}

fn t0 ()->EpochMillis { EpochMillis::new( 1_700_000_000_000) }

#[tokio::test]
async fn test_scenario_a1 () {
    let source = ScriptedSource::default();
    source.set( vec![a1()]);
    let mut monitor = monitor( source.clone(), SeenSet::default());

    let detections = monitor.run_cycle( t0()).await;
    println!("{detections:#?}");
    assert_eq!( detections.len(), 1);

    let d = &detections[0];
    assert_eq!( d.id, "a1");
    assert_eq!( d.callsign, "TK123");
    assert_eq!( d.distance, 4);
    assert_eq!( d.direction, "North");
    assert_eq!( d.from_country, "Istanbul, Turkey");
    assert_eq!( d.to_country, "New York, United States");
    assert_eq!( d.aircraft, "B738");

    let msg = format_message( &detections);
    println!("{msg}");
    for s in ["TK123", "IST", "JFK", "4 km"] {
        assert!( msg.contains(s), "message does not contain {s}");
    }

    // same aircraft next cycle is not reported again
    let detections = monitor.run_cycle( t0().add_duration( minutes(1))).await;
    assert!( detections.is_empty());
    assert_eq!( monitor.seen().len(), 1);
}

#[tokio::test]
async fn test_continuously_observed () {
    let source = ScriptedSource::default();
    source.set( vec![a1()]);
    let mut monitor = monitor( source, SeenSet::new( 100, Some( hours(1))));

    let mut n_reported = 0;
    for i in 0..200 { // 200 cycles 1 min apart, longer than forget_after
        let now = t0().add_duration( minutes(i));
        n_reported += monitor.run_cycle( now).await.len();
    }
    assert_eq!( n_reported, 1);
}

#[test]
fn test_missing_coordinates () {
    let mut monitor = monitor( ScriptedSource::default(), SeenSet::default());

    let no_lat = AircraftSnapshot { latitude: None, ..a1() };
    let no_lon = AircraftSnapshot { longitude: None, id: "a2".into(), ..a1() };
    let detections = monitor.detect( &[no_lat, no_lon], t0());

    assert!( detections.is_empty());
    assert!( monitor.seen().is_empty());
}

#[test]
fn test_beyond_radius () {
    let mut monitor = monitor( ScriptedSource::default(), SeenSet::default());

    // about 21 km west of the reference point
    let far = AircraftSnapshot { longitude: Some(28.8), ..a1() };
    assert!( monitor.detect( &[far], t0()).is_empty());

    // the same aircraft once it got closer
    let near = AircraftSnapshot { longitude: Some(28.9), ..a1() };
    let detections = monitor.detect( &[near], t0().add_duration( minutes(1)));
    assert_eq!( detections.len(), 1);
    assert_eq!( detections[0].distance, 13);
}

#[tokio::test]
async fn test_fetch_failure () {
    let source = ScriptedSource::default();
    source.set( vec![a1()]);
    source.set_failing( true);
    let mut monitor = monitor( source.clone(), SeenSet::default());

    assert!( monitor.run_cycle( t0()).await.is_empty());
    assert!( monitor.seen().is_empty());

    // next cycle succeeds and reports the aircraft we could not see before
    source.set_failing( false);
    assert_eq!( monitor.run_cycle( t0().add_duration( minutes(1))).await.len(), 1);
}

#[test]
fn test_fallbacks () {
    let mut monitor = monitor( ScriptedSource::default(), SeenSet::default());

    let number_only = AircraftSnapshot {
        latitude: Some(40.0), longitude: Some(29.0), number: Some("PC2020".into()), origin: Some("xxx".into()),
        ..AircraftSnapshot::new("b1")
    };
    let bare = AircraftSnapshot {
        latitude: Some(40.01), longitude: Some(29.01), heading: Some(f64::NAN),
        ..AircraftSnapshot::new("b2")
    };

    let detections = monitor.detect( &[number_only, bare], t0());
    assert_eq!( detections.len(), 2);

    let d = &detections[0];
    assert_eq!( d.callsign, "PC2020");
    assert_eq!( d.from_iata, "xxx");
    assert_eq!( d.from_country, "Unknown Country");
    assert_eq!( d.direction, "unknown direction");

    let d = &detections[1];
    println!("{d:?}");
    assert_eq!( d.callsign, "Unknown Flight");
    assert_eq!( d.aircraft, "N/A");
    assert_eq!( d.registration, "No Reg");
    assert_eq!( d.airline, "Unknown");
    assert_eq!( d.from_iata, "?");
    assert_eq!( d.to_iata, "?");
    assert_eq!( d.to_country, "Unknown Country");
    assert_eq!( d.direction, "unknown direction");
    assert_eq!( d.altitude, None);
    assert_eq!( d.speed, None);

    let msg = format_message( &detections[1..]);
    assert!( msg.contains("Alt: ? ft | Speed: ? knots"));
}

#[test]
fn test_snapshot_order () {
    let mut monitor = monitor( ScriptedSource::default(), SeenSet::default());
    let ids = ["c3", "c1", "c2"];
    let snapshots: Vec<AircraftSnapshot> = ids.iter().map( |id| AircraftSnapshot { id: id.to_string(), ..a1() }).collect();

    let detections = monitor.detect( &snapshots, t0());
    let detected: Vec<&str> = detections.iter().map( |d| d.id.as_str()).collect();
    assert_eq!( detected, ids);
}

#[test]
fn test_renotify_after_absence () {
    let mut monitor = monitor( ScriptedSource::default(), SeenSet::new( 100, Some( hours(1))));

    assert_eq!( monitor.detect( &[a1()], t0()).len(), 1);
    assert_eq!( monitor.detect( &[a1()], t0().add_duration( minutes(30))).len(), 0);

    // gone for more than an hour
    assert!( monitor.detect( &[], t0().add_duration( minutes(100))).is_empty());
    assert!( monitor.seen().is_empty());

    assert_eq!( monitor.detect( &[a1()], t0().add_duration( minutes(110))).len(), 1);
}
