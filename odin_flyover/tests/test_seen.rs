#![allow(unused)]

/// tests for the bounded SeenSet
/// run with "cargo test --test test_seen -- --nocapture"

use odin_common::datetime::{EpochMillis, minutes, hours};
use odin_flyover::seen::{SeenSet,SeenConfig};

fn t0 ()->EpochMillis { EpochMillis::new( 1_700_000_000_000) }

#[test]
fn test_mark_and_refresh () {
    let mut seen = SeenSet::new( 10, None);
    assert!( seen.is_empty());
    assert!( !seen.has_seen("a"));
    assert!( !seen.refresh( "a", t0()));

    seen.mark_seen( "a", t0());
    seen.mark_seen( "a", t0()); // no duplicates
    assert!( seen.has_seen("a"));
    assert!( seen.refresh( "a", t0().add_duration( minutes(1))));
    assert_eq!( seen.len(), 1);

    // no time based forgetting
    assert_eq!( seen.purge_stale( t0().add_duration( hours(1000))), 0);
    assert!( seen.has_seen("a"));
}

#[test]
fn test_capacity_eviction () {
    let mut seen = SeenSet::new( 3, None);
    for id in ["a", "b", "c", "d", "e"] {
        seen.mark_seen( id, t0());
    }
    println!("{seen:?}");

    assert_eq!( seen.len(), 3);
    assert!( !seen.has_seen("a"));
    assert!( !seen.has_seen("b"));
    assert!( seen.has_seen("c") && seen.has_seen("d") && seen.has_seen("e"));
}

#[test]
fn test_forget_after () {
    let mut seen = SeenSet::new( 100, Some( hours(1)));
    seen.mark_seen( "a", t0());
    seen.mark_seen( "b", t0());

    // b is still observed, a is not
    seen.refresh( "b", t0().add_duration( minutes(50)));
    assert_eq!( seen.purge_stale( t0().add_duration( minutes(59))), 0);
    assert_eq!( seen.purge_stale( t0().add_duration( minutes(61))), 1);

    assert!( !seen.has_seen("a"));
    assert!( seen.has_seen("b"));
}

#[test]
fn test_reinsert_after_purge () {
    let mut seen = SeenSet::new( 2, Some( hours(1)));
    seen.mark_seen( "a", t0());
    seen.purge_stale( t0().add_duration( hours(2)));
    assert!( seen.is_empty());

    let t1 = t0().add_duration( hours(3));
    seen.mark_seen( "a", t1);
    seen.mark_seen( "b", t1);
    seen.mark_seen( "c", t1); // evicts the re-inserted "a"

    assert_eq!( seen.len(), 2);
    assert!( !seen.has_seen("a"));
    assert!( seen.has_seen("b") && seen.has_seen("c"));
}

#[test]
fn test_default_config () {
    let config = SeenConfig::default();
    assert_eq!( config.max_entries, 10_000);
    assert_eq!( config.forget_after, Some( hours(1)));

    let seen = SeenSet::default();
    assert_eq!( seen.max_entries(), 10_000);
}
