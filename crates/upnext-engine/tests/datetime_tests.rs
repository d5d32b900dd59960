//! Tests for DATE / DATE-TIME resolution, zone lookup and DST policies.

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use upnext_engine::dst::{localize, DstPolicy};
use upnext_engine::{lookup_zone, zone_from_name, DateTimeResolver, FeedError};

fn pacific_resolver() -> DateTimeResolver {
    DateTimeResolver::new(Tz::America__Los_Angeles, DstPolicy::default())
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Value forms
// ---------------------------------------------------------------------------

#[test]
fn utc_value_is_converted_to_local_zone() {
    let instant = pacific_resolver().resolve("20251215T170000Z", None).unwrap();
    assert_eq!(instant.timezone(), Tz::America__Los_Angeles);
    assert_eq!(instant, utc(2025, 12, 15, 17, 0));
}

#[test]
fn floating_value_is_local_wall_clock() {
    let instant = pacific_resolver().resolve("20251215T090000", None).unwrap();
    assert_eq!(instant, utc(2025, 12, 15, 17, 0));
}

#[test]
fn date_value_is_local_midnight() {
    let instant = pacific_resolver().resolve("20251216", None).unwrap();
    assert_eq!(instant, utc(2025, 12, 16, 8, 0));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let instant = pacific_resolver().resolve("  20251215T170000Z ", None).unwrap();
    assert_eq!(instant, utc(2025, 12, 15, 17, 0));
}

#[test]
fn tzid_value_uses_named_zone() {
    let instant = pacific_resolver()
        .resolve("20251215T090000", Some("Europe/Berlin"))
        .unwrap();
    assert_eq!(instant, utc(2025, 12, 15, 8, 0));
}

#[test]
fn tzid_with_utc_value_still_resolves() {
    let instant = pacific_resolver()
        .resolve("20251215T090000Z", Some("Europe/Berlin"))
        .unwrap();
    assert_eq!(instant, utc(2025, 12, 15, 9, 0));
}

#[test]
fn unknown_tzid_falls_back_to_floating() {
    let instant = pacific_resolver()
        .resolve("20251215T090000", Some("Mars/Olympus_Mons"))
        .unwrap();
    assert_eq!(instant, utc(2025, 12, 15, 17, 0));
}

#[test]
fn malformed_values_are_invalid() {
    let mut resolver = pacific_resolver();
    for raw in ["", "2025-12-15", "20251215T0900", "20251315T090000", "tomorrow"] {
        assert_eq!(
            resolver.resolve(raw, None),
            Err(FeedError::InvalidDate(raw.to_string())),
            "{raw:?} should not resolve"
        );
    }
}

#[test]
fn resolve_zoned_reports_the_recurrence_zone() {
    let mut resolver = pacific_resolver();

    let (_, zone) = resolver
        .resolve_zoned("20251215T090000", Some("Europe/Berlin"))
        .unwrap();
    assert_eq!(zone, Tz::Europe__Berlin);

    let (_, zone) = resolver.resolve_zoned("20251215T090000Z", None).unwrap();
    assert_eq!(zone, Tz::America__Los_Angeles);

    let (_, zone) = resolver.resolve_zoned("20251215T090000", None).unwrap();
    assert_eq!(zone, Tz::America__Los_Angeles);
}

// ---------------------------------------------------------------------------
// Zone lookup
// ---------------------------------------------------------------------------

#[test]
fn iana_names_resolve() {
    assert_eq!(lookup_zone("America/New_York"), Some(Tz::America__New_York));
    assert_eq!(lookup_zone("UTC"), Some(Tz::UTC));
}

#[test]
fn windows_names_resolve() {
    assert_eq!(
        lookup_zone("Pacific Standard Time"),
        Some(Tz::America__Los_Angeles)
    );
    assert_eq!(
        lookup_zone("W. Europe Standard Time"),
        Some(Tz::Europe__Berlin)
    );
}

#[test]
fn windows_tzid_value_resolves() {
    let instant = DateTimeResolver::new(Tz::UTC, DstPolicy::default())
        .resolve("20251215T090000", Some("Pacific Standard Time"))
        .unwrap();
    assert_eq!(instant, utc(2025, 12, 15, 17, 0));
}

#[test]
fn vendor_prefixes_are_stripped() {
    assert_eq!(
        lookup_zone("/mozilla.org/Europe/Berlin"),
        Some(Tz::Europe__Berlin)
    );
    assert_eq!(
        lookup_zone("/softwarestudio.org/Europe/Paris"),
        Some(Tz::Europe__Paris)
    );
}

#[test]
fn quoted_names_are_unquoted() {
    assert_eq!(lookup_zone("\"Asia/Tokyo\""), Some(Tz::Asia__Tokyo));
}

#[test]
fn unknown_zone_is_an_error_for_callers() {
    assert_eq!(lookup_zone("Mars/Olympus_Mons"), None);
    assert_eq!(lookup_zone("   "), None);
    assert_eq!(
        zone_from_name("Mars/Olympus_Mons"),
        Err(FeedError::InvalidTimezone("Mars/Olympus_Mons".to_string()))
    );
}

// ---------------------------------------------------------------------------
// DST
// ---------------------------------------------------------------------------

#[test]
fn fold_takes_the_earlier_instant() {
    // 2025-11-02 01:30 happens twice in New York; EDT comes first.
    let instant = pacific_resolver()
        .resolve("20251102T013000", Some("America/New_York"))
        .unwrap();
    assert_eq!(instant, utc(2025, 11, 2, 5, 30));
}

#[test]
fn gap_shifts_forward_by_default() {
    // 2026-03-08 02:30 does not exist in New York.
    let naive = NaiveDate::from_ymd_opt(2026, 3, 8)
        .unwrap()
        .and_hms_opt(2, 30, 0)
        .unwrap();
    let shifted = localize(&Tz::America__New_York, naive, DstPolicy::ShiftForward).unwrap();
    assert_eq!(shifted, utc(2026, 3, 8, 7, 30));
}

#[test]
fn gap_is_dropped_with_skip_policy() {
    let naive = NaiveDate::from_ymd_opt(2026, 3, 8)
        .unwrap()
        .and_hms_opt(2, 30, 0)
        .unwrap();
    assert_eq!(localize(&Tz::America__New_York, naive, DstPolicy::Skip), None);

    let mut resolver = DateTimeResolver::new(Tz::UTC, DstPolicy::Skip);
    assert!(resolver
        .resolve("20260308T023000", Some("America/New_York"))
        .is_err());
}
