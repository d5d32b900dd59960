//! DATE / DATE-TIME resolution into instants in the caller's local zone.
//!
//! Supported value forms:
//!
//! - `YYYYMMDD` -- date only, local midnight
//! - `YYYYMMDDTHHMMSSZ` -- UTC
//! - `YYYYMMDDTHHMMSS` -- floating (local wall clock), or wall clock in `TZID`
//!
//! TZIDs are looked up as IANA names first, then as Windows zone names
//! (`Pacific Standard Time`) through ICU4X's zone mapping data. An unknown TZID
//! degrades to floating time instead of failing.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use icu::time::zone::iana::IanaParserExtended;
use icu::time::zone::WindowsParser;

use crate::dst::{localize, DstPolicy};
use crate::error::{FeedError, Result};

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

/// Look up a zone by IANA or Windows name.
///
/// `/mozilla.org/` and `/softwarestudio.org/` prefixes are accepted, as are
/// aliases that ICU canonicalizes (`Europe/Kiev`).
pub fn lookup_zone(name: &str) -> Option<Tz> {
    let name = name.trim().trim_matches('"');
    let stripped = name
        .strip_prefix("/mozilla.org/")
        .or_else(|| name.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(name);
    if stripped.is_empty() {
        return None;
    }

    if let Ok(tz) = Tz::from_str(stripped) {
        return Some(tz);
    }

    let iana_parser = IanaParserExtended::new();

    if let Some(zone) = WindowsParser::new().parse(stripped, None) {
        for entry in iana_parser.iter() {
            if entry.time_zone == zone {
                if let Ok(tz) = Tz::from_str(entry.canonical) {
                    return Some(tz);
                }
            }
        }
    }

    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return Tz::from_str(parsed.canonical).ok();
    }

    None
}

/// Like [`lookup_zone`], but an unknown name is an error.
///
/// # Errors
/// Returns `FeedError::InvalidTimezone` if the name matches no known zone.
pub fn zone_from_name(name: &str) -> Result<Tz> {
    lookup_zone(name).ok_or_else(|| FeedError::InvalidTimezone(name.to_string()))
}

/// Parses DATE / DATE-TIME values into instants in a fixed local zone.
///
/// Zone lookups are cached per resolver, so one resolver should be reused for a
/// whole feed.
#[derive(Debug, Clone)]
pub struct DateTimeResolver {
    local: Tz,
    policy: DstPolicy,
    zones: HashMap<String, Option<Tz>>,
}

impl DateTimeResolver {
    pub fn new(local: Tz, policy: DstPolicy) -> Self {
        Self {
            local,
            policy,
            zones: HashMap::new(),
        }
    }

    /// Resolve `raw` (optionally qualified by a `TZID` parameter) to a local instant.
    ///
    /// # Errors
    /// Returns `FeedError::InvalidDate` if the value matches none of the supported
    /// forms. Callers treat this as "absent".
    pub fn resolve(&mut self, raw: &str, tzid: Option<&str>) -> Result<DateTime<Tz>> {
        self.resolve_zoned(raw, tzid).map(|(instant, _)| instant)
    }

    /// Like [`resolve`](Self::resolve), also returning the zone whose calendar a
    /// recurrence should follow: the `TZID` zone, or the local zone for `Z`,
    /// floating and date-only values.
    ///
    /// # Errors
    /// Returns `FeedError::InvalidDate` if the value matches none of the supported forms.
    pub fn resolve_zoned(
        &mut self,
        raw: &str,
        tzid: Option<&str>,
    ) -> Result<(DateTime<Tz>, Tz)> {
        let value = raw.trim();

        if let (Some(tzid), Some(naive)) = (tzid, parse_wall_clock(value)) {
            if let Some(zone) = self.zone(tzid) {
                return localize(&zone, naive, self.policy)
                    .map(|dt| (dt.with_timezone(&self.local), zone))
                    .ok_or_else(|| FeedError::InvalidDate(value.to_string()));
            }
        }

        if let Some(core) = value.strip_suffix(['Z', 'z']) {
            if core.len() == 15 {
                if let Ok(naive) = NaiveDateTime::parse_from_str(core, DATE_TIME_FORMAT) {
                    let utc: DateTime<Utc> = naive.and_utc();
                    return Ok((utc.with_timezone(&self.local), self.local));
                }
            }
        }

        if let Some(naive) = parse_wall_clock(value) {
            if let Some(dt) = localize(&self.local, naive, self.policy) {
                return Ok((dt, self.local));
            }
        }

        Err(FeedError::InvalidDate(value.to_string()))
    }

    fn zone(&mut self, tzid: &str) -> Option<Tz> {
        if let Some(cached) = self.zones.get(tzid) {
            return *cached;
        }
        let zone = lookup_zone(tzid);
        if zone.is_none() {
            tracing::warn!(tzid, "unknown TZID, falling back to floating time");
        }
        self.zones.insert(tzid.to_string(), zone);
        zone
    }
}

/// `YYYYMMDDTHHMMSS` or `YYYYMMDD` (midnight) without any zone designator.
fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    match value.len() {
        15 => NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).ok(),
        8 => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN)),
        _ => None,
    }
}
