//! Parsed event types: concrete occurrences and the master records they come from.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use url::Url;

/// Hours given to events without a usable `DTEND`.
pub const DEFAULT_DURATION_HOURS: i64 = 1;

/// One concrete, dated instance of an event.
///
/// `start` and `end` are expressed in the local zone of the parse; `end` is always
/// later than `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub uid: Option<String>,
    /// For overrides: the UTC start of the series instance this record replaces.
    pub recurrence_key: Option<DateTime<Utc>>,
    pub is_cancelled: bool,
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub meeting_url: Option<Url>,
    pub is_free_or_placeholder: bool,
}

impl Occurrence {
    /// A plain occurrence. An `end` at or before `start` becomes `start + 1 hour`.
    pub fn new(title: impl Into<String>, start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Occurrence {
            uid: None,
            recurrence_key: None,
            is_cancelled: false,
            title: title.into(),
            start,
            end: clamp_end(start, Some(end)),
            meeting_url: None,
            is_free_or_placeholder: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `start` as a UTC instant, the form recurrence keys are compared in.
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    /// True when this record replaces or cancels one instance of a series.
    pub fn is_override(&self) -> bool {
        self.recurrence_key.is_some()
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.title, self.start.format("%Y-%m-%d %H:%M:%S %Z"))
    }
}

/// `end` when it is present and after `start`, otherwise the default duration.
pub(crate) fn clamp_end(start: DateTime<Tz>, end: Option<DateTime<Tz>>) -> DateTime<Tz> {
    end.filter(|end| *end > start)
        .unwrap_or(start + Duration::hours(DEFAULT_DURATION_HOURS))
}

/// An `EXDATE` entry: the excluded instant and the `TZID` it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub instant: DateTime<Tz>,
    pub tzid: Option<String>,
}

/// A complete `VEVENT` block before recurrence expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRecord {
    /// The record's own (original) instance.
    pub event: Occurrence,
    /// Zone whose calendar recurrences follow: the `DTSTART`'s `TZID` zone, or the
    /// local zone for UTC and floating starts.
    pub start_zone: Tz,
    /// Raw `DTSTART` value as written, for diagnostics.
    pub raw_start: String,
    pub recurrence_rule: Option<String>,
    pub excluded: Vec<Exclusion>,
}

impl MasterRecord {
    /// Exact-instant match against the `EXDATE` list.
    pub fn is_excluded(&self, instant: &DateTime<Tz>) -> bool {
        self.excluded.iter().any(|ex| ex.instant == *instant)
    }

    /// Copy of the original instance moved to `start`, keeping its duration.
    pub fn instance_at(&self, start: DateTime<Tz>) -> Occurrence {
        Occurrence {
            recurrence_key: None,
            start,
            end: start + self.event.duration(),
            ..self.event.clone()
        }
    }
}
