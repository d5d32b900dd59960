//! One-line summaries and a serializable view of the next meeting.

use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::occurrence::Occurrence;
use crate::parser::parse_feed;
use crate::select::select_next;

pub const NO_UPCOMING: &str = "No upcoming meetings";

/// `Next: <title> (<time>)`, with `h:mm AM` for meetings today and `Tue h:mm AM`
/// otherwise. Returns `No upcoming meetings` for `None`.
pub fn format_summary_line<Z: TimeZone>(
    occurrence: Option<&Occurrence>,
    now: &DateTime<Z>,
) -> String {
    let Some(occurrence) = occurrence else {
        return NO_UPCOMING.to_string();
    };

    let today = now.with_timezone(&occurrence.start.timezone()).date_naive();
    let pattern = if occurrence.start.date_naive() == today {
        "%-I:%M %p"
    } else {
        "%a %-I:%M %p"
    };
    format!("Next: {} ({})", occurrence.title, occurrence.start.format(pattern))
}

/// The selected meeting in a form tooling can print or serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextMeeting {
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub meeting_url: Option<String>,
    pub is_free_or_placeholder: bool,
}

impl From<&Occurrence> for NextMeeting {
    fn from(occurrence: &Occurrence) -> Self {
        NextMeeting {
            title: occurrence.title.clone(),
            start: occurrence.start.fixed_offset(),
            end: occurrence.end.fixed_offset(),
            meeting_url: occurrence.meeting_url.as_ref().map(|url| url.to_string()),
            is_free_or_placeholder: occurrence.is_free_or_placeholder,
        }
    }
}

/// Parse `text` and pick the next meeting relative to `now`.
pub fn next_meeting(
    text: &str,
    now: DateTime<Tz>,
    ignore_free_or_placeholder: bool,
) -> Option<NextMeeting> {
    let occurrences = parse_feed(text, now);
    select_next(&occurrences, &now, ignore_free_or_placeholder).map(NextMeeting::from)
}
