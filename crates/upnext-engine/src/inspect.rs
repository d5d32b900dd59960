//! Feed diagnostics: raw event blocks, parsed entries and an expansion log.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::parser::FeedParser;

const ENTRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inspection {
    /// Raw `BEGIN:VEVENT`..`END:VEVENT` blocks as they appear in the feed.
    pub raw_events: Vec<String>,
    /// `<start> - <end> : <title>` per parsed occurrence.
    pub entries: Vec<String>,
    pub expansion_log: Vec<String>,
}

/// Inspect `text` as [`FeedParser::parse`] would see it relative to `now`.
pub fn inspect_feed(text: &str, now: DateTime<Tz>) -> Inspection {
    inspect_with(&FeedParser::new(now), text)
}

pub fn inspect_with(parser: &FeedParser, text: &str) -> Inspection {
    let mut inspection = Inspection::default();
    if text.trim().is_empty() {
        return inspection;
    }

    inspection.raw_events = raw_event_blocks(text);
    inspection.entries = parser
        .parse(text)
        .iter()
        .map(|o| {
            format!(
                "{} - {} : {}",
                o.start.format(ENTRY_FORMAT),
                o.end.format(ENTRY_FORMAT),
                o.title
            )
        })
        .collect();

    for record in parser.records(text) {
        if let Some(rule) = &record.recurrence_rule {
            inspection.expansion_log.push(format!(
                "VEVENT: {} DTSTART={} RRULE={}",
                record.event.title, record.raw_start, rule
            ));
        }
    }
    inspection
        .expansion_log
        .push(format!("Total parsed entries: {}", inspection.entries.len()));
    inspection
}

/// Physical text of each `VEVENT` block, markers included.
fn raw_event_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines() {
        let marker = line.trim_end_matches('\r');
        if marker.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(vec![marker]);
        } else if let Some(lines) = current.as_mut() {
            lines.push(marker);
            if marker.eq_ignore_ascii_case("END:VEVENT") {
                blocks.push(lines.join("\n"));
                current = None;
            }
        }
    }
    blocks
}
