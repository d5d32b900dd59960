//! VEVENT accumulation -- turns a stream of content lines into [`MasterRecord`]s.
//!
//! Two states: outside any event, or inside one with a builder in progress.
//! `BEGIN:VEVENT` opens a fresh builder; `END:VEVENT` commits it. A record without
//! a usable `DTSTART` is dropped at commit. Components nested inside an event
//! (`VALARM`) are skipped so their fields cannot leak into the event; an
//! unterminated one is closed by the event's own `END:VEVENT`.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use url::Url;

use crate::datetime::DateTimeResolver;
use crate::field::{parse_field, unescape_text, Field};
use crate::occurrence::{clamp_end, Exclusion, MasterRecord, Occurrence};
use crate::unfold::{unfold, Unfold};

/// Title given to events without a `SUMMARY`.
pub const UNTITLED: &str = "(No Title)";

/// Iterator over the committed records of a feed.
pub struct Records<'a> {
    lines: Unfold<'a>,
    resolver: DateTimeResolver,
    state: State,
}

enum State {
    Outside,
    InEvent(Box<RecordBuilder>),
}

impl State {
    /// Leave the event, handing back the builder if one was open.
    fn finish(&mut self) -> Option<Box<RecordBuilder>> {
        match std::mem::replace(self, State::Outside) {
            State::InEvent(builder) => Some(builder),
            State::Outside => None,
        }
    }
}

/// Scan `text` for `VEVENT` blocks, resolving dates with `resolver`.
pub fn records(text: &str, resolver: DateTimeResolver) -> Records<'_> {
    Records {
        lines: unfold(text),
        resolver,
        state: State::Outside,
    }
}

impl Iterator for Records<'_> {
    type Item = MasterRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if line.is_empty() {
                continue;
            }
            let Some(field) = parse_field(&line) else {
                tracing::trace!(line = %line, "discarding line without ':'");
                continue;
            };

            let marker = is_vevent(&field);
            if field.name == "BEGIN" && marker {
                self.state = State::InEvent(Box::default());
                continue;
            }

            if field.name == "END" && marker {
                if let Some(record) = self.state.finish().and_then(RecordBuilder::commit) {
                    return Some(record);
                }
                continue;
            }
            if let State::InEvent(builder) = &mut self.state {
                builder.apply(&field, &mut self.resolver);
            }
        }
        None
    }
}

fn is_vevent(field: &Field<'_>) -> bool {
    field.value.trim().eq_ignore_ascii_case("VEVENT")
}

/// The record in progress between `BEGIN:VEVENT` and `END:VEVENT`.
#[derive(Debug)]
struct RecordBuilder {
    title: String,
    start: Option<(DateTime<Tz>, Tz)>,
    raw_start: String,
    end: Option<DateTime<Tz>>,
    uid: Option<String>,
    recurrence_id: Option<DateTime<Tz>>,
    is_cancelled: bool,
    is_free: bool,
    meeting_url: Option<Url>,
    rrule: Option<String>,
    excluded: Vec<Exclusion>,
    /// Depth of components nested inside the event.
    nested: usize,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            title: UNTITLED.to_string(),
            start: None,
            raw_start: String::new(),
            end: None,
            uid: None,
            recurrence_id: None,
            is_cancelled: false,
            is_free: false,
            meeting_url: None,
            rrule: None,
            excluded: Vec::new(),
            nested: 0,
        }
    }
}

impl RecordBuilder {
    fn apply(&mut self, field: &Field<'_>, resolver: &mut DateTimeResolver) {
        match field.name.as_str() {
            "BEGIN" => {
                self.nested += 1;
                return;
            }
            "END" => {
                self.nested = self.nested.saturating_sub(1);
                return;
            }
            _ if self.nested > 0 => return,
            _ => {}
        }

        let value = field.value.trim();
        let tzid = field.tzid();

        match field.name.as_str() {
            "SUMMARY" => {
                self.title = unescape_text(value).into_owned();
                if is_placeholder_title(value) {
                    self.is_free = true;
                }
            }
            "DTSTART" => {
                if let Ok(start) = resolver.resolve_zoned(value, tzid) {
                    self.start = Some(start);
                    self.raw_start = value.to_string();
                }
            }
            "DTEND" => {
                if let Ok(end) = resolver.resolve(value, tzid) {
                    self.end = Some(end);
                }
            }
            "RECURRENCE-ID" => {
                if let Ok(key) = resolver.resolve(value, tzid) {
                    self.recurrence_id = Some(key);
                }
            }
            "TRANSP" => {
                if value.eq_ignore_ascii_case("TRANSPARENT") {
                    self.is_free = true;
                }
            }
            "STATUS" => {
                if value.eq_ignore_ascii_case("FREE") {
                    self.is_free = true;
                } else if value.eq_ignore_ascii_case("CANCELLED") {
                    self.is_cancelled = true;
                }
            }
            "BUSYSTATUS" | "X-MICROSOFT-CDO-BUSYSTATUS" => {
                if value.eq_ignore_ascii_case("FREE") {
                    self.is_free = true;
                }
            }
            "EXDATE" => {
                for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    if let Ok(instant) = resolver.resolve(part, tzid) {
                        self.excluded.push(Exclusion {
                            instant,
                            tzid: tzid.map(str::to_string),
                        });
                    }
                }
            }
            "RRULE" => self.rrule = Some(value.to_string()),
            "UID" => {
                if !value.is_empty() {
                    self.uid = Some(value.to_string());
                }
            }
            "URL" | "ATTACH" => {
                if self.meeting_url.is_none() {
                    self.meeting_url = Url::parse(value).ok();
                }
            }
            "DESCRIPTION" | "X-ALT-DESC" => {
                if self.meeting_url.is_none() {
                    self.meeting_url = find_meeting_url(&unescape_text(value));
                }
            }
            _ => {}
        }
    }

    fn commit(self: Box<Self>) -> Option<MasterRecord> {
        let this = *self;
        let Some((start, start_zone)) = this.start else {
            tracing::trace!(title = %this.title, "dropping VEVENT without DTSTART");
            return None;
        };

        let event = Occurrence {
            uid: this.uid,
            recurrence_key: this.recurrence_id.map(|key| key.with_timezone(&Utc)),
            is_cancelled: this.is_cancelled,
            title: this.title,
            start,
            end: clamp_end(start, this.end),
            meeting_url: this.meeting_url,
            is_free_or_placeholder: this.is_free,
        };

        Some(MasterRecord {
            event,
            start_zone,
            raw_start: this.raw_start,
            recurrence_rule: this.rrule,
            excluded: this.excluded,
        })
    }
}

/// `Free` exactly, or anything mentioning "following".
fn is_placeholder_title(summary: &str) -> bool {
    let summary = summary.trim();
    summary.eq_ignore_ascii_case("Free") || summary.to_lowercase().contains("following")
}

/// Pull a join link out of free text or HTML.
///
/// Candidates, in order: a `href="..."` attribute, a `href='...'` attribute, then
/// the first `http...` run up to whitespace. The first one that parses as an
/// absolute URL wins.
pub fn find_meeting_url(description: &str) -> Option<Url> {
    let lower = description.to_ascii_lowercase();

    let quoted_href = |quote: char| {
        let marker = format!("href={quote}");
        let start = lower.find(&marker)? + marker.len();
        let len = description[start..].find(quote)?;
        let href = description[start..start + len].trim();
        (!href.is_empty()).then_some(href)
    };
    let bare_link = || {
        let start = lower.find("http")?;
        description[start..]
            .split([' ', '\t', '\r', '\n'])
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    [quoted_href('"'), quoted_href('\''), bare_link()]
        .into_iter()
        .flatten()
        .find_map(|candidate| Url::parse(candidate).ok())
}
