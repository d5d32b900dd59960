//! Feed parsing -- unfold, split fields, build records, expand, reconcile.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::datetime::DateTimeResolver;
use crate::occurrence::{MasterRecord, Occurrence};
use crate::options::ParseOptions;
use crate::reconcile::reconcile;
use crate::record::{records, Records};

/// Parses feeds relative to a fixed reference instant.
///
/// The zone of `now` is the local zone: every returned instant is expressed in it,
/// floating and date-only values are read in it.
#[derive(Debug, Clone)]
pub struct FeedParser {
    now: DateTime<Tz>,
    options: ParseOptions,
}

impl FeedParser {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self::with_options(now, ParseOptions::default())
    }

    pub fn with_options(now: DateTime<Tz>, options: ParseOptions) -> Self {
        FeedParser { now, options }
    }

    /// The committed `VEVENT` records of `text`, before expansion.
    pub fn records<'a>(&self, text: &'a str) -> Records<'a> {
        records(text, DateTimeResolver::new(self.now.timezone(), self.options.dst_policy))
    }

    /// Parse `text` into occurrences, ascending by start and unique by
    /// `(start, title)`. Malformed content is skipped, never reported.
    #[tracing::instrument(level = "debug", skip_all, fields(text_len = text.len()))]
    pub fn parse(&self, text: &str) -> Vec<Occurrence> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let records: Vec<MasterRecord> = self.records(text).collect();
        let record_count = records.len();
        let occurrences = reconcile(records, self.now, &self.options);
        tracing::debug!(records = record_count, occurrences = occurrences.len(), "parsed feed");
        occurrences
    }
}

/// Parse `text` with default options. See [`FeedParser::parse`].
pub fn parse_feed(text: &str, now: DateTime<Tz>) -> Vec<Occurrence> {
    FeedParser::new(now).parse(text)
}
