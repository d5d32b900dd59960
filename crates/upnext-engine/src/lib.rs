//! # upnext-engine
//!
//! iCalendar feed parsing and next-meeting selection for a tray-style
//! "what's next" indicator.
//!
//! A feed is read in one pass: folded lines are joined, content lines are split
//! into fields, `VEVENT` blocks become records, weekly `RRULE`s are expanded,
//! `RECURRENCE-ID` overrides are reconciled, and the result is a sorted,
//! de-duplicated list of [`Occurrence`]s. Every instant is expressed in the zone
//! of the caller's `now`.
//!
//! ## Modules
//!
//! - [`unfold`]: physical lines → logical content lines
//! - [`field`]: `NAME;PARAM=VALUE:VALUE` splitting and TEXT unescaping
//! - [`datetime`]: DATE / DATE-TIME values and TZID lookup (IANA and Windows)
//! - [`dst`]: DST gap and fold policies
//! - [`record`]: `VEVENT` blocks → master records
//! - [`rule`]: RRULE value parsing
//! - [`expander`]: weekly recurrence expansion
//! - [`reconcile`]: override merging, sorting and de-duplication
//! - [`parser`]: the whole pipeline
//! - [`select`]: next (and following) meeting selection
//! - [`summary`]: one-line summary and a serializable next-meeting view
//! - [`inspect`]: feed diagnostics
//! - [`error`]: Error types

pub mod datetime;
pub mod dst;
pub mod error;
pub mod expander;
pub mod field;
pub mod inspect;
pub mod occurrence;
pub mod options;
pub mod parser;
pub mod reconcile;
pub mod record;
pub mod rule;
pub mod select;
pub mod summary;
pub mod unfold;

pub use datetime::{lookup_zone, zone_from_name, DateTimeResolver};
pub use dst::DstPolicy;
pub use error::FeedError;
pub use inspect::{inspect_feed, Inspection};
pub use occurrence::{MasterRecord, Occurrence};
pub use options::ParseOptions;
pub use parser::{parse_feed, FeedParser};
pub use select::{select_following, select_next};
pub use summary::{format_summary_line, next_meeting, NextMeeting};
