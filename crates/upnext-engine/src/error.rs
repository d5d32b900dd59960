//! Error types for upnext-engine operations.
//!
//! Content problems inside a feed never surface as errors from
//! [`parse_feed`](crate::parse_feed); these variants are returned by the
//! lower-level helpers and are turned into "absent" by their callers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Invalid date value: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
