//! RRULE value parsing -- only the parts the weekly expander reads.

use chrono::Weekday;

use crate::error::{FeedError, Result};

/// Recurrence frequency named by `FREQ`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Other(String),
}

impl Frequency {
    fn parse(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            other => Frequency::Other(other.to_string()),
        }
    }
}

/// Parsed RRULE (`FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH;UNTIL=...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Option<Frequency>,
    /// Weeks between generation passes; never zero.
    pub interval: u32,
    /// Plain two-letter weekday tokens in rule order. Empty when `BYDAY` is absent
    /// or carries only ordinal forms such as `1MO`.
    pub by_day: Vec<Weekday>,
    /// Raw `UNTIL` value, resolved later against the feed's local zone.
    pub until: Option<String>,
}

impl RecurrenceRule {
    /// Parse an RRULE value. Keys are case-insensitive and unknown keys are ignored.
    ///
    /// # Errors
    /// Returns `FeedError::InvalidRule` if the value contains no `KEY=VALUE` pair.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut rule = RecurrenceRule {
            frequency: None,
            interval: 1,
            by_day: Vec::new(),
            until: None,
        };
        let mut seen_pair = false;

        for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            seen_pair = true;
            let value = value.trim();
            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => rule.frequency = Some(Frequency::parse(value)),
                "INTERVAL" => {
                    rule.interval = value.parse::<u32>().ok().filter(|n| *n > 0).unwrap_or(1);
                }
                "BYDAY" => {
                    rule.by_day = value
                        .split(',')
                        .filter_map(|token| weekday_from_token(token.trim()))
                        .collect();
                }
                "UNTIL" => rule.until = Some(value.to_string()),
                _ => {}
            }
        }

        if !seen_pair {
            return Err(FeedError::InvalidRule(raw.to_string()));
        }
        Ok(rule)
    }

    pub fn is_weekly(&self) -> bool {
        self.frequency == Some(Frequency::Weekly)
    }
}

/// Map `MO`..`SU` (case-insensitive) to a weekday.
pub fn weekday_from_token(token: &str) -> Option<Weekday> {
    match token.to_ascii_uppercase().as_str() {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}
