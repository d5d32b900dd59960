//! Tunables for feed parsing and recurrence expansion.

use chrono::Months;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;

/// Hard cap on generated weeks per recurring series.
pub const MAX_WEEKS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Expansion horizon for rules without `UNTIL`, in months after `now`.
    pub horizon_months: u32,
    /// Safety cap on weeks generated per series.
    pub max_weeks: u32,
    pub dst_policy: DstPolicy,
}

impl ParseOptions {
    pub fn horizon(&self) -> Months {
        Months::new(self.horizon_months)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            horizon_months: 3,
            max_weeks: MAX_WEEKS,
            dst_policy: DstPolicy::default(),
        }
    }
}
