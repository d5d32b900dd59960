//! DST transition policies for wall-clock times.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Policy for wall-clock times that fall in a DST gap (e.g., 2:30 AM during
/// spring forward). Times inside a DST fold always resolve to the earlier instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DstPolicy {
    /// Drop instances that fall in the gap.
    Skip,
    /// Move to the same wall-clock time one hour later.
    #[default]
    ShiftForward,
}

/// Resolve a wall-clock time in `zone` to an absolute instant.
pub fn localize(zone: &Tz, naive: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => zone
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest(),
        },
    }
}
