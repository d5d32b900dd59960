//! Next-meeting selection.

use chrono::{DateTime, Duration, TimeZone};

use crate::occurrence::Occurrence;

/// How long after its start a meeting still counts as upcoming.
pub const GRACE_SECONDS: i64 = 60;

fn qualifies<Z: TimeZone>(occurrence: &Occurrence, now: &DateTime<Z>, ignore_free: bool) -> bool {
    let lower_bound = now.clone() - Duration::seconds(GRACE_SECONDS);
    occurrence.start >= lower_bound && !(ignore_free && occurrence.is_free_or_placeholder)
}

/// The earliest occurrence starting at or after `now - 60s`.
///
/// With `ignore_free_or_placeholder`, entries marked free or placeholder are
/// skipped. Ties on start keep slice order.
pub fn select_next<'a, Z: TimeZone>(
    occurrences: &'a [Occurrence],
    now: &DateTime<Z>,
    ignore_free_or_placeholder: bool,
) -> Option<&'a Occurrence> {
    occurrences
        .iter()
        .filter(|o| qualifies(o, now, ignore_free_or_placeholder))
        .min_by_key(|o| o.start)
}

/// The meeting after `next`: the earliest qualifying occurrence that is not
/// `next` itself and does not start before it.
///
/// Among entries sharing `next`'s start, only those after it in slice order are
/// considered, so repeated calls walk the list without looping.
pub fn select_following<'a, Z: TimeZone>(
    occurrences: &'a [Occurrence],
    next: &Occurrence,
    now: &DateTime<Z>,
    ignore_free_or_placeholder: bool,
) -> Option<&'a Occurrence> {
    let position = occurrences.iter().position(|o| std::ptr::eq(o, next));

    occurrences
        .iter()
        .enumerate()
        .filter(|(i, o)| {
            if o.start == next.start {
                position.is_some_and(|p| *i > p)
            } else {
                o.start > next.start
            }
        })
        .map(|(_, o)| o)
        .filter(|o| qualifies(o, now, ignore_free_or_placeholder))
        .min_by_key(|o| o.start)
}
