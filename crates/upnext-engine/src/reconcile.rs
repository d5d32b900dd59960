//! Override reconciliation -- merges series instances with `RECURRENCE-ID` records.
//!
//! A record carrying both a `UID` and a `RECURRENCE-ID` replaces (or, when
//! cancelled, removes) the series instance with the same UID whose UTC start
//! equals the recurrence key. When several overrides target the same instance,
//! the last one in feed order wins. Records without a UID never take part in
//! matching.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::expander::expand;
use crate::occurrence::{MasterRecord, Occurrence};
use crate::options::ParseOptions;

type InstanceKey = (String, DateTime<Utc>);

/// Expand, reconcile, sort and deduplicate the records of one feed.
///
/// The result is ascending by `start` and unique by `(start, title)`; the first
/// record in feed order wins a tie.
pub fn reconcile(
    records: Vec<MasterRecord>,
    now: DateTime<Tz>,
    options: &ParseOptions,
) -> Vec<Occurrence> {
    let (overrides, masters): (Vec<MasterRecord>, Vec<MasterRecord>) = records
        .into_iter()
        .partition(|record| record.event.uid.is_some() && record.event.is_override());

    let overrides = last_override_wins(overrides);
    let replaced: HashSet<InstanceKey> = overrides
        .iter()
        .filter_map(|record| Some((record.event.uid.clone()?, record.event.recurrence_key?)))
        .collect();

    let mut occurrences = Vec::new();
    for master in &masters {
        if master.event.is_cancelled {
            tracing::trace!(title = %master.event.title, "skipping cancelled event");
            continue;
        }

        let original = (!master.is_excluded(&master.event.start)).then(|| master.event.clone());
        for instance in original.into_iter().chain(expand(master, now, options)) {
            if is_replaced(&instance, &replaced) {
                tracing::trace!(
                    title = %instance.title,
                    start = %instance.start,
                    "instance superseded by override"
                );
                continue;
            }
            occurrences.push(instance);
        }
    }

    occurrences.extend(
        overrides
            .into_iter()
            .filter(|record| !record.event.is_cancelled)
            .map(|record| record.event),
    );

    occurrences.sort_by_key(|occurrence| occurrence.start);
    let mut seen = HashSet::new();
    occurrences.retain(|o| seen.insert((o.start_utc(), o.title.clone())));
    occurrences
}

fn is_replaced(instance: &Occurrence, replaced: &HashSet<InstanceKey>) -> bool {
    let Some(uid) = &instance.uid else {
        return false;
    };
    replaced.contains(&(uid.clone(), instance.start_utc()))
}

/// Collapse overrides that share `(uid, recurrence_key)`, keeping the position of
/// the first and the content of the last.
fn last_override_wins(overrides: Vec<MasterRecord>) -> Vec<MasterRecord> {
    let mut slots: Vec<MasterRecord> = Vec::with_capacity(overrides.len());
    let mut index: HashMap<InstanceKey, usize> = HashMap::new();

    for record in overrides {
        let (Some(uid), Some(key)) = (record.event.uid.clone(), record.event.recurrence_key) else {
            continue;
        };
        match index.get(&(uid.clone(), key)) {
            Some(&slot) => slots[slot] = record,
            None => {
                index.insert((uid, key), slots.len());
                slots.push(record);
            }
        }
    }
    slots
}
