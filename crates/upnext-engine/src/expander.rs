//! Weekly recurrence expansion -- turns a master record's RRULE into concrete
//! future occurrences.
//!
//! Only `FREQ=WEEKLY` is expanded. Any other frequency yields nothing. Generation
//! walks forward from the master's own start in steps of `INTERVAL` weeks and, in
//! each step, visits every `BYDAY` weekday at the master's wall-clock time. A
//! candidate is emitted when it is:
//!
//! - strictly after the master's start (the original instance is never re-emitted),
//! - at or before `UNTIL` (by instant, not by calendar week),
//! - at or after `now`,
//! - not listed in `EXDATE`.
//!
//! Candidates are computed on the calendar of the `DTSTART`'s `TZID` zone, or of
//! the local zone for UTC and floating starts, so the wall-clock time survives
//! DST transitions in that zone.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;

use crate::datetime::DateTimeResolver;
use crate::dst::{localize, DstPolicy};
use crate::occurrence::{MasterRecord, Occurrence};
use crate::options::ParseOptions;
use crate::rule::RecurrenceRule;

/// Extra days scanned past `UNTIL` so weekdays early in the final partial week
/// are still visited when the week's anchor day falls after them.
const UNTIL_SLACK_DAYS: u64 = 6;

/// Lazy sequence of generated occurrences for one master record.
///
/// Finite: bounded by `UNTIL` (or the horizon) and by `ParseOptions::max_weeks`.
pub struct Expansion<'m> {
    master: &'m MasterRecord,
    zone: Tz,
    local: Tz,
    policy: DstPolicy,
    by_day: Vec<Weekday>,
    step_days: u64,
    time_of_day: NaiveTime,
    until: DateTime<Tz>,
    last_anchor: NaiveDate,
    now: DateTime<Tz>,
    anchor: NaiveDate,
    day_index: usize,
    weeks: u32,
    max_weeks: u32,
}

/// Expand `master`'s recurrence rule relative to `now`.
///
/// Returns an empty expansion when the master has no rule, the rule is not
/// weekly, or the rule cannot be read. `UNTIL` is honored even when it lies
/// before `now`; without it, expansion stops at `now + options.horizon()`.
pub fn expand<'m>(
    master: &'m MasterRecord,
    now: DateTime<Tz>,
    options: &ParseOptions,
) -> Expansion<'m> {
    let local = now.timezone();
    let zone = master.start_zone;
    let start = master.event.start.with_timezone(&zone);

    let mut expansion = Expansion {
        master,
        zone,
        local,
        policy: options.dst_policy,
        by_day: Vec::new(),
        step_days: 7,
        time_of_day: start.time(),
        until: now,
        last_anchor: start.date_naive(),
        now,
        anchor: start.date_naive(),
        day_index: 0,
        weeks: 0,
        max_weeks: options.max_weeks,
    };

    let Some(raw_rule) = master.recurrence_rule.as_deref() else {
        return expansion;
    };
    let rule = match RecurrenceRule::parse(raw_rule) {
        Ok(rule) => rule,
        Err(err) => {
            tracing::trace!(%err, "not expanding unreadable RRULE");
            return expansion;
        }
    };
    if !rule.is_weekly() {
        tracing::trace!(rule = raw_rule, "not expanding non-weekly RRULE");
        return expansion;
    }

    let horizon = now.checked_add_months(options.horizon()).unwrap_or(now);
    let until = rule
        .until
        .as_deref()
        .and_then(|raw| {
            DateTimeResolver::new(local, options.dst_policy)
                .resolve(raw, None)
                .ok()
        })
        .unwrap_or(horizon);

    expansion.step_days = 7 * u64::from(rule.interval);
    expansion.by_day = if rule.by_day.is_empty() {
        vec![start.weekday()]
    } else {
        rule.by_day
    };
    expansion.until = until;
    expansion.last_anchor = until
        .with_timezone(&zone)
        .date_naive()
        .checked_add_days(Days::new(UNTIL_SLACK_DAYS))
        .unwrap_or(NaiveDate::MAX);
    let today = now.with_timezone(&zone).date_naive();
    expansion.anchor = first_anchor(start.date_naive(), today, expansion.step_days);
    expansion
}

/// Skip whole periods that end before `today`, keeping one period of margin so an
/// occurrence later today is still visited.
fn first_anchor(start: NaiveDate, today: NaiveDate, step_days: u64) -> NaiveDate {
    let elapsed_days = (today - start).num_days();
    if elapsed_days <= 0 {
        return start;
    }
    let elapsed_days = elapsed_days.unsigned_abs();
    let periods = (elapsed_days / step_days).saturating_sub(1);
    start
        .checked_add_days(Days::new(periods * step_days))
        .unwrap_or(start)
}

impl Expansion<'_> {
    /// The occurrence on `weekday` in the current period, if it passes every filter.
    fn candidate(&self, weekday: Weekday) -> Option<Occurrence> {
        let offset = (weekday.num_days_from_monday() + 7
            - self.anchor.weekday().num_days_from_monday())
            % 7;
        let date = self.anchor.checked_add_days(Days::new(u64::from(offset)))?;
        let start = localize(&self.zone, date.and_time(self.time_of_day), self.policy)?
            .with_timezone(&self.local);

        let master_start = &self.master.event.start;
        if start <= *master_start || start > self.until || start < self.now {
            return None;
        }
        if self.master.is_excluded(&start) {
            tracing::trace!(%start, "skipping EXDATE instance");
            return None;
        }
        Some(self.master.instance_at(start))
    }

    fn advance_period(&mut self) {
        self.day_index = 0;
        self.weeks += 1;
        self.anchor = self
            .anchor
            .checked_add_days(Days::new(self.step_days))
            .unwrap_or(NaiveDate::MAX);
        if self.weeks == self.max_weeks && self.anchor <= self.last_anchor {
            tracing::warn!(
                title = %self.master.event.title,
                max_weeks = self.max_weeks,
                "recurrence expansion hit the week cap"
            );
        }
    }
}

impl Iterator for Expansion<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        while !self.by_day.is_empty()
            && self.weeks < self.max_weeks
            && self.anchor <= self.last_anchor
        {
            let Some(&weekday) = self.by_day.get(self.day_index) else {
                self.advance_period();
                continue;
            };
            self.day_index += 1;
            if let Some(occurrence) = self.candidate(weekday) {
                return Some(occurrence);
            }
        }
        None
    }
}
