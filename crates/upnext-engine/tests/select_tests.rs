//! Tests for next-meeting selection, the summary line and the NextMeeting view.

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Tz;
use upnext_engine::summary::NO_UPCOMING;
use upnext_engine::{
    format_summary_line, next_meeting, select_following, select_next, NextMeeting, Occurrence,
};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Tz> {
    Tz::UTC.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

fn meeting(title: &str, start: DateTime<Tz>) -> Occurrence {
    Occurrence::new(title, start, start + Duration::minutes(30))
}

fn free(title: &str, start: DateTime<Tz>) -> Occurrence {
    Occurrence {
        is_free_or_placeholder: true,
        ..meeting(title, start)
    }
}

// ---------------------------------------------------------------------------
// select_next
// ---------------------------------------------------------------------------

#[test]
fn picks_earliest_upcoming() {
    let now = at(2025, 12, 15, 10, 0, 0);
    let occurrences = vec![
        meeting("Yesterday", at(2025, 12, 14, 10, 0, 0)),
        meeting("Later", at(2025, 12, 15, 15, 0, 0)),
        meeting("Soon", at(2025, 12, 15, 10, 30, 0)),
    ];
    let next = select_next(&occurrences, &now, false).unwrap();
    assert_eq!(next.title, "Soon");
}

#[test]
fn meeting_started_within_grace_window_is_still_next() {
    let now = at(2025, 12, 15, 10, 0, 0);
    let occurrences = vec![
        meeting("Just started", at(2025, 12, 15, 9, 59, 30)),
        meeting("Later", at(2025, 12, 15, 11, 0, 0)),
    ];
    assert_eq!(select_next(&occurrences, &now, false).unwrap().title, "Just started");
}

#[test]
fn grace_window_boundary() {
    let now = at(2025, 12, 15, 10, 0, 0);

    let exactly_sixty = vec![meeting("Edge", at(2025, 12, 15, 9, 59, 0))];
    assert!(select_next(&exactly_sixty, &now, false).is_some());

    let sixty_one = vec![meeting("Gone", at(2025, 12, 15, 9, 58, 59))];
    assert!(select_next(&sixty_one, &now, false).is_none());
}

#[test]
fn free_entries_are_skipped_when_asked() {
    let now = at(2025, 12, 15, 10, 0, 0);
    let occurrences = vec![
        free("Focus time", at(2025, 12, 15, 10, 30, 0)),
        meeting("Design review", at(2025, 12, 15, 11, 0, 0)),
    ];
    assert_eq!(select_next(&occurrences, &now, true).unwrap().title, "Design review");
    assert_eq!(select_next(&occurrences, &now, false).unwrap().title, "Focus time");
}

#[test]
fn ties_keep_list_order() {
    let now = at(2025, 12, 15, 10, 0, 0);
    let start = at(2025, 12, 15, 11, 0, 0);
    let occurrences = vec![meeting("A", start), meeting("B", start)];
    assert_eq!(select_next(&occurrences, &now, false).unwrap().title, "A");
}

#[test]
fn nothing_upcoming() {
    let now = at(2025, 12, 15, 10, 0, 0);
    assert!(select_next(&[], &now, false).is_none());

    let only_free = vec![free("Free", at(2025, 12, 15, 11, 0, 0))];
    assert!(select_next(&only_free, &now, true).is_none());
}

#[test]
fn now_in_another_zone_compares_by_instant() {
    let now = Tz::America__Los_Angeles
        .with_ymd_and_hms(2025, 12, 15, 2, 0, 0)
        .unwrap();
    let occurrences = vec![
        meeting("Before", at(2025, 12, 15, 9, 0, 0)),
        meeting("After", at(2025, 12, 15, 11, 0, 0)),
    ];
    assert_eq!(select_next(&occurrences, &now, false).unwrap().title, "After");
}

// ---------------------------------------------------------------------------
// select_following
// ---------------------------------------------------------------------------

#[test]
fn following_meeting_is_the_next_one_after() {
    let now = at(2025, 12, 15, 10, 0, 0);
    let occurrences = vec![
        meeting("First", at(2025, 12, 15, 10, 30, 0)),
        free("Lunch", at(2025, 12, 15, 12, 0, 0)),
        meeting("Second", at(2025, 12, 15, 13, 0, 0)),
    ];
    let next = select_next(&occurrences, &now, true).unwrap();
    let following = select_following(&occurrences, next, &now, true).unwrap();
    assert_eq!(following.title, "Second");

    let following = select_following(&occurrences, next, &now, false).unwrap();
    assert_eq!(following.title, "Lunch");
}

#[test]
fn following_walks_meetings_with_the_same_start() {
    let now = at(2025, 12, 15, 10, 0, 0);
    let start = at(2025, 12, 15, 11, 0, 0);
    let occurrences = vec![meeting("A", start), meeting("B", start), meeting("C", start)];

    let next = select_next(&occurrences, &now, false).unwrap();
    let second = select_following(&occurrences, next, &now, false).unwrap();
    let third = select_following(&occurrences, second, &now, false).unwrap();
    assert_eq!((second.title.as_str(), third.title.as_str()), ("B", "C"));
    assert!(select_following(&occurrences, third, &now, false).is_none());
}

#[test]
fn no_following_meeting() {
    let now = at(2025, 12, 15, 10, 0, 0);
    let occurrences = vec![meeting("Only", at(2025, 12, 15, 11, 0, 0))];
    let next = select_next(&occurrences, &now, false).unwrap();
    assert!(select_following(&occurrences, next, &now, false).is_none());
}

// ---------------------------------------------------------------------------
// Summary line
// ---------------------------------------------------------------------------

#[test]
fn occurrence_displays_title_and_local_start() {
    let start = Tz::Europe__Berlin
        .with_ymd_and_hms(2025, 12, 15, 10, 30, 0)
        .unwrap();
    assert_eq!(
        meeting("Standup", start).to_string(),
        "Standup @ 2025-12-15 10:30:00 CET"
    );
}

#[test]
fn summary_without_meeting() {
    let now = at(2025, 12, 15, 10, 0, 0);
    assert_eq!(format_summary_line(None, &now), NO_UPCOMING);
    assert_eq!(NO_UPCOMING, "No upcoming meetings");
}

#[test]
fn summary_for_meeting_today_shows_time_only() {
    let now = at(2025, 12, 15, 9, 0, 0);
    let standup = meeting("Standup", at(2025, 12, 15, 14, 5, 0));
    assert_eq!(
        format_summary_line(Some(&standup), &now),
        "Next: Standup (2:05 PM)"
    );
}

#[test]
fn summary_for_later_day_shows_weekday() {
    let now = at(2025, 12, 15, 9, 0, 0);
    let review = meeting("Review", at(2025, 12, 16, 9, 0, 0));
    assert_eq!(
        format_summary_line(Some(&review), &now),
        "Next: Review (Tue 9:00 AM)"
    );
}

#[test]
fn summary_uses_the_local_calendar_day() {
    // 23:30 in Los Angeles is already the next day in UTC.
    let pacific = Tz::America__Los_Angeles;
    let now = pacific.with_ymd_and_hms(2025, 12, 15, 20, 0, 0).unwrap();
    let late = Occurrence::new(
        "Late call",
        pacific.with_ymd_and_hms(2025, 12, 15, 23, 30, 0).unwrap(),
        pacific.with_ymd_and_hms(2025, 12, 16, 0, 0, 0).unwrap(),
    );
    assert_eq!(
        format_summary_line(Some(&late), &now),
        "Next: Late call (11:30 PM)"
    );
}

// ---------------------------------------------------------------------------
// NextMeeting
// ---------------------------------------------------------------------------

const FEED: &str = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Focus\r\n\
DTSTART:20251215T100000Z\r\n\
TRANSP:TRANSPARENT\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Test Meeting\r\n\
DTSTART:20251215T110000Z\r\n\
DTEND:20251215T113000Z\r\n\
URL:https://example.com\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

#[test]
fn next_meeting_from_feed() {
    let now = at(2025, 12, 15, 9, 0, 0);

    let next = next_meeting(FEED, now, true).unwrap();
    assert_eq!(next.title, "Test Meeting");
    assert_eq!(next.start, at(2025, 12, 15, 11, 0, 0));
    assert_eq!(next.end, at(2025, 12, 15, 11, 30, 0));
    assert_eq!(next.meeting_url.as_deref(), Some("https://example.com/"));
    assert!(!next.is_free_or_placeholder);

    let including_free = next_meeting(FEED, now, false).unwrap();
    assert_eq!(including_free.title, "Focus");
    assert!(including_free.is_free_or_placeholder);

    assert!(next_meeting(FEED, at(2025, 12, 16, 0, 0, 0), false).is_none());
}

#[test]
fn next_meeting_serializes_as_rfc3339() {
    let now = at(2025, 12, 15, 9, 0, 0);
    let next = next_meeting(FEED, now, true).unwrap();

    let json = serde_json::to_value(&next).unwrap();
    assert_eq!(json["title"], "Test Meeting");
    let start = json["start"].as_str().unwrap();
    assert_eq!(DateTime::parse_from_rfc3339(start).unwrap(), next.start);
    assert_eq!(json["meeting_url"], "https://example.com/");

    let back: NextMeeting = serde_json::from_value(json).unwrap();
    assert_eq!(back, next);
}
