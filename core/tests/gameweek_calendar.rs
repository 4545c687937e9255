use chrono::{DateTime, Duration, Utc};
use gaffer_core::gameweek::{resolve_window, GameweekInfo};

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn gw(id: u32, deadline: &str, is_current: bool, is_next: bool, finished: bool) -> GameweekInfo {
    GameweekInfo {
        id,
        name: format!("Gameweek {id}"),
        deadline_time: Some(at(deadline)),
        is_current,
        is_next,
        finished,
    }
}

fn calendar() -> Vec<GameweekInfo> {
    vec![
        gw(9, "2024-10-26T10:00:00Z", false, false, true),
        gw(10, "2024-11-02T11:00:00Z", true, false, false),
        gw(11, "2024-11-09T11:00:00Z", false, true, false),
        gw(12, "2024-11-23T11:00:00Z", false, false, false),
    ]
}

#[test]
fn upcoming_gameweek_is_the_target() {
    let now = at("2024-11-05T12:00:00Z");
    let window = resolve_window(&calendar(), now);

    assert_eq!(window.current.as_ref().map(|g| g.id), Some(10));
    assert_eq!(window.next.as_ref().map(|g| g.id), Some(11));
    assert_eq!(window.target_event(), Some(11));

    let hours = window.hours_to_deadline(now).unwrap();
    assert!((hours - 95.0).abs() < 1e-9, "got {hours}");
}

#[test]
fn lagging_next_flag_is_corrected() {
    // gw11's deadline passed but upstream has not flipped the flags yet.
    let now = at("2024-11-09T11:00:00Z") + Duration::hours(3);
    let window = resolve_window(&calendar(), now);

    assert_eq!(window.target_event(), Some(12));
    assert_eq!(window.current.as_ref().map(|g| g.id), Some(10));
}

#[test]
fn lagging_flag_kept_when_nothing_is_ahead() {
    let now = at("2025-06-01T00:00:00Z");
    let window = resolve_window(&calendar(), now);
    assert_eq!(window.target_event(), Some(11));
    assert!(window.hours_to_deadline(now).unwrap() < 0.0);
}

#[test]
fn empty_calendar_has_no_target() {
    let window = resolve_window(&[], Utc::now());
    assert_eq!(window.target_event(), None);
    assert_eq!(window.hours_to_deadline(Utc::now()), None);
}
