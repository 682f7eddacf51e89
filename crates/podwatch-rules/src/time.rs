use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use podwatch_core::EVENT_TIMESTAMP_FORMAT;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Parse an event timestamp of the exact form `YYYY-MM-DDTHH:MM:SSZ`
///
/// Fractional seconds and explicit offsets are rejected.
pub fn parse_event_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(ts, EVENT_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Time elapsed between two raw event timestamps
///
/// `None` if either is absent or unparseable.
pub fn event_span(first: Option<&str>, last: Option<&str>) -> Option<TimeDelta> {
    let first = parse_event_timestamp(first?)?;
    let last = parse_event_timestamp(last?)?;
    Some(last - first)
}

/// Render a duration as `H:MM:SS`, prefixed by `N day(s), ` once it spans a day
///
/// Negative durations borrow from the day count, so one minute before zero
/// renders as `-1 day, 23:59:00`.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let days = total.div_euclid(SECONDS_PER_DAY);
    let rem = total.rem_euclid(SECONDS_PER_DAY);

    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    if days == 0 {
        clock
    } else {
        let plural = if days.abs() == 1 { "" } else { "s" };
        format!("{} day{}, {}", days, plural, clock)
    }
}
