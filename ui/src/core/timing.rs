//! Calendar and clock helpers. Instants are epoch milliseconds; calendar days
//! are `time::Date` in a [`Zone`], whose offset is looked up per instant so
//! days keep their local midnight across daylight-saving changes.

use chrono::TimeZone as _;
use time::{macros::format_description, Date, Duration, OffsetDateTime, Time, UtcOffset};

use super::entry::EpochMillis;

const DAY_MS: EpochMillis = 24 * 60 * 60 * 1000;

/// The UTC offset in force at an instant.
pub trait OffsetRules: Copy {
    fn offset_at(self, ms: EpochMillis) -> UtcOffset;
}

/// Time zone used to turn calendar days into instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The platform's time zone, including its daylight-saving rules.
    Local,
    /// One offset for every instant.
    Fixed(UtcOffset),
}

impl Zone {
    pub const UTC: Zone = Zone::Fixed(UtcOffset::UTC);
}

impl OffsetRules for Zone {
    fn offset_at(self, ms: EpochMillis) -> UtcOffset {
        match self {
            Zone::Local => local_offset_at(ms),
            Zone::Fixed(offset) => offset,
        }
    }
}

/// Offset of the platform zone at `ms`, or UTC when it cannot be resolved.
fn local_offset_at(ms: EpochMillis) -> UtcOffset {
    let seconds = chrono::Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|at| at.offset().local_minus_utc())
        .unwrap_or(0);
    UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
}

/// Current wall clock as epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    to_millis(OffsetDateTime::now_utc())
}

/// Today's date in `zone`.
pub fn today(zone: impl OffsetRules) -> Date {
    date_of(now_millis(), zone).unwrap_or_else(|| OffsetDateTime::now_utc().date())
}

pub fn to_millis(at: OffsetDateTime) -> EpochMillis {
    (at.unix_timestamp_nanos() / 1_000_000) as EpochMillis
}

pub fn from_millis(ms: EpochMillis, zone: impl OffsetRules) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000)
        .ok()
        .map(|at| at.to_offset(zone.offset_at(ms)))
}

/// Instant for `date` at `time` on the wall clock of `zone`. The offset is
/// taken at the resulting instant, so a summer date uses the summer offset
/// whatever the offset is today. Wall times skipped by a forward shift land
/// an offset-difference later.
pub fn local_millis(date: Date, time: Time, zone: impl OffsetRules) -> EpochMillis {
    let wall = to_millis(date.with_time(time).assume_utc());
    let guess = wall - offset_millis(zone.offset_at(wall));
    wall - offset_millis(zone.offset_at(guess))
}

fn offset_millis(offset: UtcOffset) -> EpochMillis {
    offset.whole_seconds() as EpochMillis * 1000
}

/// Calendar date an instant falls on in `zone`.
pub fn date_of(ms: EpochMillis, zone: impl OffsetRules) -> Option<Date> {
    from_millis(ms, zone).map(|at| at.date())
}

/// Half-open `[start, end)` window covering one calendar day: `start` is the
/// day's local midnight and `end` is exactly 24 hours later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: Date,
    pub start: EpochMillis,
    pub end: EpochMillis,
}

impl DayWindow {
    pub fn new(date: Date, zone: impl OffsetRules) -> Self {
        let start = local_millis(date, Time::MIDNIGHT, zone);
        Self {
            date,
            start,
            end: start + DAY_MS,
        }
    }

    pub fn contains(&self, ms: EpochMillis) -> bool {
        ms >= self.start && ms < self.end
    }
}

/// Parse the `YYYY-MM-DD` value of a date input.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), &format_description!("[year]-[month]-[day]")).ok()
}

/// Parse the `HH:MM` (optionally `HH:MM:SS`) value of a time input.
pub fn parse_time(raw: &str) -> Option<Time> {
    let raw = raw.trim();
    Time::parse(raw, &format_description!("[hour]:[minute]"))
        .or_else(|_| Time::parse(raw, &format_description!("[hour]:[minute]:[second]")))
        .ok()
}

pub fn date_key(date: Date) -> String {
    date.format(&format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

pub fn time_key(time: Time) -> String {
    time.format(&format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

pub fn previous_day(date: Date) -> Date {
    date.previous_day().unwrap_or(date)
}

/// The day after `date`, never moving past `today`.
pub fn next_day_clamped(date: Date, today: Date) -> Date {
    if date >= today {
        return today;
    }
    date.next_day().map(|d| d.min(today)).unwrap_or(today)
}

/// `count` consecutive dates ending at (and including) `anchor`, oldest first.
pub fn trailing_days(anchor: Date, count: u16) -> Vec<Date> {
    (0..count)
        .rev()
        .filter_map(|back| anchor.checked_sub(Duration::days(back as i64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset, time};

    /// US Eastern for 2024: daylight time from Mar 10 07:00 UTC to Nov 3
    /// 06:00 UTC.
    #[derive(Clone, Copy)]
    struct Eastern2024;

    impl OffsetRules for Eastern2024 {
        fn offset_at(self, ms: EpochMillis) -> UtcOffset {
            let starts = to_millis(datetime!(2024-03-10 07:00 UTC));
            let ends = to_millis(datetime!(2024-11-03 06:00 UTC));
            if (starts..ends).contains(&ms) {
                offset!(-4)
            } else {
                offset!(-5)
            }
        }
    }

    #[test]
    fn window_is_local_midnight_to_midnight() {
        let zone = Zone::Fixed(offset!(-5));
        let window = DayWindow::new(date!(2024 - 11 - 02), zone);
        let start = from_millis(window.start, zone).unwrap();
        assert_eq!(start.date(), date!(2024 - 11 - 02));
        assert_eq!(start.time(), Time::MIDNIGHT);
        assert_eq!(window.end - window.start, DAY_MS);
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
    }

    #[test]
    fn summer_days_use_summer_offset() {
        let just_after_midnight = to_millis(datetime!(2024-07-04 00:30 -4));

        let july = DayWindow::new(date!(2024 - 07 - 04), Eastern2024);
        assert!(july.contains(just_after_midnight));
        assert_eq!(july.start, to_millis(datetime!(2024-07-04 00:00 -4)));
        assert_eq!(date_of(just_after_midnight, Eastern2024), Some(date!(2024 - 07 - 04)));

        // A single winter offset applied to every date puts it on Jul 3.
        let fixed = DayWindow::new(date!(2024 - 07 - 04), Zone::Fixed(offset!(-5)));
        assert!(!fixed.contains(just_after_midnight));

        let january = DayWindow::new(date!(2024 - 01 - 15), Eastern2024);
        assert_eq!(january.start, to_millis(datetime!(2024-01-15 00:00 -5)));
    }

    #[test]
    fn wall_times_round_trip_on_both_sides_of_a_change() {
        for (day, at) in [
            (date!(2024 - 03 - 09), time!(23:30)),
            (date!(2024 - 03 - 10), time!(08:00)),
            (date!(2024 - 11 - 02), time!(20:10)),
            (date!(2024 - 11 - 04), time!(07:40)),
        ] {
            let ms = local_millis(day, at, Eastern2024);
            let back = from_millis(ms, Eastern2024).unwrap();
            assert_eq!((back.date(), back.time()), (day, at));
        }
    }

    #[test]
    fn local_zone_windows_start_at_local_midnight() {
        for day in [date!(2024 - 01 - 15), date!(2024 - 07 - 15)] {
            let window = DayWindow::new(day, Zone::Local);
            let start = from_millis(window.start, Zone::Local).unwrap();
            assert_eq!((start.date(), start.time()), (day, Time::MIDNIGHT));
        }
    }

    #[test]
    fn parses_input_values() {
        assert_eq!(parse_date("2024-11-01"), Some(date!(2024 - 11 - 01)));
        assert_eq!(parse_date("11/01/2024"), None);
        assert_eq!(parse_time("07:30"), Some(time!(07:30)));
        assert_eq!(parse_time("20:10:00"), Some(time!(20:10)));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn next_day_never_passes_today() {
        let today = date!(2024 - 11 - 03);
        assert_eq!(next_day_clamped(date!(2024 - 11 - 01), today), date!(2024 - 11 - 02));
        assert_eq!(next_day_clamped(today, today), today);
        assert_eq!(next_day_clamped(date!(2024 - 11 - 09), today), today);
    }

    #[test]
    fn trailing_days_end_at_anchor() {
        let days = trailing_days(date!(2024 - 11 - 14), 14);
        assert_eq!(days.len(), 14);
        assert_eq!(days.first(), Some(&date!(2024 - 11 - 01)));
        assert_eq!(days.last(), Some(&date!(2024 - 11 - 14)));
    }

    #[test]
    fn keys_round_trip_through_inputs() {
        assert_eq!(date_key(date!(2024 - 01 - 05)), "2024-01-05");
        assert_eq!(time_key(time!(09:00)), "09:00");
    }
}
