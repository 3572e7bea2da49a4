//! Formatting helpers for presenting readings.

use time::{macros::format_description, Date, OffsetDateTime};

use super::catalog::{MetricDefinition, ValueKind};
use super::entry::{EpochMillis, MetricValue};
use super::timing::{self, Zone};

pub const PLACEHOLDER: &str = "—";

/// Display string for a value according to its metric kind.
pub fn format_value(metric: &MetricDefinition, value: MetricValue) -> String {
    match metric.kind {
        ValueKind::Boolean => match value.as_flag() {
            Some(true) => "Yes".to_string(),
            Some(false) => "No".to_string(),
            None => PLACEHOLDER.to_string(),
        },
        ValueKind::Scale0To10 => value
            .as_number()
            .map(format_number)
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        ValueKind::Numeric => match value.as_number() {
            Some(n) if metric.unit.is_empty() => format_number(n),
            Some(n) => format!("{} {}", format_number(n), metric.unit),
            None => PLACEHOLDER.to_string(),
        },
    }
}

/// Integers without decimals, everything else with at most one.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let rounded = format!("{value:.1}");
        rounded.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// 12-hour clock such as `7:30 AM`.
pub fn format_clock(ms: EpochMillis, zone: Zone) -> Option<String> {
    timing::from_millis(ms, zone).map(clock)
}

fn clock(at: OffsetDateTime) -> String {
    let (hour, meridiem) = match at.hour() {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    format!("{hour}:{:02} {meridiem}", at.minute())
}

/// `Sat, Nov 2, 2024`
pub fn format_day_heading(date: Date) -> String {
    date.format(&format_description!(
        "[weekday repr:short], [month repr:short] [day padding:none], [year]"
    ))
    .unwrap_or_else(|_| timing::date_key(date))
}

/// `Sat, Nov 2, 2024, 7:30 PM`
pub fn format_now(at: OffsetDateTime) -> String {
    format!("{}, {}", format_day_heading(at.date()), clock(at))
}

/// `Nov 2 · 7:30 PM`, used by history rows.
pub fn format_stamp(ms: EpochMillis, zone: Zone) -> String {
    let Some(at) = timing::from_millis(ms, zone) else {
        return PLACEHOLDER.to_string();
    };
    let day = at
        .format(&format_description!("[month repr:short] [day padding:none]"))
        .unwrap_or_else(|_| PLACEHOLDER.to_string());
    format!("{day} · {}", clock(at))
}

/// `11/2`, the x-axis label for chart points.
pub fn format_axis_day(date: Date) -> String {
    format!("{}/{}", date.month() as u8, date.day())
}

/// First letter upper case, the rest lower case.
pub fn sentence_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            0..=11 => DayPart::Morning,
            12..=16 => DayPart::Afternoon,
            _ => DayPart::Evening,
        }
    }
}
