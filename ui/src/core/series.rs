//! Timestamped readings for one metric plus the read-only legacy day-value map
//! carried over from older blobs.
//!
//! Precedence when answering "the value for day D":
//! 1. the latest Entry inside D's window;
//! 2. otherwise the legacy map key falling on D with the greatest instant;
//! 3. otherwise nothing (the store may still consult legacy day records).
//!
//! Writes only ever touch the Entry sequence. A write also drops legacy keys
//! for the instants it touches so the legacy map can never shadow or
//! duplicate a written value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime, Time};

use super::entry::{Entry, EpochMillis, MetricValue};
use super::timing::{self, DayWindow, Zone};

/// Where a [`Reading`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOrigin {
    Entry,
    LegacyMap,
    DayRecord,
}

/// The value the UI shows for a metric under some selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub value: MetricValue,
    pub timestamp: Option<EpochMillis>,
    pub source: Option<String>,
    /// Number of candidate readings that matched the query. The badge on a
    /// card shows this when it is above one.
    pub match_count: usize,
    pub origin: ReadingOrigin,
}

impl Reading {
    fn from_entry(entry: &Entry, match_count: usize) -> Self {
        Self {
            value: entry.value,
            timestamp: Some(entry.timestamp),
            source: Some(entry.source.clone()),
            match_count,
            origin: ReadingOrigin::Entry,
        }
    }
}

/// Legacy per-day value (`dayValue[key]` in older blobs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LegacyValue {
    #[serde(default)]
    pub value: MetricValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Legacy keys are either epoch-millis digits or `YYYY-MM-DD` dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKey {
    Instant(EpochMillis),
    Day(time::Date),
}

impl LegacyKey {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse().ok().map(LegacyKey::Instant);
        }
        timing::parse_date(raw).map(LegacyKey::Day)
    }

    /// Instant used for ordering. Date keys sort at their local midnight.
    pub fn instant(&self, zone: Zone) -> EpochMillis {
        match self {
            LegacyKey::Instant(ms) => *ms,
            LegacyKey::Day(date) => timing::local_millis(*date, Time::MIDNIGHT, zone),
        }
    }

    pub fn falls_on(&self, window: &DayWindow) -> bool {
        match self {
            LegacyKey::Instant(ms) => window.contains(*ms),
            LegacyKey::Day(date) => *date == window.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    /// Ascending by timestamp, at most one entry per timestamp.
    #[serde(default)]
    entries: Vec<Entry>,
    #[serde(default, rename = "dayValue", skip_serializing_if = "BTreeMap::is_empty")]
    legacy: BTreeMap<String, LegacyValue>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from arbitrary entries, restoring the ordering and
    /// uniqueness invariants (the later of two equal timestamps wins).
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut series = Self {
            entries,
            legacy: BTreeMap::new(),
        };
        series.normalize();
        series
    }

    pub fn with_legacy(mut self, key: impl Into<String>, value: LegacyValue) -> Self {
        self.legacy.insert(key.into(), value);
        self
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn legacy(&self) -> &BTreeMap<String, LegacyValue> {
        &self.legacy
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.legacy.is_empty()
    }

    pub fn entry_at(&self, timestamp: EpochMillis) -> Option<&Entry> {
        self.entries
            .binary_search_by_key(&timestamp, |e| e.timestamp)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Sort ascending and collapse duplicate timestamps, keeping the entry
    /// that appeared last. Used after deserializing untrusted blobs.
    pub fn normalize(&mut self) {
        // Stable sort keeps insertion order among equal timestamps.
        self.entries.sort_by_key(|e| e.timestamp);
        let mut deduped: Vec<Entry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            match deduped.last_mut() {
                Some(last) if last.timestamp == entry.timestamp => *last = entry,
                _ => deduped.push(entry),
            }
        }
        self.entries = deduped;
    }

    /// Insert `entry`, replacing whatever sits at its timestamp. When
    /// `edit_timestamp` is given the entry at that instant is removed first,
    /// which lets callers move an existing reading to a new time.
    pub fn upsert(&mut self, entry: Entry, edit_timestamp: Option<EpochMillis>) {
        if let Some(old) = edit_timestamp {
            self.entries.retain(|e| e.timestamp != old);
            self.drop_legacy_at(old);
        }
        self.drop_legacy_at(entry.timestamp);

        match self
            .entries
            .binary_search_by_key(&entry.timestamp, |e| e.timestamp)
        {
            Ok(idx) => self.entries[idx] = entry,
            Err(idx) => self.entries.insert(idx, entry),
        }
    }

    fn drop_legacy_at(&mut self, timestamp: EpochMillis) {
        self.legacy
            .retain(|key, _| LegacyKey::parse(key) != Some(LegacyKey::Instant(timestamp)));
    }

    /// Entries inside `window`, oldest first.
    pub fn entries_in(&self, window: &DayWindow) -> &[Entry] {
        let lo = self.entries.partition_point(|e| e.timestamp < window.start);
        let hi = self.entries.partition_point(|e| e.timestamp < window.end);
        &self.entries[lo..hi]
    }

    /// The reading representing `window`'s day: the latest entry in the day,
    /// or the legacy value keyed to that day.
    pub fn select_for_day(&self, window: &DayWindow, zone: Zone) -> Option<Reading> {
        let matches = self.entries_in(window);
        if let Some(current) = matches.last() {
            return Some(Reading::from_entry(current, matches.len()));
        }

        let day_legacy: Vec<(LegacyKey, &LegacyValue)> = self
            .parsed_legacy()
            .filter(|(key, _)| key.falls_on(window))
            .collect();
        let count = day_legacy.len();
        day_legacy
            .into_iter()
            .max_by_key(|(key, _)| key.instant(zone))
            .map(|(key, value)| legacy_reading(key, value, count, zone))
    }

    /// The most recent reading across all time. Its match count covers the
    /// readings on that reading's own day.
    pub fn select_latest(&self, zone: Zone) -> Option<Reading> {
        if let Some(latest) = self.entries.last() {
            let same_day = timing::date_of(latest.timestamp, zone)
                .map(|day| self.entries_in(&DayWindow::new(day, zone)).len())
                .unwrap_or(1);
            return Some(Reading::from_entry(latest, same_day));
        }

        let (key, value) = self.parsed_legacy().max_by_key(|(key, _)| key.instant(zone))?;
        let same_day = timing::date_of(key.instant(zone), zone)
            .map(|day| {
                let window = DayWindow::new(day, zone);
                self.parsed_legacy().filter(|(k, _)| k.falls_on(&window)).count()
            })
            .unwrap_or(1);
        Some(legacy_reading(key, value, same_day, zone))
    }

    /// Every reading, newest first. Legacy values are included only for days
    /// that have no entries, mirroring the day-selection precedence.
    pub fn history(&self, zone: Zone) -> Vec<Reading> {
        let mut readings: Vec<Reading> = self
            .entries
            .iter()
            .map(|entry| Reading::from_entry(entry, 1))
            .collect();

        for (key, value) in self.parsed_legacy() {
            let instant = key.instant(zone);
            let Some(day) = timing::date_of(instant, zone) else {
                continue;
            };
            let window = DayWindow::new(day, zone);
            if self.entries_in(&window).is_empty() {
                readings.push(legacy_reading(key, value, 1, zone));
            }
        }

        readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        readings
    }

    fn parsed_legacy(&self) -> impl Iterator<Item = (LegacyKey, &LegacyValue)> + '_ {
        self.legacy
            .iter()
            .filter_map(|(raw, value)| LegacyKey::parse(raw).map(|key| (key, value)))
    }
}

fn legacy_reading(
    key: LegacyKey,
    value: &LegacyValue,
    match_count: usize,
    zone: Zone,
) -> Reading {
    let timestamp = match key {
        LegacyKey::Instant(ms) => ms,
        LegacyKey::Day(_) => value
            .updated_at
            .as_deref()
            .and_then(parse_iso_millis)
            .unwrap_or_else(|| key.instant(zone)),
    };
    Reading {
        value: value.value,
        timestamp: Some(timestamp),
        source: value.source.clone(),
        match_count,
        origin: ReadingOrigin::LegacyMap,
    }
}

/// Parse an RFC 3339 timestamp (legacy `updatedAt` fields) to epoch millis.
pub fn parse_iso_millis(raw: &str) -> Option<EpochMillis> {
    OffsetDateTime::parse(raw, &Rfc3339).ok().map(timing::to_millis)
}
