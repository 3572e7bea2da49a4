//! In-memory record store: one [`MetricSeries`] per metric plus the legacy
//! per-day snapshots older blobs carried.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use super::entry::{Entry, EpochMillis, MetricValue, MANUAL_SOURCE};
use super::series::{parse_iso_millis, MetricSeries, Reading, ReadingOrigin};
use super::timing::{self, DayWindow, Zone};

/// Which reading(s) the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Most recent reading within one calendar day.
    Day(Date),
    /// Most recent reading regardless of day.
    Latest,
    /// Every reading of one metric, newest first.
    History,
}

/// Legacy per-day snapshot: loosely typed named fields such as
/// `{ "weight": 172, "weightUpdatedAt": "2024-08-15T09:10:00Z" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DayRecord {
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl DayRecord {
    pub fn value(&self, metric: &str) -> Option<MetricValue> {
        self.fields
            .get(metric)
            .map(MetricValue::from_json)
            .filter(|v| !v.is_empty())
    }

    pub fn updated_at(&self, metric: &str) -> Option<EpochMillis> {
        self.fields
            .get(&format!("{metric}UpdatedAt"))
            .and_then(|v| v.as_str())
            .and_then(parse_iso_millis)
    }

    fn reading(&self, metric: &str) -> Option<Reading> {
        self.value(metric).map(|value| Reading {
            value,
            timestamp: self.updated_at(metric),
            source: None,
            match_count: 1,
            origin: ReadingOrigin::DayRecord,
        })
    }
}

/// A value crossing into the store from the entry dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWrite {
    pub metric: String,
    pub input_value: MetricValue,
    pub timestamp: EpochMillis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_timestamp: Option<EpochMillis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl MetricWrite {
    /// True when the write would replace an entry other than the one being
    /// edited.
    fn collides_with(&self, existing: &Entry) -> bool {
        existing.timestamp == self.timestamp && self.edit_timestamp != Some(self.timestamp)
    }
}

/// An existing entry a pending write would overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub metric: String,
    pub existing: Entry,
    pub incoming: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecordStore {
    #[serde(default, rename = "dataPoints")]
    series: BTreeMap<String, MetricSeries>,
    /// Older blobs kept day snapshots at the top level, keyed `YYYY-MM-DD`.
    #[serde(flatten)]
    day_records: BTreeMap<String, DayRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, metric: &str) -> Option<&MetricSeries> {
        self.series.get(metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn insert_series(&mut self, metric: impl Into<String>, series: MetricSeries) {
        self.series.insert(metric.into(), series);
    }

    pub fn insert_day_record(&mut self, date: Date, record: DayRecord) {
        self.day_records.insert(timing::date_key(date), record);
    }

    /// Restore series invariants after loading a blob.
    pub fn normalize(&mut self) {
        for series in self.series.values_mut() {
            series.normalize();
        }
    }

    /// Existing entries that `writes` would overwrite without being edits of
    /// those same entries. The caller must confirm before applying.
    pub fn collisions(&self, writes: &[MetricWrite]) -> Vec<Collision> {
        writes
            .iter()
            .filter_map(|write| {
                let existing = self.series(&write.metric)?.entry_at(write.timestamp)?;
                write.collides_with(existing).then(|| Collision {
                    metric: write.metric.clone(),
                    existing: existing.clone(),
                    incoming: write.input_value,
                })
            })
            .collect()
    }

    /// Apply one write unconditionally.
    pub fn upsert(&mut self, write: MetricWrite, recorded_at: EpochMillis) {
        let source = write.source.unwrap_or_else(|| MANUAL_SOURCE.to_string());
        let entry = Entry::new(write.timestamp, write.input_value, recorded_at, source);
        self.series
            .entry(write.metric)
            .or_default()
            .upsert(entry, write.edit_timestamp);
    }

    pub fn apply(&mut self, writes: Vec<MetricWrite>, recorded_at: EpochMillis) {
        for write in writes {
            self.upsert(write, recorded_at);
        }
    }

    /// Reading for `metric` on `day`: entries first, then the series' legacy
    /// map, then the legacy day record.
    pub fn select_for_day(&self, metric: &str, day: Date, zone: Zone) -> Option<Reading> {
        let window = DayWindow::new(day, zone);
        self.series(metric)
            .and_then(|s| s.select_for_day(&window, zone))
            .or_else(|| self.day_record_reading(metric, day))
    }

    /// Most recent reading for `metric` over all time, with the same
    /// fallback chain as [`Self::select_for_day`].
    pub fn select_latest(&self, metric: &str, zone: Zone) -> Option<Reading> {
        self.series(metric)
            .and_then(|s| s.select_latest(zone))
            .or_else(|| {
                self.day_records
                    .iter()
                    .rev()
                    .filter(|(key, _)| timing::parse_date(key).is_some())
                    .find_map(|(_, record)| record.reading(metric))
            })
    }

    pub fn select(&self, metric: &str, mode: ViewMode, zone: Zone) -> Option<Reading> {
        match mode {
            ViewMode::Day(day) => self.select_for_day(metric, day, zone),
            ViewMode::Latest | ViewMode::History => self.select_latest(metric, zone),
        }
    }

    /// Entries of `metric` within `day`, oldest first.
    pub fn entries_for_day(&self, metric: &str, day: Date, zone: Zone) -> Vec<Entry> {
        let window = DayWindow::new(day, zone);
        self.series(metric)
            .map(|s| s.entries_in(&window).to_vec())
            .unwrap_or_default()
    }

    /// Every reading of `metric`, newest first.
    pub fn history(&self, metric: &str, zone: Zone) -> Vec<Reading> {
        self.series(metric)
            .map(|s| s.history(zone))
            .unwrap_or_default()
    }

    fn day_record_reading(&self, metric: &str, day: Date) -> Option<Reading> {
        self.day_records
            .get(&timing::date_key(day))
            .and_then(|record| record.reading(metric))
    }

    /// A few readings around `today` so a first run has something to show.
    pub fn sample(today: Date, zone: Zone, now: EpochMillis) -> Self {
        let mut store = Self::new();
        let yesterday = timing::previous_day(today);
        let mut seed = |metric: &str, day: Date, hour: u8, minute: u8, value: MetricValue| {
            let Ok(time) = Time::from_hms(hour, minute, 0) else {
                return;
            };
            let timestamp = timing::local_millis(day, time, zone).min(now);
            store.upsert(
                MetricWrite {
                    metric: metric.to_string(),
                    input_value: value,
                    timestamp,
                    edit_timestamp: None,
                    source: None,
                },
                now,
            );
        };

        seed("weight", yesterday, 7, 30, MetricValue::Number(173.0));
        seed("heart", yesterday, 8, 15, MetricValue::Number(88.0));
        seed("glucose", yesterday, 8, 5, MetricValue::Number(110.0));
        seed("systolic", yesterday, 9, 10, MetricValue::Number(130.0));
        seed("diastolic", yesterday, 9, 10, MetricValue::Number(85.0));
        seed("weight", today, 7, 40, MetricValue::Number(172.5));
        seed("heart", today, 7, 45, MetricValue::Number(76.0));
        seed("glucose", today, 7, 50, MetricValue::Number(102.0));
        seed("systolic", today, 8, 30, MetricValue::Number(120.0));
        seed("diastolic", today, 8, 30, MetricValue::Number(80.0));
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::{date, time};

    const UTC: Zone = Zone::UTC;

    fn write(metric: &str, ts: EpochMillis, value: f64) -> MetricWrite {
        MetricWrite {
            metric: metric.into(),
            input_value: MetricValue::Number(value),
            timestamp: ts,
            edit_timestamp: None,
            source: None,
        }
    }

    #[test]
    fn day_record_is_last_resort() {
        let day = date!(2024 - 08 - 15);
        let mut store = RecordStore::new();
        store.insert_day_record(
            day,
            serde_json::from_value(json!({
                "weight": 174,
                "weightUpdatedAt": "2024-08-15T09:10:00Z",
                "glucose": null
            }))
            .unwrap(),
        );

        let reading = store.select_for_day("weight", day, UTC).unwrap();
        assert_eq!(reading.origin, ReadingOrigin::DayRecord);
        assert_eq!(reading.value, MetricValue::Number(174.0));
        assert_eq!(reading.timestamp, Some(timing::local_millis(day, time!(09:10), UTC)));
        assert!(store.select_for_day("glucose", day, UTC).is_none());
        assert!(store.select_latest("weight", UTC).is_some());

        store.upsert(write("weight", timing::local_millis(day, time!(20:00), UTC), 173.0), 0);
        let reading = store.select_for_day("weight", day, UTC).unwrap();
        assert_eq!(reading.origin, ReadingOrigin::Entry);
    }

    #[test]
    fn collisions_skip_self_edits() {
        let ts = timing::local_millis(date!(2024 - 11 - 02), time!(08:30), UTC);
        let mut store = RecordStore::new();
        store.upsert(write("systolic", ts, 120.0), 0);

        assert_eq!(store.collisions(&[write("systolic", ts, 125.0)]).len(), 1);
        assert!(store.collisions(&[write("diastolic", ts, 80.0)]).is_empty());

        let mut edit = write("systolic", ts, 125.0);
        edit.edit_timestamp = Some(ts);
        assert!(store.collisions(&[edit]).is_empty());
    }

    #[test]
    fn blob_round_trip_keeps_entries() {
        let ts = timing::local_millis(date!(2024 - 11 - 02), time!(08:30), UTC);
        let mut store = RecordStore::new();
        store.upsert(write("heart", ts, 71.0), ts);

        let blob = serde_json::to_string(&store).unwrap();
        let restored: RecordStore = serde_json::from_str(&blob).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn legacy_blob_shape_loads() {
        let raw = json!({
            "dataPoints": {
                "weight": {
                    "entries": [{ "ts": 1_700_000_000_000_i64, "value": 172 }],
                    "dayValue": { "2023-11-13": { "value": 174, "updatedAt": "2023-11-13T09:10:00.000Z" } }
                },
                "tired": { "dayValue": {} }
            },
            "2023-11-12": { "tired": 6 }
        });
        let store: RecordStore = serde_json::from_value(raw).unwrap();
        let weight = store.series("weight").unwrap();
        assert_eq!(weight.entries().len(), 1);
        assert_eq!(weight.legacy().len(), 1);
        assert!(store.series("tired").unwrap().is_empty());
        let tired = store.select_latest("tired", UTC).unwrap();
        assert_eq!(tired.value, MetricValue::Number(6.0));
        assert_eq!(tired.origin, ReadingOrigin::DayRecord);
    }

    #[test]
    fn sample_has_today_and_yesterday() {
        let today = date!(2024 - 11 - 02);
        let now = timing::local_millis(today, time!(23:00), UTC);
        let store = RecordStore::sample(today, UTC, now);
        assert_eq!(
            store.select_for_day("weight", today, UTC).unwrap().value,
            MetricValue::Number(172.5)
        );
        assert_eq!(
            store.select_for_day("weight", date!(2024 - 11 - 01), UTC).unwrap().value,
            MetricValue::Number(173.0)
        );
    }
}
