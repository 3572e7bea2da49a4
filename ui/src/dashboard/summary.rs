
use crate::core::catalog::{CardDefinition, MetricDefinition, EMPTY_COLOR};
use crate::core::format;
use crate::core::store::{RecordStore, ViewMode};
use crate::core::{EpochMillis, Reading, Zone};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    pub metric: &'static MetricDefinition,
    pub reading: Option<Reading>,
}

impl MetricReading {
    pub fn has_value(&self) -> bool {
        self.reading.as_ref().is_some_and(|r| !r.value.is_empty())
    }

    pub fn display(&self) -> String {
        match &self.reading {
            Some(reading) => format::format_value(self.metric, reading.value),
            None => format::PLACEHOLDER.to_string(),
        }
    }
}

/// Everything a dashboard card shows for the current view mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSummary {
    pub card: &'static CardDefinition,
    pub readings: Vec<MetricReading>,
}

impl CardSummary {
    pub fn build(
        card: &'static CardDefinition,
        records: &RecordStore,
        mode: ViewMode,
        zone: Zone,
    ) -> Self {
        let readings = card
            .metric_definitions()
            .map(|metric| MetricReading {
                metric,
                reading: records.select(metric.name, mode, zone),
            })
            .collect();
        Self { card, readings }
    }

    pub fn has_value(&self) -> bool {
        self.readings.iter().any(MetricReading::has_value)
    }

    /// Icon and value colour: the card accent when there is data, grey
    /// otherwise.
    pub fn color(&self) -> &'static str {
        if self.has_value() {
            self.card.accent()
        } else {
            EMPTY_COLOR
        }
    }

    /// `(label, value)` lines. Single-metric cards show the bare value;
    /// grouped cards prefix each value with the metric name.
    pub fn lines(&self) -> Vec<(Option<String>, String)> {
        let labelled = self.readings.len() > 1;
        self.readings
            .iter()
            .map(|r| {
                let label = labelled.then(|| format::sentence_case(r.metric.name));
                (label, r.display())
            })
            .collect()
    }

    /// Timestamp of the first metric that has one.
    pub fn updated_at(&self) -> Option<EpochMillis> {
        self.readings
            .iter()
            .filter_map(|r| r.reading.as_ref())
            .find_map(|r| r.timestamp)
    }

    /// Largest number of readings any metric matched; shown as a badge when
    /// a day holds several readings.
    pub fn entry_count(&self) -> usize {
        self.readings
            .iter()
            .filter_map(|r| r.reading.as_ref())
            .map(|r| r.match_count)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::card;
    use crate::core::store::MetricWrite;
    use crate::core::{timing, MetricValue};
    use time::macros::{date, time};

    const UTC: Zone = Zone::UTC;

    fn put(store: &mut RecordStore, metric: &str, ts: EpochMillis, value: MetricValue) {
        store.upsert(
            MetricWrite {
                metric: metric.into(),
                input_value: value,
                timestamp: ts,
                edit_timestamp: None,
                source: None,
            },
            ts,
        );
    }

    #[test]
    fn day_and_latest_modes_differ() {
        let nov1 = date!(2024 - 11 - 01);
        let nov2 = date!(2024 - 11 - 02);
        let mut store = RecordStore::new();
        put(&mut store, "weight", timing::local_millis(nov1, time!(07:30), UTC), 173.0.into());
        put(&mut store, "weight", timing::local_millis(nov2, time!(07:40), UTC), 172.5.into());
        let weight = card("weight").unwrap();

        let day = CardSummary::build(weight, &store, ViewMode::Day(nov1), UTC);
        assert_eq!(day.lines(), vec![(None, "173 lbs".to_string())]);

        let latest = CardSummary::build(weight, &store, ViewMode::Latest, UTC);
        assert_eq!(latest.lines(), vec![(None, "172.5 lbs".to_string())]);

        let empty = CardSummary::build(weight, &store, ViewMode::Day(date!(2024 - 11 - 03)), UTC);
        assert!(!empty.has_value());
        assert_eq!(empty.color(), EMPTY_COLOR);
        assert_eq!(empty.updated_at(), None);
    }

    #[test]
    fn grouped_card_labels_and_badge() {
        let day = date!(2024 - 11 - 02);
        let mut store = RecordStore::new();
        for (t, v) in [(time!(08:30), 134.0), (time!(12:30), 128.0), (time!(20:10), 121.0)] {
            put(&mut store, "systolic", timing::local_millis(day, t, UTC), v.into());
        }
        put(&mut store, "losartan", timing::local_millis(day, time!(08:00), UTC), true.into());

        let summary = CardSummary::build(card("blood-pressure").unwrap(), &store, ViewMode::Day(day), UTC);
        let lines = summary.lines();
        assert_eq!(lines[0], (Some("Systolic".to_string()), "121 mmHg".to_string()));
        assert_eq!(lines[1].1, format::PLACEHOLDER);
        assert_eq!(lines[2], (Some("Losartan".to_string()), "Yes".to_string()));
        assert_eq!(summary.entry_count(), 3);
        assert_eq!(summary.updated_at(), Some(timing::local_millis(day, time!(20:10), UTC)));
    }

    #[test]
    fn latest_badge_counts_only_the_latest_day() {
        let nov1 = date!(2024 - 11 - 01);
        let nov2 = date!(2024 - 11 - 02);
        let mut store = RecordStore::new();
        for (day, t, v) in [(nov1, time!(07:30), 173.0), (nov1, time!(19:00), 173.6), (nov2, time!(07:40), 172.5)] {
            put(&mut store, "weight", timing::local_millis(day, t, UTC), v.into());
        }
        let weight = card("weight").unwrap();

        let latest = CardSummary::build(weight, &store, ViewMode::Latest, UTC);
        assert_eq!(latest.lines(), vec![(None, "172.5 lbs".to_string())]);
        assert_eq!(latest.entry_count(), 1);

        put(&mut store, "weight", timing::local_millis(nov2, time!(21:15), UTC), 172.1.into());
        let latest = CardSummary::build(weight, &store, ViewMode::Latest, UTC);
        assert_eq!(latest.entry_count(), 2);
    }
}
