//! Dialog state for the dashboard. Exactly one dialog is open at a time and
//! each variant carries only the draft it edits; drafts are thrown away
//! unless the user saves.

use thiserror::Error;
use time::{macros::time, Date};

use crate::core::catalog::{self, CardDefinition, ValueKind};
use crate::core::entry::{EpochMillis, MetricValue};
use crate::core::prefs::{ConnectedService, FeatureFlags, UserProfile};
use crate::core::store::{Collision, MetricWrite, RecordStore};
use crate::core::timing::{self, Zone};

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    DatePicker { draft: Date },
    Configure(ConfigureDraft),
    Settings(SettingsDraft),
    Entry(EntryDraft),
    ConfirmOverwrite {
        draft: EntryDraft,
        collisions: Vec<Collision>,
    },
    Chart { card: &'static CardDefinition },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),
    #[error("\"{0}\" is not a valid time")]
    InvalidTime(String),
    #[error("enter at least one value before saving")]
    NoValues,
}

/// Result of pressing Save in the entry dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Nothing collides; apply these writes.
    Commit(Vec<MetricWrite>),
    /// Existing readings would be replaced; ask first.
    Confirm(Dialog),
    Invalid(EntryError),
}

/// One row of the "entries on this day" list: a timestamp and each card
/// metric's value at it.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntryRow {
    pub timestamp: EpochMillis,
    pub values: Vec<MetricValue>,
}

/// Draft for recording (or editing) the readings of one card.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub card: &'static CardDefinition,
    /// One value per card metric, in card order.
    pub values: Vec<MetricValue>,
    /// Raw `YYYY-MM-DD` date input.
    pub date: String,
    /// Raw `HH:MM` time input.
    pub time: String,
    /// Set when the draft edits an existing reading.
    pub edit_timestamp: Option<EpochMillis>,
    /// Per card metric, whether a reading exists at `edit_timestamp`.
    pub stored: Vec<bool>,
    pub error: Option<String>,
}

impl EntryDraft {
    /// Open a draft for `day`, prefilled with the values currently shown.
    /// The time defaults to now for today and 09:00 for past days.
    pub fn open(
        card: &'static CardDefinition,
        records: &RecordStore,
        day: Date,
        zone: Zone,
        now: EpochMillis,
    ) -> Self {
        let values = card
            .metrics
            .iter()
            .map(|metric| {
                records
                    .select_for_day(metric, day, zone)
                    .map(|r| r.value)
                    .unwrap_or_default()
            })
            .collect();

        let now_local = timing::from_millis(now, zone);
        let time = match now_local {
            Some(at) if at.date() == day => timing::time_key(at.time()),
            _ => timing::time_key(time!(09:00)),
        };

        Self {
            card,
            values,
            date: timing::date_key(day),
            time,
            edit_timestamp: None,
            stored: vec![false; card.metrics.len()],
            error: None,
        }
    }

    /// Switch the draft to editing the readings stored at `timestamp`.
    pub fn edit_existing(&mut self, records: &RecordStore, timestamp: EpochMillis, zone: Zone) {
        let existing: Vec<Option<MetricValue>> = self
            .card
            .metrics
            .iter()
            .map(|metric| {
                records
                    .series(metric)
                    .and_then(|s| s.entry_at(timestamp))
                    .map(|e| e.value)
            })
            .collect();
        self.stored = existing.iter().map(Option::is_some).collect();
        self.values = existing.into_iter().map(Option::unwrap_or_default).collect();
        if let Some(at) = timing::from_millis(timestamp, zone) {
            self.date = timing::date_key(at.date());
            self.time = timing::time_key(at.time());
        }
        self.edit_timestamp = Some(timestamp);
        self.error = None;
    }

    pub fn set_value(&mut self, index: usize, value: MetricValue) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Parse raw numeric input; blank or unparseable text clears the value.
    pub fn set_numeric_input(&mut self, index: usize, raw: &str) {
        let value = raw.trim().parse::<f64>().ok().filter(|n| n.is_finite());
        self.set_value(index, value.into());
    }

    /// Instant the draft's date and time describe. An empty time means 09:00.
    pub fn timestamp(&self, zone: Zone) -> Result<EpochMillis, EntryError> {
        let date = timing::parse_date(&self.date)
            .ok_or_else(|| EntryError::InvalidDate(self.date.clone()))?;
        let time = if self.time.trim().is_empty() {
            time!(09:00)
        } else {
            timing::parse_time(&self.time).ok_or_else(|| EntryError::InvalidTime(self.time.clone()))?
        };
        Ok(timing::local_millis(date, time, zone))
    }

    /// The writes this draft produces. Empty values are skipped, except when
    /// editing a metric that had a reading at the edited instant, so a
    /// cleared value sticks without adding empty readings for the others.
    pub fn writes(&self, zone: Zone) -> Result<Vec<MetricWrite>, EntryError> {
        let timestamp = self.timestamp(zone)?;
        let had_reading = |index: usize| self.stored.get(index).copied().unwrap_or(false);
        let writes: Vec<MetricWrite> = self
            .card
            .metrics
            .iter()
            .zip(self.values.iter())
            .enumerate()
            .map(|(index, (metric, value))| {
                let edit_timestamp = self.edit_timestamp.filter(|_| had_reading(index));
                (metric, *value, edit_timestamp)
            })
            .filter(|(_, value, edit_timestamp)| edit_timestamp.is_some() || !value.is_empty())
            .map(|(metric, value, edit_timestamp)| MetricWrite {
                metric: metric.to_string(),
                input_value: value,
                timestamp,
                edit_timestamp,
                source: None,
            })
            .collect();

        if writes.is_empty() {
            return Err(EntryError::NoValues);
        }
        Ok(writes)
    }

    /// Validate, then either commit directly or ask for overwrite consent.
    pub fn submit(&self, records: &RecordStore, zone: Zone) -> SaveOutcome {
        let writes = match self.writes(zone) {
            Ok(writes) => writes,
            Err(err) => return SaveOutcome::Invalid(err),
        };
        let collisions = records.collisions(&writes);
        if collisions.is_empty() {
            SaveOutcome::Commit(writes)
        } else {
            SaveOutcome::Confirm(Dialog::ConfirmOverwrite {
                draft: self.clone(),
                collisions,
            })
        }
    }
}

/// Readings of `card` on `day`, grouped by timestamp, oldest first.
pub fn day_entries(
    card: &CardDefinition,
    records: &RecordStore,
    day: Date,
    zone: Zone,
) -> Vec<DayEntryRow> {
    let mut stamps: Vec<EpochMillis> = card
        .metrics
        .iter()
        .flat_map(|metric| records.entries_for_day(metric, day, zone))
        .map(|entry| entry.timestamp)
        .collect();
    stamps.sort_unstable();
    stamps.dedup();

    stamps
        .into_iter()
        .map(|timestamp| DayEntryRow {
            timestamp,
            values: card
                .metrics
                .iter()
                .map(|metric| {
                    records
                        .series(metric)
                        .and_then(|s| s.entry_at(timestamp))
                        .map(|e| e.value)
                        .unwrap_or_default()
                })
                .collect(),
        })
        .collect()
}

/// Kind of the input control for the `index`-th metric of a draft.
pub fn input_kind(draft: &EntryDraft, index: usize) -> Option<ValueKind> {
    draft
        .card
        .metrics
        .get(index)
        .and_then(|name| catalog::metric(name))
        .map(|m| m.kind)
}

/// Draft of the dashboard layout: which cards are active and in what order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigureDraft {
    pub active: Vec<String>,
    pub flags: FeatureFlags,
    /// Card currently being dragged.
    pub dragging: Option<String>,
    /// Active-list index a drop would insert before.
    pub drop_hint: Option<usize>,
}

impl ConfigureDraft {
    pub fn new(active: &[String], flags: &FeatureFlags) -> Self {
        Self {
            active: active.to_vec(),
            flags: flags.clone(),
            dragging: None,
            drop_hint: None,
        }
    }

    /// Inactive cards, sorted by title.
    pub fn available(&self) -> Vec<&'static CardDefinition> {
        let mut cards: Vec<_> = catalog::CARDS
            .iter()
            .filter(|c| !self.active.iter().any(|name| name == c.name))
            .collect();
        cards.sort_by(|a, b| a.title.cmp(b.title));
        cards
    }

    pub fn activate(&mut self, name: &str) {
        if catalog::card(name).is_some() && !self.active.iter().any(|n| n == name) {
            self.active.push(name.to_string());
        }
        self.clear_drag();
    }

    pub fn deactivate(&mut self, name: &str) {
        self.active.retain(|n| n != name);
        self.clear_drag();
    }

    /// Move (or add) `name` so it sits before the card currently at
    /// `target`. Moving an item forward shifts the target left by one
    /// because the item's old slot disappears first.
    pub fn insert_at(&mut self, name: &str, target: usize) {
        if catalog::card(name).is_none() {
            return;
        }
        let mut target = target;
        if let Some(existing) = self.active.iter().position(|n| n == name) {
            self.active.remove(existing);
            if existing < target {
                target = target.saturating_sub(1);
            }
        }
        let target = target.min(self.active.len());
        self.active.insert(target, name.to_string());
        self.clear_drag();
    }

    pub fn move_up(&mut self, name: &str) {
        if let Some(idx) = self.active.iter().position(|n| n == name) {
            if idx > 0 {
                self.active.swap(idx, idx - 1);
            }
        }
    }

    pub fn move_down(&mut self, name: &str) {
        if let Some(idx) = self.active.iter().position(|n| n == name) {
            if idx + 1 < self.active.len() {
                self.active.swap(idx, idx + 1);
            }
        }
    }

    /// Finish a drag over the active list at `target` (or at the end).
    pub fn drop_into_active(&mut self, target: Option<usize>) {
        if let Some(name) = self.dragging.take() {
            let target = target.unwrap_or(self.active.len());
            self.insert_at(&name, target);
        }
        self.clear_drag();
    }

    /// Finish a drag over the available list.
    pub fn drop_into_available(&mut self) {
        if let Some(name) = self.dragging.take() {
            self.deactivate(&name);
        }
        self.clear_drag();
    }

    fn clear_drag(&mut self) {
        self.dragging = None;
        self.drop_hint = None;
    }
}

/// Connected-service form. The password never leaves the draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDraft {
    pub provider: String,
    pub username: String,
    pub password: String,
}

impl Default for ServiceDraft {
    fn default() -> Self {
        Self {
            provider: catalog::SERVICE_PROVIDERS[0].to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    pub user: UserProfile,
    pub adding_service: Option<ServiceDraft>,
}

impl SettingsDraft {
    pub fn new(user: &UserProfile) -> Self {
        Self {
            user: user.clone(),
            adding_service: None,
        }
    }

    pub fn start_adding_service(&mut self) {
        self.adding_service = Some(ServiceDraft::default());
    }

    pub fn cancel_adding_service(&mut self) {
        self.adding_service = None;
    }

    pub fn confirm_service(&mut self) {
        if let Some(draft) = self.adding_service.take() {
            self.user
                .services
                .push(ConnectedService::new(draft.provider, draft.username.trim()));
        }
    }

    pub fn remove_service(&mut self, id: &str) {
        self.user.services.retain(|s| s.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::card;
    use time::macros::date;

    const UTC: Zone = Zone::UTC;

    fn at(day: Date, t: time::Time) -> EpochMillis {
        timing::local_millis(day, t, UTC)
    }

    fn store_with(metric: &str, ts: EpochMillis, value: f64) -> RecordStore {
        let mut store = RecordStore::new();
        store.upsert(
            MetricWrite {
                metric: metric.into(),
                input_value: MetricValue::Number(value),
                timestamp: ts,
                edit_timestamp: None,
                source: None,
            },
            ts,
        );
        store
    }

    #[test]
    fn open_defaults_time_by_day() {
        let day = date!(2024 - 11 - 02);
        let weight = card("weight").unwrap();
        let store = RecordStore::new();

        let today = EntryDraft::open(weight, &store, day, UTC, at(day, time!(14:37)));
        assert_eq!(today.time, "14:37");
        assert_eq!(today.date, "2024-11-02");

        let later = EntryDraft::open(weight, &store, day, UTC, at(date!(2024 - 11 - 05), time!(14:37)));
        assert_eq!(later.time, "09:00");
        assert_eq!(later.values, vec![MetricValue::Empty]);
    }

    #[test]
    fn invalid_date_or_time_is_rejected() {
        let day = date!(2024 - 11 - 02);
        let mut draft = EntryDraft::open(card("weight").unwrap(), &RecordStore::new(), day, UTC, 0);
        draft.set_numeric_input(0, "172");

        draft.date = "2024-13-40".into();
        assert_eq!(
            draft.submit(&RecordStore::new(), UTC),
            SaveOutcome::Invalid(EntryError::InvalidDate("2024-13-40".into()))
        );

        draft.date = "2024-11-02".into();
        draft.time = "7pm".into();
        assert!(matches!(
            draft.submit(&RecordStore::new(), UTC),
            SaveOutcome::Invalid(EntryError::InvalidTime(_))
        ));

        draft.time = String::new();
        assert_eq!(draft.timestamp(UTC), Ok(at(day, time!(09:00))));
    }

    #[test]
    fn empty_new_draft_has_nothing_to_save() {
        let day = date!(2024 - 11 - 02);
        let mut draft = EntryDraft::open(card("weight").unwrap(), &RecordStore::new(), day, UTC, 0);
        draft.set_numeric_input(0, "  ");
        assert_eq!(draft.writes(UTC), Err(EntryError::NoValues));
    }

    #[test]
    fn collision_requires_confirmation_and_decline_keeps_value() {
        let day = date!(2024 - 11 - 02);
        let ts = at(day, time!(07:40));
        let store = store_with("weight", ts, 172.5);

        let mut draft = EntryDraft::open(card("weight").unwrap(), &store, day, UTC, ts);
        draft.set_numeric_input(0, "180");
        assert_eq!(draft.time, "07:40");

        let outcome = draft.submit(&store, UTC);
        let SaveOutcome::Confirm(Dialog::ConfirmOverwrite { draft: pending, collisions }) = outcome else {
            panic!("expected a confirmation step");
        };
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].existing.value, MetricValue::Number(172.5));
        assert_eq!(pending, draft);

        // Declining simply drops the pending writes.
        assert_eq!(
            store.select_for_day("weight", day, UTC).unwrap().value,
            MetricValue::Number(172.5)
        );
    }

    #[test]
    fn editing_moves_without_confirmation() {
        let day = date!(2024 - 11 - 02);
        let old = at(day, time!(07:40));
        let mut store = store_with("weight", old, 172.5);

        let mut draft = EntryDraft::open(card("weight").unwrap(), &store, day, UTC, 0);
        draft.edit_existing(&store, old, UTC);
        assert_eq!(draft.time, "07:40");
        draft.time = "08:15".into();
        draft.set_numeric_input(0, "172");

        let SaveOutcome::Commit(writes) = draft.submit(&store, UTC) else {
            panic!("edit should commit directly");
        };
        store.apply(writes, 0);
        let series = store.series("weight").unwrap();
        assert!(series.entry_at(old).is_none());
        assert_eq!(series.entries().len(), 1);
        assert_eq!(series.entries()[0].timestamp, at(day, time!(08:15)));
    }

    #[test]
    fn editing_one_metric_leaves_other_readings_visible() {
        let day = date!(2024 - 11 - 02);
        let (morning, noon) = (at(day, time!(08:30)), at(day, time!(12:30)));
        let mut store = RecordStore::new();
        for (metric, ts, value) in [("systolic", morning, 134.0), ("diastolic", morning, 80.0), ("systolic", noon, 128.0)] {
            store.upsert(
                MetricWrite {
                    metric: metric.into(),
                    input_value: MetricValue::Number(value),
                    timestamp: ts,
                    edit_timestamp: None,
                    source: None,
                },
                0,
            );
        }

        let bp = card("blood-pressure").unwrap();
        let mut draft = EntryDraft::open(bp, &store, day, UTC, 0);
        draft.edit_existing(&store, noon, UTC);
        assert_eq!(draft.stored, vec![true, false, false]);
        draft.set_numeric_input(0, "126");

        let SaveOutcome::Commit(writes) = draft.submit(&store, UTC) else {
            panic!("edit should commit directly");
        };
        assert_eq!(writes.len(), 1);
        store.apply(writes, 0);

        assert_eq!(
            store.select_for_day("diastolic", day, UTC).unwrap().value,
            MetricValue::Number(80.0)
        );
        assert!(store.series("losartan").map_or(true, |s| s.entries().is_empty()));
        assert_eq!(
            store.select_for_day("systolic", day, UTC).unwrap().value,
            MetricValue::Number(126.0)
        );
    }

    #[test]
    fn clearing_an_edited_value_writes_it_empty() {
        let day = date!(2024 - 11 - 02);
        let ts = at(day, time!(07:40));
        let mut store = store_with("weight", ts, 172.5);

        let mut draft = EntryDraft::open(card("weight").unwrap(), &store, day, UTC, 0);
        draft.edit_existing(&store, ts, UTC);
        draft.set_numeric_input(0, "");

        let writes = draft.writes(UTC).unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].input_value, MetricValue::Empty);
        assert_eq!(writes[0].edit_timestamp, Some(ts));
        store.apply(writes, 0);
        assert_eq!(store.series("weight").unwrap().entries().len(), 1);
    }

    #[test]
    fn day_entries_group_card_metrics() {
        let day = date!(2024 - 11 - 02);
        let mut store = RecordStore::new();
        for (t, sys, dia) in [(time!(08:30), 134.0, 88.0), (time!(20:10), 121.0, 79.0)] {
            for (metric, value) in [("systolic", sys), ("diastolic", dia)] {
                store.upsert(
                    MetricWrite {
                        metric: metric.into(),
                        input_value: MetricValue::Number(value),
                        timestamp: at(day, t),
                        edit_timestamp: None,
                        source: None,
                    },
                    0,
                );
            }
        }

        let rows = day_entries(card("blood-pressure").unwrap(), &store, day, UTC);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1].values,
            vec![MetricValue::Number(121.0), MetricValue::Number(79.0), MetricValue::Empty]
        );
    }

    #[test]
    fn insert_at_adjusts_forward_moves() {
        let mut draft = ConfigureDraft::new(
            &["weight".into(), "heart".into(), "glucose".into()],
            &FeatureFlags::default(),
        );
        draft.insert_at("weight", 2);
        assert_eq!(draft.active, vec!["heart", "weight", "glucose"]);

        draft.insert_at("glucose", 0);
        assert_eq!(draft.active, vec!["glucose", "heart", "weight"]);

        draft.insert_at("tired", 99);
        assert_eq!(draft.active.last().map(String::as_str), Some("tired"));
    }

    #[test]
    fn drag_between_lists() {
        let mut draft = ConfigureDraft::new(&["weight".into()], &FeatureFlags::default());
        assert!(draft.available().iter().all(|c| c.name != "weight"));
        let titles: Vec<_> = draft.available().iter().map(|c| c.title).collect();
        let mut sorted = titles.clone();
        sorted.sort();
        assert_eq!(titles, sorted);

        draft.dragging = Some("heart".into());
        draft.drop_into_active(Some(0));
        assert_eq!(draft.active, vec!["heart", "weight"]);

        draft.dragging = Some("weight".into());
        draft.drop_into_available();
        assert_eq!(draft.active, vec!["heart"]);
        assert!(draft.dragging.is_none());
    }

    #[test]
    fn services_are_added_and_removed() {
        let mut draft = SettingsDraft::new(&UserProfile::default());
        draft.start_adding_service();
        if let Some(service) = draft.adding_service.as_mut() {
            service.provider = "Dexcom".into();
            service.username = " ray ".into();
            service.password = "secret".into();
        }
        draft.confirm_service();
        assert_eq!(draft.user.services.len(), 1);
        assert_eq!(draft.user.services[0].username, "ray");

        let id = draft.user.services[0].id.clone();
        draft.remove_service(&id);
        assert!(draft.user.services.is_empty());
    }
}
