//! Application state shared by every view through Dioxus context.

use dioxus::logger::tracing::info;
use dioxus::prelude::*;
use time::Date;

use crate::core::prefs::AppPreferences;
use crate::core::storage::{self, BlobStore, RECORDS_KEY};
use crate::core::store::{MetricWrite, RecordStore, ViewMode};
use crate::core::EpochMillis;
use crate::core::timing::{self, Zone};
use crate::dashboard::swipe::DayStep;

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub prefs: AppPreferences,
    pub records: RecordStore,
    pub zone: Zone,
    pub selected_day: Date,
    /// Day view when false, latest view when true.
    pub show_latest: bool,
}

impl AppState {
    pub fn load(store: &dyn BlobStore) -> Self {
        let zone = Zone::Local;
        Self::load_with(store, zone, timing::today(zone), timing::now_millis())
    }

    pub fn load_with(
        store: &dyn BlobStore,
        zone: Zone,
        today: Date,
        now: EpochMillis,
    ) -> Self {
        let prefs = AppPreferences::load(store);
        let mut records = storage::load_or_default(store, RECORDS_KEY, || {
            info!("no stored records; seeding sample readings");
            RecordStore::sample(today, zone, now)
        });
        records.normalize();

        Self {
            prefs,
            records,
            zone,
            selected_day: today,
            show_latest: false,
        }
    }

    pub fn today(&self) -> Date {
        timing::today(self.zone)
    }

    pub fn view_mode(&self) -> ViewMode {
        if self.show_latest {
            ViewMode::Latest
        } else {
            ViewMode::Day(self.selected_day)
        }
    }

    pub fn previous_day(&mut self) {
        self.selected_day = timing::previous_day(self.selected_day);
    }

    pub fn next_day(&mut self) {
        self.selected_day = timing::next_day_clamped(self.selected_day, self.today());
    }

    pub fn step_day(&mut self, step: DayStep) {
        match step {
            DayStep::Previous => self.previous_day(),
            DayStep::Next => self.next_day(),
        }
    }

    /// Show the day view for `day`, refusing dates after today.
    pub fn select_day(&mut self, day: Date) {
        self.selected_day = day.min(self.today());
        self.show_latest = false;
    }

    /// Apply confirmed writes and mirror the store to local storage.
    pub fn commit(&mut self, writes: Vec<MetricWrite>, store: &dyn BlobStore) {
        let count = writes.len();
        self.records.apply(writes, timing::now_millis());
        storage::save_best_effort(store, RECORDS_KEY, &self.records);
        info!("committed {count} reading(s)");
    }
}

/// Install the shared state at the app root. Call once from the platform
/// crate's `App` component.
pub fn use_app_state_provider() -> Signal<AppState> {
    use_context_provider(|| {
        let store = storage::platform_store();
        Signal::new(AppState::load(store.as_ref()))
    })
}

pub fn use_app_state() -> Signal<AppState> {
    use_context::<Signal<AppState>>()
}

/// Commit writes from the entry dialog through the platform store.
pub fn commit_writes(mut state: Signal<AppState>, writes: Vec<MetricWrite>) {
    let store = storage::platform_store();
    state.write().commit(writes, store.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{self, MemoryStore};
    use crate::core::MetricValue;
    use time::macros::{date, time};

    const UTC: Zone = Zone::UTC;

    #[test]
    fn first_load_seeds_sample_readings() {
        let today = date!(2024 - 11 - 02);
        let now = timing::local_millis(today, time!(12:00), UTC);
        let state = AppState::load_with(&MemoryStore::new(), UTC, today, now);

        assert_eq!(state.selected_day, today);
        assert!(!state.show_latest);
        assert!(state.records.select_for_day("weight", today, UTC).is_some());
        assert!(state.records.select_for_day("weight", timing::previous_day(today), UTC).is_some());
    }

    #[test]
    fn stored_records_replace_the_sample() {
        let store = MemoryStore::new();
        storage::save(&store, RECORDS_KEY, &RecordStore::new()).unwrap();
        let state = AppState::load_with(&store, UTC, date!(2024 - 11 - 02), 0);
        assert_eq!(state.records.metrics().count(), 0);
    }

    #[test]
    fn commit_persists_the_record_store() {
        let store = MemoryStore::new();
        storage::save(&store, RECORDS_KEY, &RecordStore::new()).unwrap();
        let day = date!(2024 - 11 - 02);
        let mut state = AppState::load_with(&store, UTC, day, 0);

        let ts = timing::local_millis(day, time!(07:40), UTC);
        state.commit(
            vec![MetricWrite {
                metric: "weight".into(),
                input_value: MetricValue::Number(172.5),
                timestamp: ts,
                edit_timestamp: None,
                source: None,
            }],
            &store,
        );

        let reloaded = AppState::load_with(&store, UTC, day, 0);
        let reading = reloaded.records.select_for_day("weight", day, UTC).unwrap();
        assert_eq!(reading.value, MetricValue::Number(172.5));
        assert_eq!(reading.timestamp, Some(ts));
    }

    #[test]
    fn view_mode_follows_toggle() {
        let day = date!(2024 - 11 - 02);
        let mut state = AppState::load_with(&MemoryStore::new(), UTC, day, 0);
        assert_eq!(state.view_mode(), ViewMode::Day(day));
        state.show_latest = true;
        assert_eq!(state.view_mode(), ViewMode::Latest);
    }

    #[test]
    fn swipe_steps_move_the_selected_day() {
        let day = date!(2024 - 11 - 02);
        let mut state = AppState::load_with(&MemoryStore::new(), UTC, day, 0);
        state.step_day(DayStep::Previous);
        assert_eq!(state.selected_day, date!(2024 - 11 - 01));
        state.step_day(DayStep::Next);
        state.step_day(DayStep::Next);
        assert_eq!(state.selected_day, date!(2024 - 11 - 03));

        let today = state.today();
        state.select_day(today);
        state.step_day(DayStep::Next);
        assert_eq!(state.selected_day, today);
    }
}
