//! End-to-end record flow through the public API: legacy blob in, edits
//! applied, blob out through a file-backed store.

use serde_json::json;
use time::macros::{date, time};

use ui::core::storage::{self, FileStore, RECORDS_KEY};
use ui::core::store::ViewMode;
use ui::core::{timing, MetricValue, MetricWrite, ReadingOrigin, RecordStore, Zone};

const UTC: Zone = Zone::UTC;

fn weight(ts: i64, value: f64, edit: Option<i64>) -> MetricWrite {
    MetricWrite {
        metric: "weight".into(),
        input_value: MetricValue::Number(value),
        timestamp: ts,
        edit_timestamp: edit,
        source: None,
    }
}

#[test]
fn legacy_values_give_way_to_new_entries_and_survive_a_reload() {
    let nov1 = date!(2024 - 11 - 01);
    let nov2 = date!(2024 - 11 - 02);
    let blob = json!({
        "dataPoints": {
            "weight": {
                "entries": [],
                "dayValue": {
                    "1730448000000": { "value": 174, "source": "scale" }
                }
            }
        },
        "2024-10-30": { "tired": 6 }
    });
    let mut records: RecordStore = serde_json::from_value(blob).unwrap();
    records.normalize();

    let legacy = records.select_for_day("weight", nov1, UTC).unwrap();
    assert_eq!(legacy.origin, ReadingOrigin::LegacyMap);
    assert_eq!(legacy.value, MetricValue::Number(174.0));
    assert_eq!(legacy.timestamp, Some(timing::local_millis(nov1, time!(08:00), UTC)));
    assert_eq!(
        records.select_for_day("tired", date!(2024 - 10 - 30), UTC).unwrap().origin,
        ReadingOrigin::DayRecord
    );

    let morning = timing::local_millis(nov1, time!(07:00), UTC);
    records.apply(vec![weight(morning, 173.4, None)], 0);
    let day_one = records.select_for_day("weight", nov1, UTC).unwrap();
    assert_eq!(day_one.origin, ReadingOrigin::Entry);
    assert_eq!(day_one.value, MetricValue::Number(173.4));

    let evening = timing::local_millis(nov2, time!(19:30), UTC);
    records.apply(vec![weight(evening, 172.0, None)], 0);
    assert_eq!(
        records.select("weight", ViewMode::Latest, UTC).unwrap().timestamp,
        Some(evening)
    );

    // Editing the evening reading moves it into the morning of the same day.
    let moved = timing::local_millis(nov2, time!(06:45), UTC);
    assert!(records.collisions(&[weight(moved, 171.8, Some(evening))]).is_empty());
    records.apply(vec![weight(moved, 171.8, Some(evening))], 0);
    assert_eq!(records.entries_for_day("weight", nov2, UTC).len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    storage::save(&store, RECORDS_KEY, &records).unwrap();
    let mut reloaded: RecordStore =
        storage::load_or_default(&store, RECORDS_KEY, RecordStore::new);
    reloaded.normalize();

    assert_eq!(reloaded, records);
    let history = reloaded.history("weight", UTC);
    assert_eq!(history[0].timestamp, Some(moved));
    assert_eq!(history.len(), 2);
}
