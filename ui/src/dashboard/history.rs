use dioxus::prelude::*;

use crate::core::catalog::{self, METRICS};
use crate::core::format;
use crate::core::ReadingOrigin;
use crate::state::use_app_state;

struct HistoryRow {
    key: String,
    when: String,
    value: String,
    source: Option<String>,
    legacy: bool,
}

/// Every reading of one metric, newest first.
#[component]
pub fn MetricHistory() -> Element {
    let state = use_app_state();
    let mut selected = use_signal(|| METRICS[0].name.to_string());

    let metric_name = selected();
    let Some(metric) = catalog::metric(&metric_name) else {
        return rsx! {};
    };

    let rows: Vec<HistoryRow> = {
        let app = state.read();
        app.records
            .history(metric.name, app.zone)
            .into_iter()
            .enumerate()
            .map(|(index, reading)| HistoryRow {
                key: format!("{index}-{}", reading.timestamp.unwrap_or_default()),
                when: reading
                    .timestamp
                    .map(|ts| format::format_stamp(ts, app.zone))
                    .unwrap_or_else(|| format::PLACEHOLDER.to_string()),
                value: format::format_value(metric, reading.value),
                source: reading.source,
                legacy: reading.origin != ReadingOrigin::Entry,
            })
            .collect()
    };

    rsx! {
        section { class: "history",
            div { class: "history__toolbar",
                label { r#for: "history-metric", {crate::t!("history-metric")} }
                select {
                    id: "history-metric",
                    value: "{metric_name}",
                    onchange: move |evt| selected.set(evt.value()),
                    for m in METRICS.iter() {
                        option { key: "{m.name}", value: "{m.name}", "{m.title}" }
                    }
                }
            }

            if rows.is_empty() {
                p { class: "history__placeholder", {crate::t!("history-empty")} }
            } else {
                table { class: "history__table",
                    thead {
                        tr {
                            th { {crate::t!("history-when")} }
                            th { {crate::t!("history-value")} }
                            th { {crate::t!("history-source")} }
                        }
                    }
                    tbody {
                        for row in rows.into_iter() {
                            tr { key: "{row.key}",
                                td { "{row.when}" }
                                td { class: "history__value", "{row.value}" }
                                td {
                                    if let Some(source) = row.source.as_ref() {
                                        "{source}"
                                    }
                                    if row.legacy {
                                        span { class: "history__legacy", {crate::t!("history-legacy")} }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
