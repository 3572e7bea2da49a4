use dioxus::prelude::*;

use crate::core::catalog::{self, MetricDefinition, ValueKind};
use crate::core::format;
use crate::core::store::Collision;
use crate::core::{timing, EpochMillis, MetricValue};
use crate::dashboard::dialog::{day_entries, Dialog, EntryDraft, SaveOutcome};
use crate::dashboard::Modal;
use crate::state::{commit_writes, use_app_state};

fn update_entry(mut dialog: Signal<Option<Dialog>>, edit: impl FnOnce(&mut EntryDraft)) {
    dialog.with_mut(|open| {
        if let Some(Dialog::Entry(draft)) = open {
            edit(draft);
        }
    });
}

struct EntryRowView {
    timestamp: EpochMillis,
    clock: String,
    summary: String,
    editing: bool,
}

#[component]
pub fn EntryDialog(mut dialog: Signal<Option<Dialog>>, draft: EntryDraft) -> Element {
    let state = use_app_state();
    let card = draft.card;

    let (rows, zone) = {
        let app = state.read();
        let day = timing::parse_date(&draft.date).unwrap_or(app.selected_day);
        let rows: Vec<EntryRowView> = day_entries(card, &app.records, day, app.zone)
            .into_iter()
            .map(|row| EntryRowView {
                timestamp: row.timestamp,
                clock: format::format_clock(row.timestamp, app.zone).unwrap_or_default(),
                summary: card
                    .metric_definitions()
                    .zip(row.values.iter())
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(metric, value)| format::format_value(metric, *value))
                    .collect::<Vec<_>>()
                    .join(" · "),
                editing: draft.edit_timestamp == Some(row.timestamp),
            })
            .collect();
        (rows, app.zone)
    };

    let fields: Vec<(usize, &'static MetricDefinition, MetricValue)> = card
        .metric_definitions()
        .zip(draft.values.iter().copied())
        .enumerate()
        .map(|(index, (metric, value))| (index, metric, value))
        .collect();

    let pending = draft.clone();
    let save = move |_| {
        let outcome = {
            let app = state.read();
            pending.submit(&app.records, zone)
        };
        match outcome {
            SaveOutcome::Commit(writes) => {
                commit_writes(state, writes);
                dialog.set(None);
            }
            SaveOutcome::Confirm(next) => dialog.set(Some(next)),
            SaveOutcome::Invalid(err) => update_entry(dialog, |d| d.error = Some(err.to_string())),
        }
    };

    let start_new = move |_| {
        let fresh = {
            let app = state.read();
            EntryDraft::open(card, &app.records, app.selected_day, app.zone, timing::now_millis())
        };
        dialog.set(Some(Dialog::Entry(fresh)));
    };

    let editing = draft.edit_timestamp.is_some();
    let title = if editing {
        crate::t!("entry-title-edit", card = card.title)
    } else {
        crate::t!("entry-title-new", card = card.title)
    };

    rsx! {
        Modal { title, on_close: move |_| dialog.set(None),
            form {
                class: "entry-form",
                onsubmit: move |evt| evt.prevent_default(),

                for (index, metric, value) in fields.into_iter() {
                    div { class: "entry-form__field", key: "{metric.name}",
                        label { class: "entry-form__prompt", "{metric.prompt}" }
                        {metric_input(dialog, index, metric, value)}
                    }
                }

                div { class: "entry-form__when",
                    label { class: "entry-form__label",
                        {crate::t!("entry-date")}
                        input {
                            r#type: "date",
                            value: "{draft.date}",
                            oninput: move |evt| {
                                let raw = evt.value();
                                update_entry(dialog, |d| d.date = raw);
                            },
                        }
                    }
                    label { class: "entry-form__label",
                        {crate::t!("entry-time")}
                        input {
                            r#type: "time",
                            value: "{draft.time}",
                            oninput: move |evt| {
                                let raw = evt.value();
                                update_entry(dialog, |d| d.time = raw);
                            },
                        }
                    }
                }

                if let Some(error) = draft.error.as_ref() {
                    p { class: "entry-form__error", role: "alert", "{error}" }
                }

                if !rows.is_empty() {
                    div { class: "entry-form__day-entries",
                        h3 { {crate::t!("entry-day-entries")} }
                        ul {
                            for row in rows.into_iter() {
                                li {
                                    key: "{row.timestamp}",
                                    class: if row.editing { "day-entry day-entry--editing" } else { "day-entry" },
                                    span { class: "day-entry__time", "{row.clock}" }
                                    span { class: "day-entry__values", "{row.summary}" }
                                    button {
                                        r#type: "button",
                                        class: "button button--ghost day-entry__edit",
                                        onclick: move |_| {
                                            let ts = row.timestamp;
                                            let app = state.read();
                                            update_entry(dialog, |d| d.edit_existing(&app.records, ts, app.zone));
                                        },
                                        {crate::t!("action-edit")}
                                    }
                                }
                            }
                        }
                    }
                }

                div { class: "modal__actions",
                    if editing {
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            onclick: start_new,
                            {crate::t!("entry-new")}
                        }
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        onclick: move |_| dialog.set(None),
                        {crate::t!("action-cancel")}
                    }
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        onclick: save,
                        {crate::t!("action-save")}
                    }
                }
            }
        }
    }
}

fn metric_input(
    dialog: Signal<Option<Dialog>>,
    index: usize,
    metric: &'static MetricDefinition,
    value: MetricValue,
) -> Element {
    match metric.kind {
        ValueKind::Numeric => {
            let shown = value.as_number().map(format::format_number).unwrap_or_default();
            rsx! {
                div { class: "entry-form__numeric",
                    input {
                        r#type: "number",
                        step: "any",
                        value: "{shown}",
                        oninput: move |evt| {
                            let raw = evt.value();
                            update_entry(dialog, |d| d.set_numeric_input(index, &raw));
                        },
                    }
                    if !metric.unit.is_empty() {
                        span { class: "entry-form__unit", "{metric.unit}" }
                    }
                }
            }
        }
        ValueKind::Scale0To10 => {
            let position = value.as_number().unwrap_or(0.0);
            let shown = value
                .as_number()
                .map(format::format_number)
                .unwrap_or_else(|| format::PLACEHOLDER.to_string());
            rsx! {
                div { class: "entry-form__scale",
                    input {
                        r#type: "range",
                        min: "0",
                        max: "10",
                        step: "1",
                        value: "{position}",
                        oninput: move |evt| {
                            let raw = evt.value();
                            update_entry(dialog, |d| d.set_numeric_input(index, &raw));
                        },
                    }
                    output { class: "entry-form__scale-value", "{shown}" }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        onclick: move |_| update_entry(dialog, |d| d.set_value(index, MetricValue::Empty)),
                        {crate::t!("action-clear")}
                    }
                }
            }
        }
        ValueKind::Boolean => {
            let flag = value.as_flag();
            let choice = move |pick: bool| {
                move |_| {
                    let next = if flag == Some(pick) {
                        MetricValue::Empty
                    } else {
                        MetricValue::Flag(pick)
                    };
                    update_entry(dialog, |d| d.set_value(index, next));
                }
            };
            rsx! {
                div { class: "entry-form__flag", role: "group",
                    button {
                        r#type: "button",
                        class: if flag == Some(true) { "toggle toggle--on" } else { "toggle" },
                        onclick: choice(true),
                        {crate::t!("value-yes")}
                    }
                    button {
                        r#type: "button",
                        class: if flag == Some(false) { "toggle toggle--on" } else { "toggle" },
                        onclick: choice(false),
                        {crate::t!("value-no")}
                    }
                }
            }
        }
    }
}

#[component]
pub fn ConfirmOverwriteDialog(
    mut dialog: Signal<Option<Dialog>>,
    draft: EntryDraft,
    collisions: Vec<Collision>,
) -> Element {
    let state = use_app_state();
    let zone = state.read().zone;

    let rows: Vec<(String, String, String, String)> = collisions
        .iter()
        .map(|collision| {
            let metric = catalog::metric(&collision.metric);
            let title = metric.map(|m| m.title.to_string()).unwrap_or_else(|| collision.metric.clone());
            let shown = |value: MetricValue| match metric {
                Some(m) => format::format_value(m, value),
                None => format::PLACEHOLDER.to_string(),
            };
            (
                title,
                format::format_stamp(collision.existing.timestamp, zone),
                shown(collision.existing.value),
                shown(collision.incoming),
            )
        })
        .collect();

    let pending = draft.clone();
    let overwrite = move |_| match pending.writes(zone) {
        Ok(writes) => {
            commit_writes(state, writes);
            dialog.set(None);
        }
        Err(err) => {
            let mut back = pending.clone();
            back.error = Some(err.to_string());
            dialog.set(Some(Dialog::Entry(back)));
        }
    };
    let kept = draft.clone();
    let close = move |_| dialog.set(Some(Dialog::Entry(kept.clone())));
    let decline = move |_| dialog.set(Some(Dialog::Entry(draft.clone())));

    rsx! {
        Modal { title: crate::t!("confirm-title"), on_close: close,
            p { {crate::t!("confirm-body")} }
            ul { class: "confirm-list",
                for (title, when, existing, incoming) in rows.into_iter() {
                    li { class: "confirm-list__item",
                        span { class: "confirm-list__metric", "{title}" }
                        span { class: "confirm-list__when", "{when}" }
                        span { class: "confirm-list__change", "{existing} → {incoming}" }
                    }
                }
            }
            div { class: "modal__actions",
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: decline,
                    {crate::t!("confirm-keep")}
                }
                button {
                    r#type: "button",
                    class: "button button--accent",
                    onclick: overwrite,
                    {crate::t!("confirm-overwrite")}
                }
            }
        }
    }
}
