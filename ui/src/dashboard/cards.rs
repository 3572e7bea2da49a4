use dioxus::prelude::*;

use crate::core::catalog;
use crate::core::format;
use crate::core::store::ViewMode;
use crate::core::timing;
use crate::dashboard::dialog::{ConfigureDraft, Dialog, EntryDraft};
use crate::dashboard::icons::CardGlyph;
use crate::dashboard::summary::CardSummary;
use crate::state::use_app_state;

/// Active cards, in the user's order.
#[component]
pub fn CardGrid(mut dialog: Signal<Option<Dialog>>) -> Element {
    let state = use_app_state();
    let (summaries, latest) = {
        let app = state.read();
        let mode = app.view_mode();
        let summaries: Vec<CardSummary> = app
            .prefs
            .active_cards
            .iter()
            .filter_map(|name| catalog::card(name))
            .map(|card| CardSummary::build(card, &app.records, mode, app.zone))
            .collect();
        (summaries, mode == ViewMode::Latest)
    };

    if summaries.is_empty() {
        let open_configure = move |_| {
            let draft = {
                let app = state.read();
                ConfigureDraft::new(&app.prefs.active_cards, &app.prefs.feature_flags)
            };
            dialog.set(Some(Dialog::Configure(draft)));
        };
        return rsx! {
            section { class: "card-grid card-grid--empty",
                p { class: "card-grid__placeholder", {crate::t!("dashboard-empty")} }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: open_configure,
                    {crate::t!("header-configure")}
                }
            }
        };
    }

    rsx! {
        section { class: "card-grid",
            for summary in summaries.into_iter() {
                MetricCard { key: "{summary.card.name}", summary, latest, dialog }
            }
        }
    }
}

#[component]
fn MetricCard(summary: CardSummary, latest: bool, mut dialog: Signal<Option<Dialog>>) -> Element {
    let state = use_app_state();
    let card = summary.card;
    let color = summary.color();
    let zone = state.read().zone;

    let updated = summary.updated_at().and_then(|ts| {
        if latest {
            Some(format::format_stamp(ts, zone))
        } else {
            format::format_clock(ts, zone)
        }
    });
    let count = summary.entry_count();
    let lines = summary.lines();
    let has_value = summary.has_value();

    let open_entry = move |_| {
        let draft = {
            let app = state.read();
            EntryDraft::open(card, &app.records, app.selected_day, app.zone, timing::now_millis())
        };
        dialog.set(Some(Dialog::Entry(draft)));
    };
    let open_chart = move |evt: MouseEvent| {
        evt.stop_propagation();
        dialog.set(Some(Dialog::Chart { card }));
    };

    rsx! {
        article {
            class: "metric-card",
            role: "button",
            tabindex: "0",
            onclick: open_entry,

            div { class: "metric-card__header",
                CardGlyph { icon: card.icon, color }
                h3 { class: "metric-card__title", "{card.title}" }
                if count > 1 {
                    span {
                        class: "metric-card__badge",
                        title: crate::t!("card-entry-count"),
                        "{count}"
                    }
                }
                if !card.chartable_metrics().is_empty() {
                    button {
                        r#type: "button",
                        class: "metric-card__chart",
                        aria_label: crate::t!("card-open-chart"),
                        onclick: open_chart,
                        "📈"
                    }
                }
            }

            div { class: "metric-card__values",
                for (label, value) in lines.into_iter() {
                    div { class: "metric-card__line",
                        if let Some(label) = label {
                            span { class: "metric-card__label", "{label}" }
                        }
                        span { class: "metric-card__value", style: "color: {color}", "{value}" }
                    }
                }
            }

            p { class: "metric-card__meta",
                if let Some(updated) = updated {
                    {crate::t!("card-updated", time = updated)}
                } else if !has_value {
                    {crate::t!("card-no-data")}
                }
            }
        }
    }
}
