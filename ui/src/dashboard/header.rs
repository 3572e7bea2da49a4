use dioxus::prelude::*;

use crate::core::format::{self, DayPart};
use crate::core::timing;
use crate::dashboard::dialog::{ConfigureDraft, Dialog, SettingsDraft};
use crate::state::use_app_state;

/// Greeting, clock and the day navigation strip.
#[component]
pub fn DashboardHeader(mut dialog: Signal<Option<Dialog>>) -> Element {
    let mut state = use_app_state();
    let (first_name, selected_day, today, show_latest, zone) = {
        let app = state.read();
        (
            app.prefs.user.first_name.clone(),
            app.selected_day,
            app.today(),
            app.show_latest,
            app.zone,
        )
    };

    let now = timing::from_millis(timing::now_millis(), zone);
    let greeting = match now.map(|at| DayPart::from_hour(at.hour())) {
        Some(DayPart::Morning) | None => crate::t!("greeting-morning", name = first_name),
        Some(DayPart::Afternoon) => crate::t!("greeting-afternoon", name = first_name),
        Some(DayPart::Evening) => crate::t!("greeting-evening", name = first_name),
    };
    let now_text = now.map(format::format_now).unwrap_or_default();
    let day_heading = format::format_day_heading(selected_day);
    let at_today = selected_day >= today;
    let (day_class, latest_class) = if show_latest {
        ("view-toggle__option", "view-toggle__option view-toggle__option--active")
    } else {
        ("view-toggle__option view-toggle__option--active", "view-toggle__option")
    };

    let open_configure = move |_| {
        let draft = {
            let app = state.read();
            ConfigureDraft::new(&app.prefs.active_cards, &app.prefs.feature_flags)
        };
        dialog.set(Some(Dialog::Configure(draft)));
    };
    let open_settings = move |_| {
        let draft = SettingsDraft::new(&state.read().prefs.user);
        dialog.set(Some(Dialog::Settings(draft)));
    };

    rsx! {
        header { class: "dashboard-header",
            div { class: "dashboard-header__intro",
                h1 { class: "dashboard-header__greeting", "{greeting}" }
                p { class: "dashboard-header__now", "{now_text}" }
            }

            div { class: "dashboard-header__actions",
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: move |_| dialog.set(Some(Dialog::DatePicker { draft: selected_day })),
                    {crate::t!("header-pick-date")}
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: open_configure,
                    {crate::t!("header-configure")}
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: open_settings,
                    {crate::t!("header-settings")}
                }
            }

            div { class: "day-nav",
                button {
                    r#type: "button",
                    class: "button day-nav__step",
                    aria_label: crate::t!("header-previous-day"),
                    onclick: move |_| state.write().previous_day(),
                    "‹"
                }
                span { class: "day-nav__label",
                    if show_latest {
                        {crate::t!("header-viewing-latest")}
                    } else {
                        {crate::t!("header-viewing", day = day_heading)}
                    }
                }
                button {
                    r#type: "button",
                    class: "button day-nav__step",
                    aria_label: crate::t!("header-next-day"),
                    disabled: at_today,
                    onclick: move |_| state.write().next_day(),
                    "›"
                }

                div { class: "view-toggle", role: "group",
                    button {
                        r#type: "button",
                        class: day_class,
                        onclick: move |_| state.write().show_latest = false,
                        {crate::t!("header-mode-day")}
                    }
                    button {
                        r#type: "button",
                        class: latest_class,
                        onclick: move |_| state.write().show_latest = true,
                        {crate::t!("header-mode-latest")}
                    }
                }
            }
        }
    }
}
