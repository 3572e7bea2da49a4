use dioxus::prelude::*;
use time::Date;

use crate::core::{format, timing};
use crate::dashboard::dialog::Dialog;
use crate::dashboard::Modal;
use crate::state::use_app_state;

/// Pick the day the dashboard shows. Days after today cannot be chosen.
#[component]
pub fn DatePickerDialog(mut dialog: Signal<Option<Dialog>>, draft: Date) -> Element {
    let mut state = use_app_state();
    let today = state.read().today();
    let heading = format::format_day_heading(draft);

    rsx! {
        Modal { title: crate::t!("date-title"), on_close: move |_| dialog.set(None),
            input {
                class: "date-picker__input",
                r#type: "date",
                value: timing::date_key(draft),
                max: timing::date_key(today),
                oninput: move |evt| {
                    if let Some(day) = timing::parse_date(&evt.value()) {
                        dialog.set(Some(Dialog::DatePicker { draft: day.min(today) }));
                    }
                },
            }
            p { class: "date-picker__preview", "{heading}" }

            div { class: "modal__actions",
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: move |_| {
                        state.write().select_day(today);
                        dialog.set(None);
                    },
                    {crate::t!("date-today")}
                }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: move |_| {
                        state.write().select_day(draft);
                        dialog.set(None);
                    },
                    {crate::t!("action-done")}
                }
            }
        }
    }
}
