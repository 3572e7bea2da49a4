//! The dashboard: header, card grid and the single open dialog.

pub mod cards;
pub mod charts;
pub mod dialog;
pub mod header;
pub mod history;
pub mod icons;
pub mod summary;
pub mod swipe;

mod configure_dialog;
mod date_dialog;
mod entry_dialog;
mod settings_dialog;

pub use cards::CardGrid;
pub use charts::CardChart;
pub use dialog::Dialog;
pub use header::DashboardHeader;
pub use history::MetricHistory;

use dioxus::prelude::*;

use configure_dialog::ConfigureDialog;
use date_dialog::DatePickerDialog;
use entry_dialog::{ConfirmOverwriteDialog, EntryDialog};
use settings_dialog::SettingsDialog;

/// Render whichever dialog is open, if any.
#[component]
pub fn DialogHost(mut dialog: Signal<Option<Dialog>>) -> Element {
    let Some(open) = dialog() else {
        return rsx! {};
    };

    match open {
        Dialog::DatePicker { draft } => rsx! {
            DatePickerDialog { dialog, draft }
        },
        Dialog::Configure(draft) => rsx! {
            ConfigureDialog { dialog, draft }
        },
        Dialog::Settings(draft) => rsx! {
            SettingsDialog { dialog, draft }
        },
        Dialog::Entry(draft) => rsx! {
            EntryDialog { dialog, draft }
        },
        Dialog::ConfirmOverwrite { draft, collisions } => rsx! {
            ConfirmOverwriteDialog { dialog, draft, collisions }
        },
        Dialog::Chart { card } => rsx! {
            Modal {
                title: card.title.to_string(),
                on_close: move |_| dialog.set(None),
                CardChart { card }
                div { class: "modal__actions",
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        onclick: move |_| dialog.set(None),
                        {crate::t!("action-close")}
                    }
                }
            }
        },
    }
}

/// Overlay and panel shared by every dialog. Clicking the backdrop closes it.
#[component]
pub fn Modal(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "modal",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal__panel",
                role: "dialog",
                "aria-modal": "true",
                onclick: move |evt| evt.stop_propagation(),
                header { class: "modal__header",
                    h2 { class: "modal__title", "{title}" }
                    button {
                        r#type: "button",
                        class: "modal__close",
                        aria_label: crate::t!("action-close"),
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                div { class: "modal__body", {children} }
            }
        }
    }
}
