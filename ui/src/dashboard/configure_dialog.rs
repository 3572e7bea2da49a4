use dioxus::logger::tracing::info;
use dioxus::prelude::*;

use crate::core::catalog;
use crate::core::storage;
use crate::dashboard::dialog::{ConfigureDraft, Dialog};
use crate::dashboard::Modal;
use crate::state::use_app_state;

fn update_configure(mut dialog: Signal<Option<Dialog>>, edit: impl FnOnce(&mut ConfigureDraft)) {
    dialog.with_mut(|open| {
        if let Some(Dialog::Configure(draft)) = open {
            edit(draft);
        }
    });
}

/// Choose which cards appear on the dashboard and in what order. Cards can
/// be dragged between the two lists or moved with the buttons.
#[component]
pub fn ConfigureDialog(mut dialog: Signal<Option<Dialog>>, draft: ConfigureDraft) -> Element {
    let mut state = use_app_state();

    let active: Vec<(usize, &'static str, &'static str)> = draft
        .active
        .iter()
        .filter_map(|name| catalog::card(name))
        .enumerate()
        .map(|(index, card)| (index, card.name, card.title))
        .collect();
    let last = active.len().saturating_sub(1);
    let available = draft.available();
    let drop_hint = draft.drop_hint;
    let paid = draft.flags.paid_version;

    let pending = draft.clone();
    let save = move |_| {
        let store = storage::platform_store();
        let mut app = state.write();
        app.prefs.active_cards = pending.active.clone();
        app.prefs.feature_flags = pending.flags.clone();
        app.prefs.save_active_cards(store.as_ref());
        app.prefs.save_feature_flags(store.as_ref());
        info!("dashboard now shows {} card(s)", app.prefs.active_cards.len());
        dialog.set(None);
    };

    rsx! {
        Modal { title: crate::t!("configure-title"), on_close: move |_| dialog.set(None),
            div { class: "configure",
                section { class: "configure__column",
                    h3 { {crate::t!("configure-active")} }
                    ol {
                        class: "configure__list configure__list--active",
                        ondragover: move |evt| evt.prevent_default(),
                        ondrop: move |evt| {
                            evt.prevent_default();
                            update_configure(dialog, |d| d.drop_into_active(None));
                        },
                        for (index, name, title) in active.into_iter() {
                            li {
                                key: "{name}",
                                class: if drop_hint == Some(index) { "configure__item configure__item--drop" } else { "configure__item" },
                                draggable: "true",
                                ondragstart: move |_| update_configure(dialog, |d| d.dragging = Some(name.to_string())),
                                ondragover: move |evt| {
                                    evt.prevent_default();
                                    update_configure(dialog, |d| d.drop_hint = Some(index));
                                },
                                ondrop: move |evt| {
                                    evt.prevent_default();
                                    evt.stop_propagation();
                                    update_configure(dialog, |d| d.drop_into_active(Some(index)));
                                },
                                span { class: "configure__handle", aria_hidden: "true", "⋮⋮" }
                                span { class: "configure__name", "{title}" }
                                button {
                                    r#type: "button",
                                    class: "button button--ghost",
                                    aria_label: crate::t!("configure-move-up"),
                                    disabled: index == 0,
                                    onclick: move |_| update_configure(dialog, |d| d.move_up(name)),
                                    "↑"
                                }
                                button {
                                    r#type: "button",
                                    class: "button button--ghost",
                                    aria_label: crate::t!("configure-move-down"),
                                    disabled: index == last,
                                    onclick: move |_| update_configure(dialog, |d| d.move_down(name)),
                                    "↓"
                                }
                                button {
                                    r#type: "button",
                                    class: "button button--ghost",
                                    onclick: move |_| update_configure(dialog, |d| d.deactivate(name)),
                                    {crate::t!("configure-remove")}
                                }
                            }
                        }
                    }
                }

                section { class: "configure__column",
                    h3 { {crate::t!("configure-available")} }
                    ul {
                        class: "configure__list",
                        ondragover: move |evt| evt.prevent_default(),
                        ondrop: move |evt| {
                            evt.prevent_default();
                            update_configure(dialog, |d| d.drop_into_available());
                        },
                        if available.is_empty() {
                            li { class: "configure__placeholder", {crate::t!("configure-all-active")} }
                        }
                        for card in available.into_iter() {
                            li {
                                key: "{card.name}",
                                class: "configure__item",
                                draggable: "true",
                                ondragstart: move |_| update_configure(dialog, |d| d.dragging = Some(card.name.to_string())),
                                span { class: "configure__name", "{card.title}" }
                                button {
                                    r#type: "button",
                                    class: "button button--ghost",
                                    onclick: move |_| update_configure(dialog, |d| d.activate(card.name)),
                                    {crate::t!("configure-add")}
                                }
                            }
                        }
                    }
                }
            }

            label { class: "configure__flag",
                input {
                    r#type: "checkbox",
                    checked: paid,
                    onchange: move |evt| {
                        let on = evt.checked();
                        update_configure(dialog, |d| d.flags.paid_version = on);
                    },
                }
                {crate::t!("configure-paid")}
            }

            div { class: "modal__actions",
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
