use dioxus::logger::tracing::info;
use dioxus::prelude::*;

use crate::core::catalog::SERVICE_PROVIDERS;
use crate::core::storage;
use crate::dashboard::dialog::{Dialog, ServiceDraft, SettingsDraft};
use crate::dashboard::Modal;
use crate::state::use_app_state;

fn update_settings(mut dialog: Signal<Option<Dialog>>, edit: impl FnOnce(&mut SettingsDraft)) {
    dialog.with_mut(|open| {
        if let Some(Dialog::Settings(draft)) = open {
            edit(draft);
        }
    });
}

fn update_service(dialog: Signal<Option<Dialog>>, edit: impl FnOnce(&mut ServiceDraft)) {
    update_settings(dialog, |d| {
        if let Some(service) = d.adding_service.as_mut() {
            edit(service);
        }
    });
}

#[component]
pub fn SettingsDialog(mut dialog: Signal<Option<Dialog>>, draft: SettingsDraft) -> Element {
    let mut state = use_app_state();
    let user = draft.user.clone();

    let pending = draft.user.clone();
    let save = move |_| {
        let store = storage::platform_store();
        let mut app = state.write();
        app.prefs.user = pending.clone();
        app.prefs.save_user(store.as_ref());
        info!("saved profile with {} connected service(s)", app.prefs.user.services.len());
        dialog.set(None);
    };

    rsx! {
        Modal { title: crate::t!("settings-title"), on_close: move |_| dialog.set(None),
            div { class: "settings",
                label { class: "settings__field",
                    {crate::t!("settings-first-name")}
                    input {
                        r#type: "text",
                        value: "{user.first_name}",
                        oninput: move |evt| {
                            let raw = evt.value();
                            update_settings(dialog, |d| d.user.first_name = raw);
                        },
                    }
                }
                label { class: "settings__field",
                    {crate::t!("settings-last-name")}
                    input {
                        r#type: "text",
                        value: "{user.last_name}",
                        oninput: move |evt| {
                            let raw = evt.value();
                            update_settings(dialog, |d| d.user.last_name = raw);
                        },
                    }
                }
                label { class: "settings__field",
                    {crate::t!("settings-dob")}
                    input {
                        r#type: "date",
                        value: "{user.dob}",
                        oninput: move |evt| {
                            let raw = evt.value();
                            update_settings(dialog, |d| d.user.dob = raw);
                        },
                    }
                }

                section { class: "settings__services",
                    h3 { {crate::t!("settings-services")} }
                    if user.services.is_empty() {
                        p { class: "settings__placeholder", {crate::t!("settings-no-services")} }
                    }
                    ul {
                        for service in user.services.iter().cloned() {
                            li { key: "{service.id}", class: "settings__service",
                                span { class: "settings__service-provider", "{service.provider}" }
                                span { class: "settings__service-user", "{service.username}" }
                                button {
                                    r#type: "button",
                                    class: "button button--ghost",
                                    onclick: move |_| update_settings(dialog, |d| d.remove_service(&service.id)),
                                    {crate::t!("settings-remove-service")}
                                }
                            }
                        }
                    }

                    if let Some(service) = draft.adding_service.clone() {
                        div { class: "settings__add-service",
                            select {
                                value: "{service.provider}",
                                onchange: move |evt| {
                                    let raw = evt.value();
                                    update_service(dialog, |s| s.provider = raw);
                                },
                                for provider in SERVICE_PROVIDERS.iter() {
                                    option { key: "{provider}", value: "{provider}", "{provider}" }
                                }
                            }
                            input {
                                r#type: "text",
                                placeholder: crate::t!("settings-username"),
                                value: "{service.username}",
                                oninput: move |evt| {
                                    let raw = evt.value();
                                    update_service(dialog, |s| s.username = raw);
                                },
                            }
                            input {
                                r#type: "password",
                                placeholder: crate::t!("settings-password"),
                                value: "{service.password}",
                                oninput: move |evt| {
                                    let raw = evt.value();
                                    update_service(dialog, |s| s.password = raw);
                                },
                            }
                            button {
                                r#type: "button",
                                class: "button button--ghost",
                                onclick: move |_| update_settings(dialog, |d| d.cancel_adding_service()),
                                {crate::t!("action-cancel")}
                            }
                            button {
                                r#type: "button",
                                class: "button button--accent",
                                disabled: service.username.trim().is_empty(),
                                onclick: move |_| update_settings(dialog, |d| d.confirm_service()),
                                {crate::t!("settings-connect")}
                            }
                        }
                    } else {
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            onclick: move |_| update_settings(dialog, |d| d.start_adding_service()),
                            {crate::t!("settings-add-service")}
                        }
                    }
                }
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
