use dioxus::logger::tracing::debug;
use dioxus::prelude::*;

use crate::dashboard::swipe;
use crate::dashboard::{CardGrid, DashboardHeader, Dialog, DialogHost};
use crate::state::use_app_state;

#[component]
pub fn Dashboard() -> Element {
    // Subscribe to the language code so labels refresh on change.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    let mut state = use_app_state();
    let dialog = use_signal(|| Option::<Dialog>::None);
    let mut touch_start = use_signal(|| Option::<(f64, f64)>::None);

    rsx! {
        section {
            class: "page page-dashboard",
            ontouchstart: move |evt| {
                if dialog.read().is_some() {
                    return;
                }
                let start = evt.touches().first().map(|t| {
                    let at = t.client_coordinates();
                    (at.x, at.y)
                });
                touch_start.set(start);
            },
            ontouchend: move |evt| {
                let Some((x0, y0)) = touch_start.take() else {
                    return;
                };
                if dialog.read().is_some() {
                    return;
                }
                let Some(end) = evt.touches_changed().first().map(|t| t.client_coordinates()) else {
                    return;
                };
                if let Some(step) = swipe::classify(end.x - x0, end.y - y0) {
                    debug!("swipe: {step:?}");
                    state.write().step_day(step);
                }
            },
            DashboardHeader { dialog }
            CardGrid { dialog }
            DialogHost { dialog }
        }
    }
}
