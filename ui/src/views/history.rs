use dioxus::prelude::*;

use crate::dashboard::MetricHistory;

#[component]
pub fn History() -> Element {
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang = lang_code.as_ref().map(|s| s()).unwrap_or_default();

    rsx! {
        section { class: "page page-history",
            h1 { {crate::t!("history-title")} }
            p { class: "page-history__intro", {crate::t!("history-intro")} }
            MetricHistory {}
        }
    }
}
