use crate::i18n;
use crate::t;
use dioxus::logger::tracing::debug;
use dioxus::prelude::*;
use once_cell::sync::OnceCell;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Links to the dashboard and history pages, built by the platform crate
/// since only it knows its `Route` enum. Each function receives the
/// localized label.
///
/// ```ignore
/// register_nav(NavBuilder {
///     dashboard: |label| rsx!( Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" } ),
///     history: |label| rsx!( Link { class: "navbar__link", to: Route::History {}, "{label}" } ),
/// });
/// ```
pub struct NavBuilder {
    pub dashboard: fn(label: &str) -> Element,
    pub history: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// First registration wins.
pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

/// Brand, page links and the language picker. Without a registered
/// [`NavBuilder`] the `children` are shown as the links.
#[component]
pub fn AppNavbar(children: Element) -> Element {
    i18n::init();

    // Reading the shared code re-renders the labels after a switch.
    let lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let lang = lang_code.as_ref().map(|c| c()).unwrap_or_default();
    debug!(lang = %lang, "navbar render");

    let links = match NAV_BUILDER.get() {
        Some(builder) => {
            let dashboard = (builder.dashboard)(&t!("nav-dashboard"));
            let history = (builder.history)(&t!("nav-history"));
            rsx! {
                {dashboard}
                {history}
            }
        }
        None => children,
    };
    let tagline = t!("tagline");

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header { id: "navbar", class: "navbar", "data-lang": "{lang}",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Vitalcard" }
                    }
                    span { class: "navbar__brand-subtitle", "{tagline}" }
                }
                nav { class: "navbar__links", {links} }
                LocaleSwitcher { lang_code }
            }
        }
    }
}

/// Language `select`; hidden when only one locale is embedded.
#[component]
fn LocaleSwitcher(lang_code: Option<Signal<String>>) -> Element {
    let codes = i18n::available_languages();
    let mut current = use_signal(|| "en-US".to_string());

    if codes.len() < 2 {
        return rsx! {};
    }

    let on_change = move |evt: FormEvent| {
        let code = evt.value();
        match i18n::set_language(&code) {
            Ok(()) => {
                current.set(code.clone());
                if let Some(mut shared) = lang_code {
                    shared.set(code);
                }
            }
            Err(err) => debug!("language {code} not applied: {err}"),
        }
    };

    rsx! {
        div { class: "navbar__locale",
            label { class: "visually-hidden", r#for: "locale-select", {t!("nav-language-label")} }
            select {
                id: "locale-select",
                value: "{current}",
                oninput: on_change,
                for code in codes {
                    option { key: "{code}", value: "{code}", "{code}" }
                }
            }
        }
    }
}
