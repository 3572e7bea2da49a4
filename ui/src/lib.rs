//! Shared UI crate for Vitalcard. Record logic, dashboard components and
//! routed views live here; the platform crates only launch them.

pub mod core;
pub mod dashboard;
pub mod i18n;
pub mod state;
pub mod views;

pub mod components {
    // Localized application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
