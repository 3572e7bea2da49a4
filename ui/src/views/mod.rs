//! Routed pages. Platform crates map their `Route` enums onto these.

mod dashboard;
mod history;

pub use dashboard::Dashboard;
pub use history::History;
