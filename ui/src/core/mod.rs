//! Platform-agnostic health record logic: readings, series selection, the
//! static catalog and local persistence.

pub mod catalog;
pub mod entry;
pub mod format;
pub mod prefs;
pub mod series;
pub mod storage;
pub mod store;
pub mod timing;

pub use entry::{Entry, EpochMillis, MetricValue};
pub use series::{MetricSeries, Reading, ReadingOrigin};
pub use store::{MetricWrite, RecordStore, ViewMode};
pub use timing::Zone;
