//! Operational dashboard for a wide-column store: turns embedded telemetry
//! snapshots into colored, unit-tagged chart series.

pub mod chart;
pub mod coerce;
pub mod config;
pub mod logging;
pub mod page;
pub mod palette;
pub mod panels;
pub mod refresh;
pub mod resolve;
pub mod series;
pub mod snapshot;
pub mod source;
pub mod units;

pub use chart::{render_dashboard, ChartSpec};
pub use page::{MountError, PageData};
