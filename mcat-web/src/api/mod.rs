//! HTTP handlers for mcat-web

pub mod browse;
pub mod catalog;
pub mod health;
pub mod report;
pub mod tracks;
pub mod ui;

pub use browse::browse_page;
pub use catalog::catalog_routes;
pub use health::health_routes;
pub use report::{report_page, sort_report_page};
pub use tracks::{filter_tracks_page, sort_tracks_page, tracks_page};
pub use ui::serve_index;
