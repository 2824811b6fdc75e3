//! Async seams over the three remote data sources.
//!
//! HTTP implementations live in [`crate::infra`]; tests substitute
//! in-memory ones.

pub mod health_api;
pub mod line_pages;
pub mod station_api;

pub use health_api::HealthApi;
pub use line_pages::LinePages;
pub use station_api::StationApi;
