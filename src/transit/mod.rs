//! CTA lines and stops: page scraping, station cleaning and linkage.

pub mod line;
pub mod linkage;
pub mod scrape;
pub mod station;
pub mod stop;

pub use line::{LineColor, MetroLine};
pub use linkage::{LinkReport, link_stops};
pub use scrape::scrape_stop_names;
pub use station::{Station, clean_stations};
pub use stop::MetroStop;
