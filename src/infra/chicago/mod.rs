mod client;

pub use client::{CTA_STOPS_ENDPOINT, ChicagoDataClient};
