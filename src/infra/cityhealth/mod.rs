mod client;

pub use client::{CITY_HEALTH_ENDPOINT, CityHealthClient};
