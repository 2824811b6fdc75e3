use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

use crate::fetch::{HttpClient, fetch_bytes};
use crate::parser::{StationRow, parse_stations};
use crate::services::StationApi;

/// The "CTA - System Information - List of 'L' Stops" dataset.
pub const CTA_STOPS_ENDPOINT: &str = "https://data.cityofchicago.org/resource/8pix-ypme.json";

const COLUMNS: [&str; 3] = ["map_id", "station_descriptive_name", "location"];
const ROW_LIMIT: &str = "5000";

/// Socrata client for the city data portal. Wrap the inner client in
/// [`ApiKey::app_token`](crate::fetch::auth::ApiKey::app_token) to send an
/// app token.
pub struct ChicagoDataClient<C> {
    client: C,
    endpoint: String,
}

impl<C: HttpClient> ChicagoDataClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_endpoint(client, CTA_STOPS_ENDPOINT.to_string())
    }

    pub fn with_endpoint(client: C, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    fn request_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("$select", &COLUMNS.join(","))
            .append_pair("$limit", ROW_LIMIT);
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> StationApi for ChicagoDataClient<C> {
    async fn list_stations(&self) -> Result<Vec<StationRow>> {
        let url = self.request_url()?;
        let bytes = fetch_bytes(&self.client, url.as_str()).await?;
        let rows = parse_stations(&bytes)?;
        info!(rows = rows.len(), "Station rows fetched");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::CannedClient;

    #[tokio::test]
    async fn test_list_stations() {
        let body = r#"[{"map_id":"40900","station_descriptive_name":"Howard (Red, Purple & Yellow lines)",
                        "location":{"latitude":"42.019063","longitude":"-87.672892"}}]"#;
        let client = ChicagoDataClient::new(CannedClient::new(body));

        let rows = client.list_stations().await.unwrap();
        assert_eq!(rows.len(), 1);

        let urls = client.client.urls();
        assert!(urls[0].starts_with(CTA_STOPS_ENDPOINT));
        assert!(urls[0].contains("%24select=map_id%2Cstation_descriptive_name%2Clocation"));
        assert!(urls[0].contains("%24limit=5000"));
    }
}
