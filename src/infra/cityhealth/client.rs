use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

use crate::fetch::{HttpClient, fetch_bytes};
use crate::health::HealthMetric;
use crate::parser::{TractMetricRow, parse_tract_metric};
use crate::services::HealthApi;

pub const CITY_HEALTH_ENDPOINT: &str = "https://api.cityhealthdashboard.com/api/data/tract-metric";

const CITY_NAME: &str = "Chicago";
const STATE_ABBR: &str = "IL";

/// City Health Dashboard client. The API token is added by wrapping the
/// inner client in [`UrlParam::token`](crate::fetch::auth::UrlParam::token).
pub struct CityHealthClient<C> {
    client: C,
    endpoint: String,
}

impl<C: HttpClient> CityHealthClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_endpoint(client, CITY_HEALTH_ENDPOINT.to_string())
    }

    pub fn with_endpoint(client: C, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    fn request_url(&self, metric: HealthMetric) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            metric.api_slug()
        ))?;
        url.query_pairs_mut()
            .append_pair("city_name", CITY_NAME)
            .append_pair("state_abbr", STATE_ABBR)
            .append_pair("data_yr_type", metric.data_yr_type());
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> HealthApi for CityHealthClient<C> {
    async fn tract_metric(&self, metric: HealthMetric) -> Result<Vec<TractMetricRow>> {
        let url = self.request_url(metric)?;
        let bytes = fetch_bytes(&self.client, url.as_str())
            .await
            .with_context(|| format!("Failed to fetch {} estimates", metric.api_slug()))?;
        let rows = parse_tract_metric(&bytes)?;
        info!(metric = metric.api_slug(), rows = rows.len(), "Tract metric fetched");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::auth::UrlParam;
    use crate::infra::testing::CannedClient;

    #[tokio::test]
    async fn test_tract_metric_request() {
        let body = r#"{"rows":[{"stcotr_fips":17031010100,"est":9.5}]}"#;
        let client =
            CityHealthClient::new(UrlParam::token(CannedClient::new(body), "abc".to_string()));

        let rows = client.tract_metric(HealthMetric::LifeExpectancy).await.unwrap();
        assert_eq!(rows.len(), 1);

        let urls = client.client.inner.urls();
        assert_eq!(
            urls[0],
            "https://api.cityhealthdashboard.com/api/data/tract-metric/life-expectancy\
             ?city_name=Chicago&state_abbr=IL&data_yr_type=2010-2015%2C+6+Year+Modeled+Estimate&token=abc"
        );
    }
}
