use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::fetch::{HttpClient, fetch_text};
use crate::services::LinePages;
use crate::transit::LineColor;
use crate::transit::line::DEFAULT_CTA_BASE_URL;

/// Fetches line pages from the CTA website.
pub struct CtaWebClient<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> CtaWebClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_CTA_BASE_URL.to_string())
    }

    pub fn with_base_url(client: C, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl<C: HttpClient> LinePages for CtaWebClient<C> {
    async fn line_page(&self, line: LineColor) -> Result<String> {
        let url = line.page_url(&self.base_url);
        debug!(url = %url, "Fetching line page");
        fetch_text(&self.client, &url)
            .await
            .with_context(|| format!("Failed to fetch the {line} line page"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::CannedClient;

    #[tokio::test]
    async fn test_fetches_line_url() {
        let client = CtaWebClient::with_base_url(
            CannedClient::new("<p class=\"rld-stopname\">Kimball</p>"),
            "https://cta.example".to_string(),
        );

        let html = client.line_page(LineColor::Brown).await.unwrap();
        assert!(html.contains("Kimball"));
        assert_eq!(client.client.urls(), vec!["https://cta.example/brownline/"]);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mut canned = CannedClient::new("gone");
        canned.status = 404;
        let client = CtaWebClient::new(canned);

        let err = client.line_page(LineColor::Red).await.unwrap_err();
        assert!(format!("{err:#}").contains("red line page"));
    }
}
