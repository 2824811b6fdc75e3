use crate::fetch::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// The City of Chicago data portal accepts its app token in the
/// `X-App-Token` header; requests without one are throttled but still served.
pub struct ApiKey<C> {
    pub inner: C,
    pub header_name: String,
    pub key: String,
}

impl<C> ApiKey<C> {
    /// Uses the Socrata `X-App-Token` header.
    pub fn app_token(inner: C, key: String) -> Self {
        Self {
            inner,
            header_name: "X-App-Token".to_string(),
            key,
        }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> Result<reqwest::Response> {
        let header_name = HeaderName::from_bytes(self.header_name.as_bytes())?;
        let value = HeaderValue::from_str(&self.key)?;
        req.headers_mut().insert(header_name, value);
        self.inner.execute(req).await
    }
}
