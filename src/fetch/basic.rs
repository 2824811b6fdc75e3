use super::client::HttpClient;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("cta_health/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self(inner))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> Result<reqwest::Response> {
        Ok(self.0.execute(req).await?)
    }
}
