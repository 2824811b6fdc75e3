//! HTTP plumbing shared by the CTA page scraper and the JSON API clients.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, anyhow};
use tracing::debug;

/// Issues a GET for `url` through `client` and returns the body bytes.
///
/// # Errors
///
/// Fails on transport errors and on any non-success status code.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("GET {} returned status {}: {}", url, status, body));
    }

    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Fetched response body");
    Ok(bytes)
}

/// Like [`fetch_bytes`], decoding the body as UTF-8 (lossily).
pub async fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<String> {
    let bytes = fetch_bytes(client, url).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
