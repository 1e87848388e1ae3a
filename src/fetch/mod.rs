//! Data acquisition for the ratings dataset.
//!
//! The dataset is consumed once per run: either a single HTTP GET against a
//! remote CSV export, or a local file read. There is no retry policy; an
//! unreachable or error-status source fails the whole run.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use tracing::debug;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Fetched source bytes");
    Ok(bytes)
}

/// Loads the dataset from a URL or a local file path.
#[tracing::instrument(fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await
    } else {
        Ok(std::fs::read(source)?)
    }
}
