use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;

const USER_AGENT: &str = "riftwatch-ingestor/0.1 (+conflict-early-warning)";

/// Gates every outbound HTTP call across all sources behind a single permit
/// set so one cycle never opens more than `MAX_CONCURRENT_CONNECTIONS`
/// sockets at once (IP-throttling guard — see spec §4.1).
pub struct Fetcher {
    http: reqwest::Client,
    permits: Arc<Semaphore>,
}

impl Fetcher {
    pub fn new(max_concurrent_connections: usize, fetch_timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            permits: Arc::new(Semaphore::new(max_concurrent_connections.max(1))),
        }
    }

    /// Fetch `url` as text, following redirects (reqwest's default policy).
    /// Acquires a global permit first so concurrent source fetches never
    /// exceed the configured ceiling.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .context("fetch permit semaphore closed")?;
        let response = self.http.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }

    pub async fn get_bytes(&self, url: &str) -> Result<bytes::Bytes> {
        let _permit = self
            .permits
            .acquire()
            .await
            .context("fetch permit semaphore closed")?;
        let response = self.http.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.bytes().await?)
    }
}
