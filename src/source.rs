//! Where the process-group status tree for a cycle comes from

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{instrument, trace};

use crate::{ProcessGroupStatus, config::StatusSourceConfig};

#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Current status of the root process group, including all descendants
    async fn fetch(&self) -> Result<ProcessGroupStatus>;
}

/// Polls an HTTP endpoint serving the status tree as JSON
pub struct HttpStatusSource {
    client: reqwest::Client,
    config: StatusSourceConfig,
}

impl HttpStatusSource {
    pub fn new(config: StatusSourceConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    #[instrument(skip(self), fields(source = %self.config.url))]
    async fn fetch(&self) -> Result<ProcessGroupStatus> {
        let mut request = self.client.get(&self.config.url);

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("failed to send HTTP request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("failed to read response body")?;

        let status: ProcessGroupStatus =
            serde_json::from_str(&body).context("failed to parse process group status JSON")?;

        trace!("received status for root group {:?}", status.name);

        Ok(status)
    }
}

/// Always returns the same tree
#[derive(Debug, Clone)]
pub struct StaticStatusSource(pub ProcessGroupStatus);

#[async_trait]
impl StatusSource for StaticStatusSource {
    async fn fetch(&self) -> Result<ProcessGroupStatus> {
        Ok(self.0.clone())
    }
}
