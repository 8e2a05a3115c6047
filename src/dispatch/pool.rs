//! Worker pool client.

use super::{CompletedTask, TaskDescriptor};
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Connection timeout for pool API requests
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal/pending breakdown for one batch, as reported by the pool.
#[derive(Debug, Default, Deserialize)]
pub struct BatchStatus {
    /// Units still queued or running.
    #[serde(default)]
    pub pending: usize,

    /// Units that reached a terminal failed state.
    #[serde(default)]
    pub failed: usize,

    /// Records for units that completed.
    #[serde(default)]
    pub completed: Vec<CompletedTask>,
}

/// Opaque concurrent executor for transcode batches, reached over a network
/// boundary.
#[async_trait::async_trait]
pub trait WorkerPool: Send + Sync {
    /// Queue every task in the batch. Fire-and-forget at the network layer;
    /// the caller awaits completion through [`Self::batch_status`].
    async fn submit_batch(&self, batch_id: Uuid, tasks: &[TaskDescriptor]) -> Result<()>;

    /// Current status of a previously submitted batch.
    async fn batch_status(&self, batch_id: Uuid) -> Result<BatchStatus>;

    /// Reachability check for the pool endpoint.
    async fn ping(&self) -> Result<bool>;
}

/// HTTP implementation against the pool's batch API.
pub struct HttpWorkerPool {
    client: Client,
    base_url: String,
}

impl HttpWorkerPool {
    pub fn new(config: &PoolConfig) -> Self {
        let client = Client::builder()
            .timeout(CONNECTION_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    batch_id: Uuid,
    tasks: &'a [TaskDescriptor],
}

#[async_trait::async_trait]
impl WorkerPool for HttpWorkerPool {
    async fn submit_batch(&self, batch_id: Uuid, tasks: &[TaskDescriptor]) -> Result<()> {
        let response = self
            .client
            .post(self.url("/batches"))
            .json(&SubmitBody { batch_id, tasks })
            .send()
            .await
            .map_err(|e| Error::pool(format!("failed to submit batch: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::pool(format!(
                "batch submission rejected: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn batch_status(&self, batch_id: Uuid) -> Result<BatchStatus> {
        let response = self
            .client
            .get(self.url(&format!("/batches/{}", batch_id)))
            .send()
            .await
            .map_err(|e| Error::pool(format!("failed to fetch batch status: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::pool(format!(
                "batch status request returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::pool(format!("malformed batch status: {}", e)))
    }

    async fn ping(&self) -> Result<bool> {
        match self.client.get(self.url("/status")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::debug!("Pool ping failed: {}", e);
                Ok(false)
            }
        }
    }
}
