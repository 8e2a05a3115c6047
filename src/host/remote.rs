//! HTTP client for a host-bridge endpoint exposing the editor API.

use super::{EditorHost, MediaAttributes, TrackItem};
use crate::config::HostConfig;
use crate::error::HostError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Editor host reached over a host-bridge HTTP API.
pub struct RemoteHost {
    client: Client,
    base_url: String,
}

impl RemoteHost {
    pub fn new(config: &HostConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
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

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, HostError> {
        let response = self.client.get(self.url(path)).send().await?;

        if !response.status().is_success() {
            return Err(HostError::Api(format!(
                "GET {} returned {}",
                path,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[derive(Deserialize)]
struct NameReply {
    name: String,
}

#[derive(Deserialize)]
struct TrackCountReply {
    video_tracks: usize,
}

#[derive(Deserialize)]
struct AttributesReply {
    media: Option<MediaAttributes>,
}

#[derive(Deserialize)]
struct LinkReply {
    linked: bool,
}

#[async_trait::async_trait]
impl EditorHost for RemoteHost {
    async fn active_project(&self) -> Result<String, HostError> {
        Ok(self.get_json::<NameReply>("/project").await?.name)
    }

    async fn active_timeline(&self) -> Result<String, HostError> {
        Ok(self.get_json::<NameReply>("/timeline").await?.name)
    }

    async fn video_track_count(&self) -> Result<usize, HostError> {
        Ok(self
            .get_json::<TrackCountReply>("/timeline/tracks")
            .await?
            .video_tracks)
    }

    async fn track_items(&self, track: usize) -> Result<Vec<TrackItem>, HostError> {
        self.get_json(&format!("/timeline/tracks/{}/items", track))
            .await
    }

    async fn media_attributes(
        &self,
        item: &TrackItem,
    ) -> Result<Option<MediaAttributes>, HostError> {
        let path = format!("/items/{}/media", item.id);
        let response = self.client.get(self.url(&path)).send().await?;

        // The bridge reports the editor's per-item attribute type error as 422.
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(HostError::AttributeType(item.name.clone()));
        }

        if !response.status().is_success() {
            return Err(HostError::Api(format!(
                "GET {} returned {}",
                path,
                response.status()
            )));
        }

        Ok(response.json::<AttributesReply>().await?.media)
    }

    async fn link_proxy(
        &self,
        source_path: &Path,
        proxy_path: &Path,
    ) -> Result<bool, HostError> {
        let body = serde_json::json!({
            "source_path": source_path,
            "proxy_path": proxy_path,
        });

        let response = self
            .client
            .post(self.url("/link"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HostError::Api(format!(
                "POST /link returned {}",
                response.status()
            )));
        }

        Ok(response.json::<LinkReply>().await?.linked)
    }
}
