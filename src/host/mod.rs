//! Capability interface for the host editing application.
//!
//! The core depends only on the [`EditorHost`] trait: timeline and track
//! enumeration, per-item media attribute lookup, and the link-proxy
//! operation. [`remote::RemoteHost`] implements it against a host-bridge
//! endpoint; tests substitute a scripted double.

pub mod remote;

use crate::error::HostError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Handle to a single item on a video track of the active timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    pub id: u64,
    pub name: String,
}

/// Raw clip attributes as reported by the host for one media pool item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttributes {
    pub source_path: PathBuf,

    pub clip_name: String,

    pub fps: f64,

    #[serde(default)]
    pub h_flip: bool,

    #[serde(default)]
    pub v_flip: bool,

    /// Proxy the editor already has attached, if any.
    #[serde(default)]
    pub linked_proxy: Option<PathBuf>,

    /// Proxy path the editor knows about but has not attached.
    #[serde(default)]
    pub unlinked_proxy: Option<PathBuf>,

    /// Source media unreachable from the editor.
    #[serde(default)]
    pub offline: bool,
}

/// Host editing application capability interface.
#[async_trait::async_trait]
pub trait EditorHost: Send + Sync {
    /// Name of the currently open project.
    async fn active_project(&self) -> Result<String, HostError>;

    /// Name of the currently active timeline.
    async fn active_timeline(&self) -> Result<String, HostError>;

    /// Number of video tracks on the active timeline.
    async fn video_track_count(&self) -> Result<usize, HostError>;

    /// Items in the given video track. Track indices are zero-based.
    async fn track_items(&self, track: usize) -> Result<Vec<TrackItem>, HostError>;

    /// Resolve the media pool attributes backing a track item.
    ///
    /// `Ok(None)` means the item has no backing media (host-internal
    /// generator clips, titles); callers skip it.
    async fn media_attributes(
        &self,
        item: &TrackItem,
    ) -> Result<Option<MediaAttributes>, HostError>;

    /// Attach a proxy file to the clip that owns `source_path`.
    ///
    /// Returns `false` when the host refuses the link.
    async fn link_proxy(&self, source_path: &Path, proxy_path: &Path)
        -> Result<bool, HostError>;
}
