//! Clip inventory.
//!
//! Collects one record per unique source media referenced on the active
//! timeline, then classifies the records into handling buckets. Multiple
//! track items referencing the same source media collapse to one record so
//! nothing is double-queued.

pub mod classify;

pub use classify::{classify, expected_proxy_dir, Classified};

use crate::error::{Error, HostError, Result};
use crate::host::{EditorHost, MediaAttributes};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use tracing::debug;

/// One record per unique source media referenced on the timeline.
///
/// At classification time at most one of `linked_proxy` and
/// `unlinked_proxy` is set.
#[derive(Debug, Clone)]
pub struct ClipRecord {
    pub source_path: PathBuf,
    pub clip_name: String,
    pub fps: f64,
    pub h_flip: bool,
    pub v_flip: bool,
    pub linked_proxy: Option<PathBuf>,
    pub unlinked_proxy: Option<PathBuf>,
    /// Directory a rendered proxy is expected to land in. Derived during
    /// classification for clips routed to encoding.
    pub expected_proxy_dir: Option<PathBuf>,
    pub offline: bool,
}

impl From<MediaAttributes> for ClipRecord {
    fn from(attrs: MediaAttributes) -> Self {
        Self {
            source_path: attrs.source_path,
            clip_name: attrs.clip_name,
            fps: attrs.fps,
            h_flip: attrs.h_flip,
            v_flip: attrs.v_flip,
            linked_proxy: attrs.linked_proxy,
            unlinked_proxy: attrs.unlinked_proxy,
            expected_proxy_dir: None,
            offline: attrs.offline,
        }
    }
}

// Structural equality over every host-reported field. `expected_proxy_dir`
// is derived later and excluded, so dedup happens on raw attributes.
impl PartialEq for ClipRecord {
    fn eq(&self, other: &Self) -> bool {
        self.source_path == other.source_path
            && self.clip_name == other.clip_name
            && self.fps.to_bits() == other.fps.to_bits()
            && self.h_flip == other.h_flip
            && self.v_flip == other.v_flip
            && self.linked_proxy == other.linked_proxy
            && self.unlinked_proxy == other.unlinked_proxy
            && self.offline == other.offline
    }
}

impl Eq for ClipRecord {}

impl Hash for ClipRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_path.hash(state);
        self.clip_name.hash(state);
        self.fps.to_bits().hash(state);
        self.h_flip.hash(state);
        self.v_flip.hash(state);
        self.linked_proxy.hash(state);
        self.unlinked_proxy.hash(state);
        self.offline.hash(state);
    }
}

/// Collect one `ClipRecord` per unique source media on the active timeline.
///
/// The host refuses to enumerate track items when the timeline has fewer
/// than two video tracks, so that case is surfaced as a configuration error
/// rather than an empty result. Items with no resolvable backing media are
/// skipped, not failed.
pub async fn collect_clips(host: &dyn EditorHost) -> Result<Vec<ClipRecord>> {
    let track_count = host.video_track_count().await?;
    if track_count < 2 {
        return Err(Error::configuration(
            "Not enough video tracks on the timeline to enumerate clips. \
             Add another empty video track and retry.",
        ));
    }

    let mut seen: HashSet<ClipRecord> = HashSet::new();
    let mut clips = Vec::new();

    for track in 1..track_count {
        let items = host.track_items(track).await?;
        if items.is_empty() {
            debug!("No items found in track {}", track);
            continue;
        }

        for item in items {
            match host.media_attributes(&item).await {
                Ok(Some(attrs)) => {
                    let record = ClipRecord::from(attrs);
                    if seen.insert(record.clone()) {
                        clips.push(record);
                    }
                }
                Ok(None) => {
                    debug!("Skipping {}, no backing media pool item", item.name);
                }
                Err(HostError::AttributeType(name)) => {
                    debug!("Skipping {}, attribute resolution failed", name);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(clips)
}
