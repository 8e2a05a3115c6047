//! Classification of collected clips into handling buckets.
//!
//! Stages run in a fixed priority order and each stage consumes the clips
//! it matches, so the buckets partition the input with no overlap:
//!
//! 1. **AlreadyLinked** - a proxy is attached in the editor; done.
//! 2. **Offline** - source media unreachable; reported, never queued.
//! 3. **ExistingUnlinked** - a proxy exists on disk but is not attached;
//!    routed to the matcher instead of the encoder. A recorded path that
//!    vanished from disk is cleared and the clip falls through to encoding.
//! 4. **NeedsEncode** - everything left; gets its expected proxy directory
//!    derived from the source path.

use super::ClipRecord;
use crate::config::Config;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Disjoint handling buckets produced by one classification pass.
#[derive(Debug, Default)]
pub struct Classified {
    pub already_linked: Vec<ClipRecord>,
    pub offline: Vec<ClipRecord>,
    pub existing_unlinked: Vec<ClipRecord>,
    pub needs_encode: Vec<ClipRecord>,
    /// Recorded proxy paths that no longer exist on disk. The owning clips
    /// had the field cleared and sit in `needs_encode`.
    pub stale: Vec<PathBuf>,
}

impl Classified {
    /// Total clips across the four buckets.
    pub fn total(&self) -> usize {
        self.already_linked.len()
            + self.offline.len()
            + self.existing_unlinked.len()
            + self.needs_encode.len()
    }

    /// Clips dealt with by some stage other than the encode queue.
    pub fn handled_count(&self) -> usize {
        self.already_linked.len() + self.offline.len() + self.existing_unlinked.len()
    }
}

/// Split clips into handling buckets.
pub fn classify(clips: Vec<ClipRecord>, config: &Config) -> Classified {
    let mut out = Classified::default();
    let mut remaining = clips;

    if config.handlers.handle_already_linked {
        let (matched, rest): (Vec<_>, Vec<_>) = remaining.into_iter().partition(|c| {
            c.linked_proxy
                .as_ref()
                .is_some_and(|p| !p.as_os_str().is_empty())
        });
        out.already_linked = matched;
        remaining = rest;
    }

    if config.handlers.handle_offline {
        let (matched, rest): (Vec<_>, Vec<_>) =
            remaining.into_iter().partition(|c| c.offline);
        out.offline = matched;
        remaining = rest;
    }

    if config.handlers.handle_existing_unlinked {
        let mut rest = Vec::new();
        for mut clip in remaining {
            match clip.unlinked_proxy.clone() {
                Some(path) if path.exists() => out.existing_unlinked.push(clip),
                Some(path) => {
                    warn!(
                        "Recorded proxy for {:?} no longer exists at {:?}; re-queueing for encode",
                        clip.clip_name, path
                    );
                    clip.unlinked_proxy = None;
                    out.stale.push(path);
                    rest.push(clip);
                }
                None => rest.push(clip),
            }
        }
        remaining = rest;
    }

    for mut clip in remaining {
        clip.expected_proxy_dir = Some(expected_proxy_dir(
            &clip.source_path,
            &config.paths.proxy_root,
        ));
        out.needs_encode.push(clip);
    }

    out
}

/// Mirror the source file's directory structure, minus its filesystem root,
/// under the configured proxy root.
pub fn expected_proxy_dir(source_path: &Path, proxy_root: &Path) -> PathBuf {
    let dir = source_path.parent().unwrap_or_else(|| Path::new(""));
    let relative: PathBuf = dir
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    proxy_root.join(relative)
}
