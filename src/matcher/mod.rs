//! Fuzzy filename matching between proxy files and clip records.
//!
//! Proxy renders carry suffixes (`A_proxy.mov` for `A.mov`), so exact
//! filename equality is too strict. A proxy and a clip refer to the same
//! media when one basename contains the other, case-insensitively.

pub mod walk;

use crate::error::Result;
use crate::host::EditorHost;
use crate::inventory::ClipRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of one matching pass.
#[derive(Debug, Default)]
pub struct MatchReport {
    /// Proxies successfully attached to a clip.
    pub linked: Vec<PathBuf>,
    /// Proxies that matched a clip by name but failed to attach.
    pub failed: Vec<PathBuf>,
}

impl MatchReport {
    /// Basenames of the proxies that matched but failed to attach, for the
    /// operator summary.
    pub fn failed_names(&self) -> Vec<String> {
        self.failed
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect()
    }
}

fn stem_lower(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn stems_match(proxy_stem: &str, clip_stem: &str) -> bool {
    !proxy_stem.is_empty()
        && !clip_stem.is_empty()
        && (proxy_stem.contains(clip_stem) || clip_stem.contains(proxy_stem))
}

/// Attempt to attach each candidate proxy to a matching clip.
///
/// Clips are scanned in slice order and the first filename match wins; no
/// longest-match or most-specific-match semantics are implied. A proxy that
/// fails to attach is not retried against later clips in the same call, and
/// a proxy with no matching clip is silently left out of both lists.
///
/// Clips that get a proxy attached have their `unlinked_proxy` cleared.
pub async fn link_proxies(
    host: &dyn EditorHost,
    candidates: &[PathBuf],
    clips: &mut [ClipRecord],
) -> Result<MatchReport> {
    let mut report = MatchReport::default();

    'candidates: for proxy in candidates {
        let proxy_stem = stem_lower(proxy);

        for clip in clips.iter_mut() {
            let clip_stem = stem_lower(&clip.source_path);
            if !stems_match(&proxy_stem, &clip_stem) {
                continue;
            }

            info!("Found match: {:?} & {:?}", proxy, clip.source_path);

            if host.link_proxy(&clip.source_path, proxy).await? {
                debug!("Linked {:?}", proxy);
                report.linked.push(proxy.clone());
                clip.unlinked_proxy = None;
            } else {
                warn!("Failed to attach {:?} to {:?}", proxy, clip.source_path);
                report.failed.push(proxy.clone());
            }

            // One attempt per proxy per pass, success or not.
            continue 'candidates;
        }
    }

    Ok(report)
}
