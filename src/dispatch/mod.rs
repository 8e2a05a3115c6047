//! Batch dispatch to the distributed worker pool.
//!
//! One invocation submits all tasks as a single batch and blocks the caller
//! until every unit reaches a terminal state. The pool schedules units
//! concurrently on its own workers; completion order within a batch is
//! unspecified and nothing here relies on it.

pub mod pool;

pub use pool::{BatchStatus, HttpWorkerPool, WorkerPool};

use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::inventory::ClipRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// One unit of remote work: a clip's fields plus job-scoped context.
///
/// Serializes to a flat string/number/bool map; the pool preserves no
/// object identity across the boundary. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub source_path: PathBuf,
    pub clip_name: String,
    pub fps: f64,
    pub h_flip: bool,
    pub v_flip: bool,
    /// Directory the worker writes the rendered proxy into.
    pub expected_proxy_dir: PathBuf,
    /// Extension the worker renders with, including the dot.
    pub output_ext: String,
    pub project: String,
    pub timeline: String,
}

impl TaskDescriptor {
    pub fn from_clip(
        clip: &ClipRecord,
        project: &str,
        timeline: &str,
        output_ext: &str,
    ) -> Self {
        Self {
            source_path: clip.source_path.clone(),
            clip_name: clip.clip_name.clone(),
            fps: clip.fps,
            h_flip: clip.h_flip,
            v_flip: clip.v_flip,
            expected_proxy_dir: clip.expected_proxy_dir.clone().unwrap_or_default(),
            output_ext: output_ext.to_string(),
            project: project.to_string(),
            timeline: timeline.to_string(),
        }
    }

    /// Path the rendered proxy is expected at, used when the pool does not
    /// report an explicit output path.
    pub fn derived_output_path(&self) -> PathBuf {
        let stem = Path::new(&self.clip_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.clip_name.clone());
        self.expected_proxy_dir
            .join(format!("{}{}", stem, self.output_ext))
    }
}

/// A unit that reached the completed state, echoing its descriptor plus any
/// fields the pool filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTask {
    #[serde(flatten)]
    pub task: TaskDescriptor,

    /// Where the worker actually wrote the proxy, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    /// Any further pool-reported fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CompletedTask {
    /// Proxy path to feed the matcher: the pool-reported location if
    /// present, otherwise derived from the expected directory.
    pub fn proxy_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| self.task.derived_output_path())
    }
}

/// Aggregate outcome of one submitted batch.
///
/// Failed units carry no per-unit detail here; they are simply absent from
/// the completed collection.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub submitted: usize,
    pub completed: Vec<CompletedTask>,
}

impl BatchResult {
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn any_failed(&self) -> bool {
        self.completed.len() < self.submitted
    }
}

/// Submits task batches to the worker pool and awaits their completion.
pub struct JobDispatcher {
    pool: Arc<dyn WorkerPool>,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl JobDispatcher {
    pub fn new(pool: Arc<dyn WorkerPool>, config: &PoolConfig) -> Self {
        Self {
            pool,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            max_wait: config.max_wait_secs.map(Duration::from_secs),
        }
    }

    /// Submit `tasks` as one batch and wait until every unit reaches a
    /// terminal state.
    ///
    /// The wait is unbounded unless `pool.max_wait_secs` is configured, in
    /// which case an overrun returns [`Error::BatchTimeout`]. No retry is
    /// applied here; retry policy, if any, belongs to the pool.
    pub async fn submit(&self, tasks: Vec<TaskDescriptor>) -> Result<BatchResult> {
        let batch_id = Uuid::new_v4();
        let submitted = tasks.len();

        tracing::info!("Submitting batch {} with {} task(s)", batch_id, submitted);
        self.pool.submit_batch(batch_id, &tasks).await?;

        let started = Instant::now();
        loop {
            let status = self.pool.batch_status(batch_id).await?;

            if status.pending == 0 {
                tracing::info!(
                    "Batch {} finished: {} completed, {} failed",
                    batch_id,
                    status.completed.len(),
                    status.failed
                );
                return Ok(BatchResult {
                    batch_id,
                    submitted,
                    completed: status.completed,
                });
            }

            if let Some(max_wait) = self.max_wait {
                if started.elapsed() >= max_wait {
                    return Err(Error::BatchTimeout(max_wait));
                }
            }

            tracing::debug!("Batch {}: {} unit(s) still pending", batch_id, status.pending);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
