//! End-to-end reconciliation.
//!
//! The only state machine in the core: classify the timeline's clips, link
//! what already exists on disk, confirm with the operator, dispatch the
//! remainder as one batch, wait, then re-match the completed outputs
//! against the live clip set. Every run starts from scratch; there is no
//! partial-state resume, and an in-flight batch cannot be cancelled.

use crate::config::Config;
use crate::dispatch::{BatchResult, JobDispatcher, TaskDescriptor};
use crate::error::Result;
use crate::host::EditorHost;
use crate::inventory::{self, Classified};
use crate::matcher;
use crate::operator::Operator;
use std::path::PathBuf;

/// Outcome of one reconciliation run.
#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing was queued and nothing was handled.
    NothingToDo,
    /// No encoding was needed; earlier stages handled everything.
    AlreadyHandled,
    /// The operator declined the confirmation gate. No side effects.
    Declined,
    /// A batch was dispatched and reconciled.
    Completed(RunSummary),
}

/// Counts emitted to the operator after a completed run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub queued: usize,
    pub completed: usize,
    pub failed: usize,
    pub linked: usize,
    pub failed_to_link: Vec<String>,
    pub skipped_project_changed: usize,
}

pub struct Reconciler<'a> {
    host: &'a dyn EditorHost,
    dispatcher: &'a JobDispatcher,
    operator: &'a dyn Operator,
    config: &'a Config,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        host: &'a dyn EditorHost,
        dispatcher: &'a JobDispatcher,
        operator: &'a dyn Operator,
        config: &'a Config,
    ) -> Self {
        Self {
            host,
            dispatcher,
            operator,
            config,
        }
    }

    /// Run the whole flow once.
    pub async fn run(&self) -> Result<RunOutcome> {
        let project = self.host.active_project().await?;
        let timeline = self.host.active_timeline().await?;
        self.operator
            .info(&format!("Working on: {} - {}", project, timeline));

        // Idle -> Classified
        let clips = inventory::collect_clips(self.host).await?;
        tracing::info!("Collected {} unique clip(s)", clips.len());

        let mut classified = inventory::classify(clips, self.config);
        self.report_classification(&classified);

        // Existing unlinked proxies are attached now, shrinking the encode
        // queue before the operator sees it.
        if !classified.existing_unlinked.is_empty() {
            self.link_existing(&mut classified).await?;
        }

        // Classified -> ConfirmedOrAborted
        if classified.needs_encode.is_empty() {
            return if classified.handled_count() > 0 {
                self.operator
                    .info("All clips are handled. No encoding necessary.");
                Ok(RunOutcome::AlreadyHandled)
            } else {
                self.operator.warn(
                    "There is no new media to queue for proxies. To re-render \
                     existing proxies, unlink them in the editor and try again.",
                );
                Ok(RunOutcome::NothingToDo)
            };
        }

        let queued = classified.needs_encode.len();
        if !self.operator.confirm(
            "Ready to queue",
            &format!("{} clip(s) are ready to queue. Continue?", queued),
        ) {
            self.operator.info("Aborted before dispatch.");
            return Ok(RunOutcome::Declined);
        }

        // ConfirmedOrAborted -> Dispatched -> Awaited
        let tasks: Vec<TaskDescriptor> = classified
            .needs_encode
            .iter()
            .map(|clip| {
                TaskDescriptor::from_clip(clip, &project, &timeline, &self.config.paths.proxy_ext)
            })
            .collect();

        self.operator.notify("Started encoding job");
        self.operator
            .info("Waiting for the batch to finish. Feel free to minimize.");

        let batch = self.dispatcher.submit(tasks).await?;

        if batch.any_failed() {
            let mut message = format!(
                "{} video(s) failed to encode.",
                batch.submitted - batch.completed_count()
            );
            if let Some(dashboard) = &self.config.pool.dashboard_url {
                message.push_str(&format!(" Check worker logs at {}.", dashboard));
            }
            self.operator.notify(&message);
        }
        self.operator.notify(&format!(
            "Completed encoding {} video(s).",
            batch.completed_count()
        ));

        // Awaited -> Reconciled
        let summary = self.reconcile(&batch, queued).await?;

        // Reconciled -> Done
        self.report_summary(&summary);
        Ok(RunOutcome::Completed(summary))
    }

    /// Attach proxies the editor already knows about but never linked.
    async fn link_existing(&self, classified: &mut Classified) -> Result<()> {
        let candidates: Vec<PathBuf> = classified
            .existing_unlinked
            .iter()
            .filter_map(|c| c.unlinked_proxy.clone())
            .collect();

        self.operator
            .info(&format!("Linking {} existing proxy(s).", candidates.len()));

        let report = matcher::link_proxies(
            self.host,
            &candidates,
            &mut classified.existing_unlinked,
        )
        .await?;

        self.operator.info(&format!(
            "{} proxy(s) linked, will not be queued.",
            report.linked.len()
        ));

        if !report.failed.is_empty() {
            self.operator.warn(&format!(
                "These proxies matched but couldn't be linked, consider re-rendering \
                 them: {}",
                report.failed_names().join(", ")
            ));
        }

        Ok(())
    }

    /// Match the batch's completed outputs back to the live clip set.
    async fn reconcile(&self, batch: &BatchResult, queued: usize) -> Result<RunSummary> {
        let mut summary = RunSummary {
            queued,
            completed: batch.completed_count(),
            failed: batch.submitted - batch.completed_count(),
            ..Default::default()
        };

        // The active project may have changed during the blocking wait;
        // results tagged with another project are skippable, not linkable.
        let active_project = self.host.active_project().await?;
        let (linkable, skipped): (Vec<_>, Vec<_>) = batch
            .completed
            .iter()
            .partition(|t| t.task.project == active_project);
        summary.skipped_project_changed = skipped.len();

        if !skipped.is_empty() {
            self.operator.warn(&format!(
                "{} completed proxy(s) belong to a different project; skipping.",
                skipped.len()
            ));
        }

        if linkable.is_empty() {
            self.operator.info(
                "No proxies to link post-encode. The project may have changed. Skipping.",
            );
            return Ok(summary);
        }

        let candidates: Vec<PathBuf> = linkable.iter().map(|t| t.proxy_path()).collect();
        let mut clips = inventory::collect_clips(self.host).await?;
        let report = matcher::link_proxies(self.host, &candidates, &mut clips).await?;

        summary.linked = report.linked.len();
        summary.failed_to_link = report.failed_names();
        Ok(summary)
    }

    fn report_classification(&self, classified: &Classified) {
        if !classified.already_linked.is_empty() {
            self.operator.info(&format!(
                "{} clip(s) already have a proxy linked.",
                classified.already_linked.len()
            ));
        }

        if !classified.offline.is_empty() {
            let names: Vec<_> = classified
                .offline
                .iter()
                .map(|c| c.clip_name.as_str())
                .collect();
            self.operator.warn(&format!(
                "{} clip(s) have offline source media and won't be queued: {}",
                classified.offline.len(),
                names.join(", ")
            ));
        }

        if !classified.stale.is_empty() {
            for path in &classified.stale {
                self.operator.warn(&format!(
                    "Proxy media not found at {:?}; the clip will be re-encoded.",
                    path
                ));
            }
        }
    }

    fn report_summary(&self, summary: &RunSummary) {
        self.operator.info(&format!(
            "Done: {} queued, {} completed, {} failed, {} linked, {} skipped (project changed).",
            summary.queued,
            summary.completed,
            summary.failed,
            summary.linked,
            summary.skipped_project_changed
        ));

        if !summary.failed_to_link.is_empty() {
            self.operator.warn(&format!(
                "These proxies rendered but couldn't be linked, consider re-rendering \
                 them: {}",
                summary.failed_to_link.join(", ")
            ));
        }
    }
}
