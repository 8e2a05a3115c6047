//! Shared test doubles for integration tests.
//!
//! Provides a scripted [`MockHost`] standing in for the editing
//! application, a [`MockPool`] worker pool that completes or fails tasks by
//! clip name, and a [`ScriptedOperator`] that records everything shown to
//! the operator.

#![allow(dead_code)]

use proxybridge::dispatch::{BatchStatus, CompletedTask, TaskDescriptor, WorkerPool};
use proxybridge::error::{HostError, Result};
use proxybridge::host::{EditorHost, MediaAttributes, TrackItem};
use proxybridge::operator::Operator;

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Build host-reported attributes for a plain clip.
pub fn attrs(source: &str) -> MediaAttributes {
    MediaAttributes {
        source_path: PathBuf::from(source),
        clip_name: Path::new(source)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string(),
        fps: 25.0,
        h_flip: false,
        v_flip: false,
        linked_proxy: None,
        unlinked_proxy: None,
        offline: false,
    }
}

/// Scripted editing-application double.
///
/// Clips land on track 1 (the timeline has two video tracks by default).
/// `active_project` answers from a queue so tests can change the active
/// project mid-run; the last entry repeats.
pub struct MockHost {
    projects: Mutex<VecDeque<String>>,
    timeline: String,
    tracks: Mutex<Vec<Vec<TrackItem>>>,
    media: Mutex<HashMap<u64, MediaAttributes>>,
    refuse_links: HashSet<PathBuf>,
    linked: Mutex<Vec<(PathBuf, PathBuf)>>,
    next_id: Mutex<u64>,
}

impl MockHost {
    pub fn new(project: &str, timeline: &str) -> Self {
        Self {
            projects: Mutex::new(VecDeque::from([project.to_string()])),
            timeline: timeline.to_string(),
            tracks: Mutex::new(vec![Vec::new(), Vec::new()]),
            media: Mutex::new(HashMap::new()),
            refuse_links: HashSet::new(),
            linked: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Queue a project name to be reported after the current one.
    pub fn project_becomes(self, project: &str) -> Self {
        self.projects.lock().unwrap().push_back(project.to_string());
        self
    }

    /// Refuse link attempts for the given proxy path.
    pub fn refusing_link(mut self, proxy: &str) -> Self {
        self.refuse_links.insert(PathBuf::from(proxy));
        self
    }

    /// Place a clip on track 1.
    pub fn with_clip(self, attrs: MediaAttributes) -> Self {
        {
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;

            self.tracks.lock().unwrap()[1].push(TrackItem {
                id,
                name: attrs.clip_name.clone(),
            });
            self.media.lock().unwrap().insert(id, attrs);
        }
        self
    }

    /// Reduce the timeline to a single video track.
    pub fn single_track(self) -> Self {
        self.tracks.lock().unwrap().truncate(1);
        self
    }

    /// Every `(source, proxy)` pair successfully linked so far.
    pub fn linked(&self) -> Vec<(PathBuf, PathBuf)> {
        self.linked.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl EditorHost for MockHost {
    async fn active_project(&self) -> std::result::Result<String, HostError> {
        let mut projects = self.projects.lock().unwrap();
        if projects.len() > 1 {
            Ok(projects.pop_front().unwrap())
        } else {
            Ok(projects.front().cloned().unwrap_or_default())
        }
    }

    async fn active_timeline(&self) -> std::result::Result<String, HostError> {
        Ok(self.timeline.clone())
    }

    async fn video_track_count(&self) -> std::result::Result<usize, HostError> {
        Ok(self.tracks.lock().unwrap().len())
    }

    async fn track_items(&self, track: usize) -> std::result::Result<Vec<TrackItem>, HostError> {
        Ok(self.tracks.lock().unwrap()[track].clone())
    }

    async fn media_attributes(
        &self,
        item: &TrackItem,
    ) -> std::result::Result<Option<MediaAttributes>, HostError> {
        Ok(self.media.lock().unwrap().get(&item.id).cloned())
    }

    async fn link_proxy(
        &self,
        source_path: &Path,
        proxy_path: &Path,
    ) -> std::result::Result<bool, HostError> {
        if self.refuse_links.contains(proxy_path) {
            return Ok(false);
        }

        self.linked
            .lock()
            .unwrap()
            .push((source_path.to_path_buf(), proxy_path.to_path_buf()));

        // The editor clears the unlinked pointer once the proxy attaches.
        let mut media = self.media.lock().unwrap();
        for attrs in media.values_mut() {
            if attrs.source_path == source_path {
                attrs.unlinked_proxy = None;
                attrs.linked_proxy = Some(proxy_path.to_path_buf());
            }
        }

        Ok(true)
    }
}

/// Worker pool double: completes every submitted task except those whose
/// clip name was marked as failing.
pub struct MockPool {
    fail_names: HashSet<String>,
    output_paths: HashMap<String, PathBuf>,
    submitted: Mutex<Vec<TaskDescriptor>>,
}

impl MockPool {
    pub fn new() -> Self {
        Self {
            fail_names: HashSet::new(),
            output_paths: HashMap::new(),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Mark a clip's task as terminally failing.
    pub fn failing(mut self, clip_name: &str) -> Self {
        self.fail_names.insert(clip_name.to_string());
        self
    }

    /// Report an explicit output path for a clip's completed task.
    pub fn with_output(mut self, clip_name: &str, output: &str) -> Self {
        self.output_paths
            .insert(clip_name.to_string(), PathBuf::from(output));
        self
    }

    pub fn submitted(&self) -> Vec<TaskDescriptor> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl WorkerPool for MockPool {
    async fn submit_batch(&self, _: Uuid, tasks: &[TaskDescriptor]) -> Result<()> {
        *self.submitted.lock().unwrap() = tasks.to_vec();
        Ok(())
    }

    async fn batch_status(&self, _: Uuid) -> Result<BatchStatus> {
        let tasks = self.submitted.lock().unwrap().clone();
        let (failed, completed): (Vec<_>, Vec<_>) = tasks
            .into_iter()
            .partition(|t| self.fail_names.contains(&t.clip_name));

        Ok(BatchStatus {
            pending: 0,
            failed: failed.len(),
            completed: completed
                .into_iter()
                .map(|t| {
                    let output_path = self.output_paths.get(&t.clip_name).cloned();
                    CompletedTask {
                        task: t,
                        output_path,
                        extra: Default::default(),
                    }
                })
                .collect(),
        })
    }

    async fn ping(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Operator double that records messages and answers the confirmation gate
/// with a preset decision.
pub struct ScriptedOperator {
    accept: bool,
    messages: Mutex<Vec<String>>,
    confirms: Mutex<usize>,
}

impl ScriptedOperator {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            messages: Mutex::new(Vec::new()),
            confirms: Mutex::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            accept: false,
            messages: Mutex::new(Vec::new()),
            confirms: Mutex::new(0),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn confirm_count(&self) -> usize {
        *self.confirms.lock().unwrap()
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Operator for ScriptedOperator {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("WARN: {}", message));
    }

    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("NOTIFY: {}", message));
    }

    fn confirm(&self, _title: &str, _message: &str) -> bool {
        *self.confirms.lock().unwrap() += 1;
        self.accept
    }
}
