// File: src/source.rs
//! Task sources and batch ingestion.
//!
//! Each external service is a [`TaskSource`]. Ingestion lists raw tasks from a
//! source and derives parsed content and durations for each of them.
use crate::config::Config;
use crate::model::issue;
use crate::model::{ParseError, RawTask, Task, TaskDraft};
use anyhow::{Context, Result};
use uuid::Uuid;

/// A service that stores tasks.
///
/// The trait is object-safe so callers can hold `Box<dyn TaskSource>`.
pub trait TaskSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;
    fn list(&self) -> Result<Vec<RawTask>>;
    /// Creates a task and returns its id.
    fn add(&mut self, draft: TaskDraft) -> Result<String>;
    fn update(&mut self, id: &str, content: &str) -> Result<()>;
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// In-process task source, also used to replay exported task lists.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    tasks: Vec<RawTask>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(name: impl Into<String>, tasks: Vec<RawTask>) -> Self {
        Self {
            name: name.into(),
            tasks,
        }
    }

    /// Loads a JSON array of raw tasks.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let tasks: Vec<RawTask> =
            serde_json::from_str(json).context("Failed to parse task list JSON")?;
        Ok(Self::with_tasks(name, tasks))
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| anyhow::anyhow!("Task {} not found in {}", id, self.name))
    }
}

impl TaskSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn list(&self) -> Result<Vec<RawTask>> {
        Ok(self.tasks.clone())
    }

    fn add(&mut self, draft: TaskDraft) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.tasks.push(RawTask {
            id: id.clone(),
            content: draft.content,
            description: String::new(),
            labels: draft.labels,
            project: draft.project,
            due: draft.due,
            is_completed: false,
            priority: draft.priority,
        });
        log::debug!("Task {} created in {}", id, self.name);
        Ok(id)
    }

    fn update(&mut self, id: &str, content: &str) -> Result<()> {
        let idx = self.position(id)?;
        self.tasks[idx].content = content.to_string();
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let idx = self.position(id)?;
        self.tasks.remove(idx);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFailure {
    pub task_id: String,
    pub error: ParseError,
}

#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub tasks: Vec<Task>,
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn total_minutes(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.duration)).sum()
    }
}

/// Derives one task, expanding bare issue keys into links when the issue
/// tracker is configured.
pub fn derive_task(raw: RawTask, config: &Config) -> Result<Task, ParseError> {
    let durations = config.duration_labels();
    let task = Task::from_raw(raw, durations)?;
    let Some(jira) = &config.jira else {
        return Ok(task);
    };
    let links = issue::issue_links(task.raw_content(), &jira.server, &jira.issue_prefixes);
    if links.is_empty() {
        return Ok(task);
    }
    task.with_links(&links, durations)
}

/// Lists and derives every task of a source. A task that fails to parse is
/// recorded in the report and does not stop the batch.
pub fn ingest(source: &dyn TaskSource, config: &Config) -> Result<IngestReport> {
    let raw_tasks = source
        .list()
        .with_context(|| format!("Failed to list tasks from {}", source.name()))?;
    log::info!("Ingesting {} tasks from {}", raw_tasks.len(), source.name());

    let mut report = IngestReport::default();
    for raw in raw_tasks {
        let task_id = raw.id.clone();
        match derive_task(raw, config) {
            Ok(task) => {
                log::debug!("Task {}: {} ({}m)", task.id(), task.summary(), task.duration);
                report.tasks.push(task);
            }
            Err(error) => {
                log::warn!("Skipping task {}: {}", task_id, error);
                report.failures.push(IngestFailure { task_id, error });
            }
        }
    }
    Ok(report)
}
