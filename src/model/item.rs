// File: ./src/model/item.rs
use crate::model::duration::DurationTable;
use crate::model::parser::{self, LinkPair, ParseError, ParsedContent};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A task as supplied by a task source, before any derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTask {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub priority: Option<u8>,
}

impl RawTask {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }
}

/// Accepts ISO dates and date-times only. Anything else belongs to an
/// external date parser and yields `None`.
pub fn parse_due(val: &str) -> Option<NaiveDateTime> {
    let val = val.trim();
    if let Ok(d) = NaiveDate::parse_from_str(val, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(val, fmt).ok())
}

/// A task with every derived field computed from its raw data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub raw: RawTask,
    pub parsed: ParsedContent,
    pub duration: u32,
    pub date: Option<NaiveDateTime>,
}

impl Task {
    pub fn from_raw(raw: RawTask, durations: &DurationTable) -> Result<Self, ParseError> {
        let parsed = parser::parse(&raw.content)?;
        let duration = durations.resolve(&raw.labels);
        let date = raw.due.as_deref().and_then(parse_due);
        Ok(Self {
            raw,
            parsed,
            duration,
            date,
        })
    }

    /// Rewrites the raw content through a link dictionary and derives again.
    pub fn with_links(
        &self,
        links: &BTreeMap<String, String>,
        durations: &DurationTable,
    ) -> Result<Self, ParseError> {
        let mut raw = self.raw.clone();
        raw.content = parser::process_links(&raw.content, links);
        Self::from_raw(raw, durations)
    }

    pub fn id(&self) -> &str {
        &self.raw.id
    }

    pub fn raw_content(&self) -> &str {
        &self.raw.content
    }

    pub fn pure_content(&self) -> &str {
        &self.parsed.clean_content
    }

    pub fn summary(&self) -> String {
        self.parsed.summary()
    }

    pub fn short_duration(&self) -> Option<&str> {
        self.parsed.short_duration.as_deref()
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.parsed.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.parsed.end_time
    }

    pub fn links(&self) -> &[LinkPair] {
        &self.parsed.links
    }

    /// Clean content with links rendered back to Markdown.
    pub fn content(&self) -> String {
        self.parsed.rendered()
    }

    pub fn is_open(&self) -> bool {
        !self.raw.is_completed
    }

    pub fn has_time(&self) -> bool {
        self.date.is_some_and(|d| d.hour() > 0)
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pure_content())
    }
}

/// Input for creating a task in a source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub content: String,
    pub due: Option<String>,
    pub labels: Vec<String>,
    pub project: Option<String>,
    pub priority: Option<u8>,
}

impl TaskDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Adds the duration label configured for exactly `minutes`, if any.
    pub fn with_estimate(mut self, minutes: u32, durations: &DurationTable) -> Self {
        match durations.label_for_duration(minutes) {
            Some(label) => {
                if !self.labels.iter().any(|l| l == label) {
                    self.labels.push(label.to_string());
                }
            }
            None => log::debug!("No duration label configured for {} minutes", minutes),
        }
        self
    }
}

/// Tasks whose raw content contains `search` and whose date falls on `date`.
/// A `None` criterion matches everything.
pub fn search_tasks<'a>(
    tasks: &'a [Task],
    search: Option<&str>,
    date: Option<NaiveDate>,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| search.is_none_or(|s| t.raw_content().contains(s)))
        .filter(|t| date.is_none_or(|d| t.date.is_some_and(|td| td.date() == d)))
        .collect()
}
