// File: src/model/duration.rs
//! Estimated task duration derived from duration labels.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A label that stands for a fixed amount of time, e.g. `15min -> 15`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationLabel {
    pub label: String,
    pub minutes: u32,
}

impl DurationLabel {
    pub fn new(label: impl Into<String>, minutes: u32) -> Self {
        Self {
            label: label.into(),
            minutes,
        }
    }
}

impl fmt::Display for DurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}m)", self.label, self.minutes)
    }
}

/// Duration labels keyed by label identifier.
///
/// Iteration is in key order, which makes [`DurationTable::label_for_duration`]
/// deterministic when several entries share the same minutes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationTable(BTreeMap<String, DurationLabel>);

impl DurationTable {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: DurationLabel) {
        self.0.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&DurationLabel> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DurationLabel)> {
        self.0.iter()
    }

    pub fn resolve<I, S>(&self, task_labels: I) -> u32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        resolve(task_labels, self)
    }

    pub fn label_for_duration(&self, minutes: u32) -> Option<&str> {
        label_for_duration(minutes, self)
    }
}

impl FromIterator<(String, DurationLabel)> for DurationTable {
    fn from_iter<T: IntoIterator<Item = (String, DurationLabel)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Maximum minutes among the task labels present in the table, 0 when none match.
pub fn resolve<I, S>(task_labels: I, table: &DurationTable) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    task_labels
        .into_iter()
        .filter_map(|l| table.get(l.as_ref()))
        .map(|entry| entry.minutes)
        .max()
        .unwrap_or(0)
}

/// Name of the first entry whose minutes match exactly.
pub fn label_for_duration(minutes: u32, table: &DurationTable) -> Option<&str> {
    table
        .iter()
        .find(|(_, entry)| entry.minutes == minutes)
        .map(|(_, entry)| entry.label.as_str())
}
