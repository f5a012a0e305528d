// File: src/model/issue.rs
//! Issue-tracker keys embedded in task titles.
use regex::Regex;
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

pub const CLOSURE_STATUSES: [&str; 6] = [
    "Closed",
    "Fixed",
    "Resolved",
    "Canceled",
    "Rejected",
    "Declassified",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    InProgress,
    Accepted,
    Uat,
    OnHold,
    Planned,
    Pending,
    WaitingSupport,
    Todo,
}

pub fn is_closed_status(status: &str) -> bool {
    CLOSURE_STATUSES.contains(&status)
}

pub fn issue_link(server: &str, key: &str) -> String {
    format!("{}/browse/{}", server.trim_end_matches('/'), key)
}

fn key_pattern(prefixes: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = prefixes
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| regex::escape(p))
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    // Groups 1 and 3 capture link context; a key is bare only when both are empty.
    let pattern = format!(
        r"(\[|browse/)?\b((?:{})-[0-9]+)\b(\])?",
        alternatives.join("|")
    );
    Regex::new(&pattern).ok()
}

/// Issue keys that are not already part of a link, in order of appearance.
pub fn find_issue_keys(text: &str, prefixes: &[String]) -> Vec<String> {
    let Some(re) = key_pattern(prefixes) else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter(|caps| caps.get(1).is_none() && caps.get(3).is_none())
        .map(|caps| caps[2].to_string())
        .collect()
}

/// Link dictionary for every bare issue key in `text`.
pub fn issue_links(text: &str, server: &str, prefixes: &[String]) -> BTreeMap<String, String> {
    find_issue_keys(text, prefixes)
        .into_iter()
        .map(|key| {
            let url = issue_link(server, &key);
            (key, url)
        })
        .collect()
}
