// File: src/model/parser.rs
//! Inline annotation syntax found in task titles.
//!
//! A title such as `(15) Write report 09:00-10:00 see [spec](https://example.com/s)`
//! carries three kinds of markup, extracted in this order:
//!
//! 1. a leading short-duration token, `(15)` or `(30+)`;
//! 2. the first `HH:MM-HH:MM` time period anywhere in the remaining text;
//! 3. every Markdown link whose target starts with `http://` or `https://`.
//!
//! Later steps operate on the output of earlier ones, so the order is fixed.
use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

/// Length of the short display form of a title, in characters.
pub const SUMMARY_LEN: usize = 50;

static SHORT_DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([0-9]+\+?)\)").unwrap());

static TIME_PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,2}:[0-9]{2}-[0-9]{1,2}:[0-9]{2}").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((https?://[^)]+)\)").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed time period '{period}': '{half}' is not a valid HH:MM time")]
    MalformedTimePeriod { period: String, half: String },
}

/// A Markdown link found in a title, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPair {
    pub anchor: String,
    pub url: String,
}

impl LinkPair {
    pub fn new(anchor: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            url: url.into(),
        }
    }

    pub fn to_markdown(&self) -> String {
        markdown_link(&self.anchor, &self.url)
    }
}

/// Structured decomposition of a raw title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedContent {
    pub clean_content: String,
    pub short_duration: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub links: Vec<LinkPair>,
}

impl ParsedContent {
    pub fn summary(&self) -> String {
        summary(&self.clean_content)
    }

    /// Clean content with the extracted links written back as Markdown.
    pub fn rendered(&self) -> String {
        render(&self.clean_content, &self.links)
    }

    pub fn has_time_period(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }
}

pub fn markdown_link(text: &str, url: &str) -> String {
    format!("[{}]({})", text, url)
}

/// Runs the full extraction pipeline over a raw title.
pub fn parse(raw: &str) -> Result<ParsedContent, ParseError> {
    let (content, short_duration) = extract_short_duration(raw);
    let (content, period) = extract_time_period(&content)?;
    let (clean_content, links) = extract_links(&content);

    let (start_time, end_time) = match period {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    Ok(ParsedContent {
        clean_content,
        short_duration,
        start_time,
        end_time,
        links,
    })
}

fn extract_short_duration(content: &str) -> (String, Option<String>) {
    match SHORT_DURATION_RE.captures(content) {
        Some(caps) => {
            // Group 0 always exists on a successful match.
            let whole = caps.get(0).map_or(0, |m| m.end());
            let token = caps[1].to_string();
            (content[whole..].trim().to_string(), Some(token))
        }
        None => (content.trim().to_string(), None),
    }
}

fn parse_clock(half: &str) -> Option<NaiveTime> {
    let (h_str, m_str) = half.split_once(':')?;
    let h = h_str.parse::<u32>().ok()?;
    let m = m_str.parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(h, m, 0)
}

type TimePeriod = (NaiveTime, NaiveTime);

fn extract_time_period(content: &str) -> Result<(String, Option<TimePeriod>), ParseError> {
    let Some(m) = TIME_PERIOD_RE.find(content) else {
        return Ok((content.trim().to_string(), None));
    };

    let period = m.as_str();
    let (first, second) = period.split_once('-').unwrap_or((period, ""));
    let malformed = |half: &str| ParseError::MalformedTimePeriod {
        period: period.to_string(),
        half: half.to_string(),
    };
    let start = parse_clock(first).ok_or_else(|| malformed(first))?;
    let end = parse_clock(second).ok_or_else(|| malformed(second))?;

    let mut rest = String::with_capacity(content.len() - period.len());
    rest.push_str(&content[..m.start()]);
    rest.push_str(&content[m.end()..]);
    Ok((rest.trim().to_string(), Some((start, end))))
}

fn extract_links(content: &str) -> (String, Vec<LinkPair>) {
    let links: Vec<LinkPair> = LINK_RE
        .captures_iter(content)
        .map(|caps| LinkPair::new(&caps[1], &caps[2]))
        .collect();
    let bare = LINK_RE.replace_all(content, "$1");
    (bare.trim().to_string(), links)
}

/// First [`SUMMARY_LEN`] characters of the clean content.
pub fn summary(clean_content: &str) -> String {
    clean_content.chars().take(SUMMARY_LEN).collect()
}

/// Writes links back into clean content.
///
/// Each anchor replaces its first occurrence in `clean_content` that is not
/// already taken by an earlier link, so repeated anchors map to successive
/// occurrences. Anchors that cannot be found are left as they are.
pub fn render(clean_content: &str, links: &[LinkPair]) -> String {
    let mut taken: Vec<(usize, usize, &LinkPair)> = Vec::new();

    for link in links {
        if link.anchor.is_empty() {
            continue;
        }
        let span = clean_content
            .char_indices()
            .map(|(at, _)| at)
            .filter(|&at| clean_content[at..].starts_with(link.anchor.as_str()))
            .map(|at| (at, at + link.anchor.len()))
            .find(|&(start, end)| {
                taken
                    .iter()
                    .all(|&(s, e, _)| end <= s || start >= e)
            });
        if let Some((start, end)) = span {
            taken.push((start, end, link));
        }
    }
    taken.sort_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(clean_content.len());
    let mut cursor = 0;
    for (start, end, link) in taken {
        out.push_str(&clean_content[cursor..start]);
        out.push_str(&link.to_markdown());
        cursor = end;
    }
    out.push_str(&clean_content[cursor..]);
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A key must not continue a longer word on either side.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let key = &text[start..end];
    let starts_word = key.chars().next().is_some_and(is_word_char);
    let ends_word = key.chars().next_back().is_some_and(is_word_char);
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !(starts_word && before.is_some_and(is_word_char))
        && !(ends_word && after.is_some_and(is_word_char))
}

/// Byte ranges of existing Markdown links and bare URLs.
fn protected_spans(text: &str) -> Vec<(usize, usize)> {
    LINK_RE
        .find_iter(text)
        .chain(URL_RE.find_iter(text))
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Wraps occurrences of each dictionary key in link syntax.
///
/// Keys are literal text. Longer keys win over their prefixes, a match has to
/// stand on word boundaries, and text that already is a link or a URL is left
/// alone. Returns raw text; callers parse it again to get the derived fields.
pub fn process_links<'a, I>(raw: &str, links: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut keys: Vec<(&String, &String)> =
        links.into_iter().filter(|(key, _)| !key.is_empty()).collect();
    if keys.is_empty() {
        return raw.to_string();
    }
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let alternation: Vec<String> = keys.iter().map(|(key, _)| regex::escape(key)).collect();
    let re = match Regex::new(&alternation.join("|")) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("Cannot build link pattern for {} keys: {}", keys.len(), e);
            return raw.to_string();
        }
    };

    let protected = protected_spans(raw);
    let mut out = String::with_capacity(raw.len());
    let mut cursor = 0;
    for m in re.find_iter(raw) {
        let (start, end) = (m.start(), m.end());
        if protected.iter().any(|&(s, e)| start < e && end > s)
            || !on_word_boundary(raw, start, end)
        {
            continue;
        }
        let Some((key, url)) = keys.iter().find(|(key, _)| key.as_str() == m.as_str()) else {
            continue;
        };
        out.push_str(&raw[cursor..start]);
        out.push_str(&markdown_link(key, url));
        cursor = end;
    }
    out.push_str(&raw[cursor..]);
    out
}
