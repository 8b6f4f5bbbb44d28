//! Persisted user document: preferences plus search history.

use std::{collections::HashSet, fmt, str::FromStr};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Summary verbosity requested by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    /// One or two sentences built from headlines.
    #[default]
    Brief,
    /// A paragraph built from headlines and descriptions.
    Detailed,
}

impl SummaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for SummaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(Self::Brief),
            "detailed" => Ok(Self::Detailed),
            other => Err(Error::InvalidArgument(format!(
                "summary type must be 'brief' or 'detailed', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Saved topics in insertion order. Older files call this `interests`.
    #[serde(default, alias = "interests")]
    pub topics: Vec<String>,
    #[serde(default)]
    pub summary_type: SummaryType,
}

impl Preferences {
    /// Position of `topic` under case-insensitive comparison.
    pub fn topic_position(&self, topic: &str) -> Option<usize> {
        let needle = normalize_topic(topic);
        self.topics
            .iter()
            .position(|t| normalize_topic(t) == needle)
    }

    /// Drop topics equal (ignoring case) to an earlier one, keeping the first
    /// spelling. Returns how many were dropped.
    pub fn dedupe_topics(&mut self) -> usize {
        let before = self.topics.len();
        let mut seen = HashSet::new();
        self.topics.retain(|t| seen.insert(normalize_topic(t)));
        before - self.topics.len()
    }
}

/// One past search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Topic exactly as entered.
    pub topic: String,
    pub summary_type: SummaryType,
    /// Local wall-clock time of the search.
    pub timestamp: NaiveDateTime,
}

impl HistoryEntry {
    pub fn now(topic: impl Into<String>, summary_type: SummaryType) -> Self {
        Self {
            topic: topic.into(),
            summary_type,
            timestamp: Local::now().naive_local(),
        }
    }
}

/// Complete persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub preferences: Preferences,
    /// Oldest first; only appended to or cleared.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Comparison key for topics: trimmed, whitespace-collapsed, lowercase.
pub fn normalize_topic(topic: &str) -> String {
    topic
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
