use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Build health of the project, as last reported by the metadata gatherer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStatus {
    #[default]
    Unknown,
    Building,
    Passing,
    Failing,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStatus::Unknown => "unknown",
            BuildStatus::Building => "building",
            BuildStatus::Passing => "passing",
            BuildStatus::Failing => "failing",
        };
        f.write_str(name)
    }
}

/// Represents one finished work session on a project.
///
/// A `SessionEntry` captures when the session happened, what it set out to
/// do, and a summary of what was done. Entries are immutable once created and
/// are owned exclusively by the `ProjectCache` that holds them.
///
/// The `SessionEntry` struct is serializable and deserializable, allowing it
/// to be easily stored and retrieved from persistent storage formats.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    /// When the session took place. Non-decreasing across a cache's history.
    pub datetime: DateTime<Utc>,

    /// Short description of the task the session worked on. Callers must
    /// supply a non-empty task.
    pub task: String,

    /// Summary of the session, supplied by the caller as a ready string.
    /// May be empty only when the caller explicitly allows it.
    pub summary: String,
}

impl SessionEntry {
    pub fn new(
        datetime: DateTime<Utc>,
        task: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        SessionEntry {
            datetime,
            task: task.into(),
            summary: summary.into(),
        }
    }
}
