pub mod codec;
mod store;

pub use store::{CacheStore, LoadedCache};

use serde::{Deserialize, Serialize};

use crate::metadata::ProjectMetadata;
use crate::session::{BuildStatus, SessionEntry};

/// Maximum number of sessions retained in a cache's history.
pub const SESSION_HISTORY_CAP: usize = 10;

/// The persisted per-project document: externally sourced metadata plus a
/// bounded, chronologically ordered history of past work sessions.
///
/// A `ProjectCache` is created fresh when no valid cache exists on disk and
/// loaded through `CacheStore` otherwise. It is mutated only through
/// `append_session` and `apply_metadata`; persisting it back is a separate
/// explicit step via `CacheStore::save`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ProjectCache {
    pub project_name: Option<String>,
    pub version: Option<String>,
    pub repository: Option<String>,
    pub license: Option<String>,
    pub build_status: BuildStatus,

    /// Insertion order is chronological order. Never longer than
    /// `SESSION_HISTORY_CAP`.
    session_history: Vec<SessionEntry>,

    /// Total sessions ever appended. Never decremented by rotation.
    session_count: u64,
}

impl ProjectCache {
    pub fn new() -> Self {
        ProjectCache::default()
    }

    pub fn session_history(&self) -> &[SessionEntry] {
        &self.session_history
    }

    pub fn session_count(&self) -> u64 {
        self.session_count
    }

    /// Appends one session to the history, evicting the oldest entries once
    /// the history exceeds `SESSION_HISTORY_CAP`.
    ///
    /// A timestamp older than the current tail's is clamped up to it, keeping
    /// the stored sequence non-decreasing. Pure in-memory operation; no I/O.
    pub fn append_session(&mut self, entry: SessionEntry) {
        let mut entry = entry;
        if let Some(last) = self.session_history.last() {
            if entry.datetime < last.datetime {
                entry.datetime = last.datetime;
            }
        }

        self.session_history.push(entry);
        self.session_count += 1;

        if self.session_history.len() > SESSION_HISTORY_CAP {
            let excess = self.session_history.len() - SESSION_HISTORY_CAP;
            self.session_history.drain(..excess);
        }
    }

    /// Overwrites the externally sourced metadata fields from a freshly
    /// gathered record. Session history and counter are untouched.
    pub fn apply_metadata(&mut self, meta: &ProjectMetadata) {
        self.project_name = meta.name.clone();
        self.version = meta.version.clone();
        self.repository = meta.repository.clone();
        self.license = meta.license.clone();
        self.build_status = meta.build_status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(offset_minutes: i64, task: &str) -> SessionEntry {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        SessionEntry::new(
            base + Duration::minutes(offset_minutes),
            task,
            format!("worked on {}", task),
        )
    }

    #[test]
    fn history_never_exceeds_the_cap() {
        let mut cache = ProjectCache::new();
        for i in 0..25 {
            cache.append_session(entry(i, &format!("task-{}", i)));
            assert!(cache.session_history().len() <= SESSION_HISTORY_CAP);
        }
    }

    #[test]
    fn rotation_keeps_the_most_recent_entries_in_order() {
        let mut cache = ProjectCache::new();
        for i in 1..=11 {
            cache.append_session(entry(i, &format!("task-{}", i)));
        }

        let tasks: Vec<&str> = cache
            .session_history()
            .iter()
            .map(|e| e.task.as_str())
            .collect();
        let expected: Vec<String> = (2..=11).map(|i| format!("task-{}", i)).collect();
        assert_eq!(tasks, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn session_count_is_not_decremented_by_eviction() {
        let mut cache = ProjectCache::new();
        for i in 0..25 {
            cache.append_session(entry(i, "task"));
        }
        assert_eq!(cache.session_count(), 25);
        assert_eq!(cache.session_history().len(), SESSION_HISTORY_CAP);
    }

    #[test]
    fn regressing_timestamp_is_clamped_to_the_tail() {
        let mut cache = ProjectCache::new();
        cache.append_session(entry(10, "first"));
        cache.append_session(entry(5, "second"));

        let history = cache.session_history();
        assert_eq!(history[0].datetime, history[1].datetime);
    }

    #[test]
    fn apply_metadata_overwrites_only_the_metadata_fields() {
        let mut cache = ProjectCache::new();
        cache.append_session(entry(0, "task"));

        let meta = ProjectMetadata {
            name: Some("demo".to_string()),
            version: Some("1.2.3".to_string()),
            repository: None,
            license: Some("MIT".to_string()),
            build_status: BuildStatus::Passing,
        };
        cache.apply_metadata(&meta);

        assert_eq!(cache.project_name.as_deref(), Some("demo"));
        assert_eq!(cache.build_status, BuildStatus::Passing);
        assert_eq!(cache.session_history().len(), 1);
        assert_eq!(cache.session_count(), 1);
    }
}
