use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::cache::{CacheStore, ProjectCache};
use crate::metadata::gather_metadata;
use crate::session::SessionEntry;

pub fn handle_record(
    task: &str,
    summary: &str,
    allow_empty_summary: bool,
    project: &Path,
    cache_root: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if task.trim().is_empty() {
        return Err(Box::from("Task must not be empty."));
    }
    if summary.trim().is_empty() && !allow_empty_summary {
        return Err(Box::from(
            "Summary is empty. Pass --allow-empty-summary to record it anyway.",
        ));
    }

    let cache_root = super::resolve_cache_root(cache_root)?;
    let store = CacheStore::new(&cache_root, project);

    let mut cache = match store.load()? {
        Some(loaded) => {
            if loaded.recovered {
                println!("Primary cache was unusable; continuing from a recovered copy.");
            }
            loaded.cache
        }
        None => {
            println!("No cache for this project yet. Starting fresh.");
            ProjectCache::new()
        }
    };

    cache.apply_metadata(&gather_metadata(project));
    cache.append_session(SessionEntry::new(Utc::now(), task, summary));
    store.save(&cache)?;

    println!(
        "Recorded session #{} ('{}'). History now holds {} of the most recent sessions.",
        cache.session_count(),
        task,
        cache.session_history().len(),
    );

    Ok(())
}
