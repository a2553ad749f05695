use std::path::{Path, PathBuf};

use crate::cache::CacheStore;
use crate::metadata::gather_doc_index;

pub fn handle_show(
    project: &Path,
    cache_root: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let cache_root = super::resolve_cache_root(cache_root)?;
    let store = CacheStore::new(&cache_root, project);

    let loaded = match store.load()? {
        Some(loaded) => loaded,
        None => {
            println!("No cached sessions for this project yet. Run 'recap record' after a work session.");
            return Ok(());
        }
    };
    if loaded.recovered {
        println!("(primary cache was unusable; showing a recovered copy)");
    }

    let cache = &loaded.cache;
    println!(
        "Project:    {}",
        cache.project_name.as_deref().unwrap_or("<unknown>")
    );
    if let Some(version) = &cache.version {
        println!("Version:    {}", version);
    }
    if let Some(repository) = &cache.repository {
        println!("Repository: {}", repository);
    }
    if let Some(license) = &cache.license {
        println!("License:    {}", license);
    }
    println!("Build:      {}", cache.build_status);

    println!();
    println!("Sessions recorded in total: {}", cache.session_count());
    for entry in cache.session_history() {
        println!("  {}  {}", entry.datetime.format("%Y-%m-%d %H:%M"), entry.task);
        if !entry.summary.is_empty() {
            println!("      {}", entry.summary);
        }
    }

    let docs = gather_doc_index(project);
    if !docs.is_empty() {
        let mut docs: Vec<String> = docs.into_iter().collect();
        docs.sort();
        println!();
        println!("Documentation present:");
        for doc in docs {
            println!("  {}", doc);
        }
    }

    Ok(())
}
