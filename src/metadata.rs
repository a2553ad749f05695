use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::session::BuildStatus;

/// Structured record produced by the metadata gathering step.
///
/// Gathering is deliberately narrow: it yields this fixed shape and nothing
/// else, keeping text-parsing variability out of the cache core. Every field
/// is informational; absent data simply stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub repository: Option<String>,
    pub license: Option<String>,
    pub build_status: BuildStatus,
}

/// Reads project metadata from the manifest at `project_root`, if any.
///
/// Only the `[package]` table of a `Cargo.toml` is consulted. Build probing
/// is out of scope, so the status always starts `Unknown`.
pub fn gather_metadata(project_root: &Path) -> ProjectMetadata {
    let mut meta = ProjectMetadata::default();

    let manifest = project_root.join("Cargo.toml");
    let content = match fs::read_to_string(&manifest) {
        Ok(content) => content,
        Err(_) => {
            debug!("No readable manifest at '{}'.", manifest.display());
            return meta;
        }
    };

    let mut in_package = false;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_package = line == "[package]";
            continue;
        }
        if !in_package {
            continue;
        }

        if let Some((key, value)) = parse_assignment(line) {
            match key {
                "name" => meta.name = Some(value),
                "version" => meta.version = Some(value),
                "repository" => meta.repository = Some(value),
                "license" => meta.license = Some(value),
                _ => {}
            }
        }
    }

    meta
}

/// Splits a `key = "value"` manifest line, stripping quotes and any trailing
/// comment.
fn parse_assignment(line: &str) -> Option<(&str, String)> {
    let (key, value) = line.split_once('=')?;
    let value = value.split('#').next().unwrap_or("").trim().trim_matches('"');
    if value.is_empty() {
        return None;
    }
    Some((key.trim(), value.to_string()))
}

/// Enumerates the documentation files currently present under `project_root`.
///
/// Paths are returned relative to the project root. The walk skips hidden
/// directories, `target`, and `node_modules`.
pub fn gather_doc_index(project_root: &Path) -> HashSet<String> {
    let mut docs = HashSet::new();
    collect_docs(project_root, project_root, &mut docs);
    docs
}

fn collect_docs(root: &Path, directory: &Path, docs: &mut HashSet<String>) {
    if let Ok(entries) = fs::read_dir(directory) {
        for entry in entries.flatten() {
            let path = entry.path();
            let file_name = path.file_name().unwrap_or_default().to_string_lossy();

            // Skip hidden dirs, target, etc.
            if file_name.starts_with('.')
                || file_name == "target"
                || file_name == "node_modules"
            {
                continue;
            }
            if path.is_dir() {
                collect_docs(root, &path, docs);
            } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
                let rel = path.strip_prefix(root).unwrap_or(&path);
                docs.insert(rel.to_string_lossy().to_string());
            }
        }
    }
}
