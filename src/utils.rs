use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Hex digest identifying a project by its canonical filesystem location.
pub fn project_digest(project_root: &Path) -> String {
    let canonical = project_root
        .canonicalize()
        .unwrap_or_else(|_| project_root.to_path_buf());

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    hex::encode(hasher.finalize())
}

/// Directory name holding a project's cache files under the cache root.
///
/// Combines the project's directory name (sanitized) with a digest prefix so
/// two projects with the same name never collide.
pub fn project_key(project_root: &Path, digest: &str) -> String {
    let name = project_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());

    let name: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    format!("{}-{}", name, &digest[..12])
}

/// Per-user cache root, e.g. `~/.cache/recap` on Linux.
pub fn default_cache_root() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("recap"))
}
