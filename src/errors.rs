use std::fmt;
use std::io;
use std::path::Path;

/// Represents all possible errors in the recap application.
#[derive(Debug)]
pub enum RecapError {
    Io { path: String, source: io::Error },
    Encode(String),
    CacheDirUnavailable,
}

impl RecapError {
    /// Wraps a filesystem error together with the path it failed on.
    pub fn io(path: &Path, source: io::Error) -> Self {
        RecapError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl fmt::Display for RecapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecapError::Io { path, source } => write!(f, "IO Error at '{}': {}", path, source),
            RecapError::Encode(e) => write!(f, "Serialization Error: {}", e),
            RecapError::CacheDirUnavailable => {
                write!(f, "Could not resolve the per-user cache directory")
            }
        }
    }
}

impl std::error::Error for RecapError {}
