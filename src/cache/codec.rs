use std::fmt;

use crate::errors::RecapError;

use super::{ProjectCache, SESSION_HISTORY_CAP};

/// Version tag written ahead of every encoded cache document.
pub const SCHEMA_VERSION: u32 = 1;

/// Why a byte buffer failed to decode into a `ProjectCache`.
#[derive(Debug)]
pub enum DecodeError {
    /// Structurally invalid input: truncated, wrong shape, or a document
    /// violating the session-history capacity.
    Malformed(String),
    /// A version tag exists but is not one this build understands.
    UnsupportedVersion(u32),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(e) => write!(f, "malformed cache document: {}", e),
            DecodeError::UnsupportedVersion(v) => {
                write!(f, "unsupported cache schema version {}", v)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Encodes a cache document as a schema-version tag followed by its bincode
/// serialization. Deterministic for any well-formed `ProjectCache`.
pub fn encode(cache: &ProjectCache) -> Result<Vec<u8>, RecapError> {
    let payload = bincode::serialize(cache).map_err(|e| RecapError::Encode(e.to_string()))?;

    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decodes a cache document, validating the version tag and the
/// session-history capacity. Over-capacity documents are rejected rather
/// than truncated.
pub fn decode(data: &[u8]) -> Result<ProjectCache, DecodeError> {
    if data.len() < 4 {
        return Err(DecodeError::Malformed(
            "shorter than the schema-version tag".to_string(),
        ));
    }

    let version = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    if version != SCHEMA_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let cache: ProjectCache =
        bincode::deserialize(&data[4..]).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if cache.session_history.len() > SESSION_HISTORY_CAP {
        return Err(DecodeError::Malformed(format!(
            "session history holds {} entries, cap is {}",
            cache.session_history.len(),
            SESSION_HISTORY_CAP
        )));
    }

    Ok(cache)
}
