use std::fs;
use std::path::Path;

use thiserror::Error;

use super::model::ProfileData;

/// Failures while fetching one of the two data documents (profile document
/// or playlist document). Never fatal: the UI renders the message with a
/// retry affordance.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("playlist is empty")]
    EmptyPlaylist,
}

/// Load and parse the profile document.
pub fn load_profile(path: &Path) -> Result<ProfileData, DataError> {
    let raw = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}
