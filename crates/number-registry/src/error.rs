//! Registry errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to access registry file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Registry file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No number at position {position} (registry holds {len})")]
    OutOfRange { position: usize, len: usize },

    #[error("Cannot locate the home directory; set FAKE_SMS_DB_DIR")]
    NoHomeDir,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
