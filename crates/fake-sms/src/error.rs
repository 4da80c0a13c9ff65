//! Application error types.

use number_registry::RegistryError;
use sms_client::{FilterError, ProviderError};
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Failed to fetch messages for {number}: {source}")]
    FetchMessages {
        number: String,
        #[source]
        source: ProviderError,
    },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Number {0} is not currently offered by the provider")]
    NumberUnavailable(String),

    #[error("Failed to export messages to {path:?}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
