//! Provider and filter errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error during {operation}: {source}")]
    Http {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} failed with status {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upstream rejected {operation} (response={response})")]
    Rejected {
        operation: &'static str,
        response: String,
    },

    #[error("Unexpected page structure for {operation}: {detail}")]
    Structure {
        operation: &'static str,
        detail: String,
    },

    #[error("{operation} needs a country")]
    CountryRequired { operation: &'static str },

    #[error("{operation} is not supported by the {provider} provider")]
    Unsupported {
        operation: &'static str,
        provider: &'static str,
    },

    #[error("Invalid base URL '{url}': {detail}")]
    BaseUrl { url: String, detail: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProviderError {
    pub(crate) fn http(operation: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ProviderError::Http { operation, source }
    }

    pub(crate) fn decode(operation: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| ProviderError::Decode { operation, source }
    }
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
