//! Disposable number providers and message filtering.

mod api;
mod error;
mod filter;
mod provider;
pub mod scrape;
mod types;

pub use api::ApiProvider;
pub use error::{FilterError, ProviderError};
pub use filter::{filter, MessageFilter};
pub use provider::{
    build_provider, Provider, ProviderKind, ProviderOptions, DEFAULT_API_URL, DEFAULT_SCRAPE_URL,
};
pub use scrape::ScrapeProvider;
pub use types::*;
