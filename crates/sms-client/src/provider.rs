//! Provider abstraction over the supported number services.

use crate::api::ApiProvider;
use crate::error::ProviderError;
use crate::scrape::ScrapeProvider;
use crate::types::{Country, CountryRef, Message, Number};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://onlinesim.io/";
pub const DEFAULT_SCRAPE_URL: &str = "https://receive-smss.com/";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// A source of disposable numbers and their messages.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &'static str;

    /// List countries with free numbers.
    async fn list_countries(&self) -> Result<Vec<Country>, ProviderError> {
        Err(ProviderError::Unsupported {
            operation: "list_countries",
            provider: self.name(),
        })
    }

    /// List currently available numbers, optionally restricted to a country.
    async fn list_numbers(&self, country: Option<&CountryRef>)
        -> Result<Vec<Number>, ProviderError>;

    /// Fetch the messages received on `number`.
    async fn list_messages(&self, number: &Number) -> Result<Vec<Message>, ProviderError>;
}

/// Which backend to talk to.
///
/// Deserialization goes through [`FromStr`], so configuration values and
/// command-line flags accept the same spellings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum ProviderKind {
    #[default]
    Api,
    Scrape,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(ProviderKind::Api),
            "scrape" => Ok(ProviderKind::Scrape),
            other => Err(format!("unknown provider '{}' (expected api or scrape)", other)),
        }
    }
}

impl TryFrom<String> for ProviderKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Api => f.write_str("api"),
            ProviderKind::Scrape => f.write_str("scrape"),
        }
    }
}

/// Connection settings shared by both providers.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub api_url: String,
    pub scrape_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            scrape_url: DEFAULT_SCRAPE_URL.into(),
            timeout: None,
        }
    }
}

/// Build the provider selected for this run.
pub fn build_provider(
    kind: ProviderKind,
    options: &ProviderOptions,
) -> Result<Box<dyn Provider>, ProviderError> {
    Ok(match kind {
        ProviderKind::Api => Box::new(ApiProvider::new(&options.api_url, options.timeout)?),
        ProviderKind::Scrape => {
            Box::new(ScrapeProvider::new(&options.scrape_url, options.timeout)?)
        }
    })
}

pub(crate) fn http_client(timeout: Option<Duration>) -> Result<Client, ProviderError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ProviderError::Client)
}

/// Ensure `base` ends with a slash so relative paths can be appended.
pub(crate) fn normalize_base(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

/// Send a request and turn non-2xx statuses into errors.
pub(crate) async fn send_checked(
    request: RequestBuilder,
    operation: &'static str,
) -> Result<Response, ProviderError> {
    let response = request.send().await.map_err(ProviderError::http(operation))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            operation,
            status,
            body,
        });
    }

    Ok(response)
}
