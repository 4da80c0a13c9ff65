//! JSON API provider.

use crate::error::ProviderError;
use crate::provider::{http_client, send_checked, Provider};
use crate::types::{Country, CountryRef, Message, Number};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct CountriesEnvelope {
    response: serde_json::Value,
    #[serde(default)]
    countries: Vec<ApiCountry>,
}

#[derive(Debug, Deserialize)]
struct ApiCountry {
    country: u32,
    country_text: String,
    country_original: Option<String>,
    online: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct NumbersEnvelope {
    response: serde_json::Value,
    #[serde(default)]
    numbers: Vec<ApiNumber>,
}

#[derive(Debug, Deserialize)]
struct ApiNumber {
    number: String,
    country: u32,
    updated_at: Option<String>,
    data_humans: Option<String>,
    short_code: Option<String>,
    #[serde(default)]
    is_archive: bool,
}

#[derive(Debug, Deserialize)]
struct MessagesEnvelope {
    response: serde_json::Value,
    messages: Option<MessagesPage>,
}

/// One page of messages as returned by `getFreeMessageList`.
#[derive(Debug, Deserialize)]
struct MessagesPage {
    current_page: Option<u32>,
    last_page: Option<u32>,
    total: Option<u64>,
    #[serde(default)]
    data: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    text: String,
    in_number: Option<String>,
    created_at: Option<String>,
    data_humans: Option<String>,
}

impl From<ApiCountry> for Country {
    fn from(c: ApiCountry) -> Self {
        Self {
            code: c.country,
            name: c.country_text,
            original_name: c.country_original,
            online: c.online,
        }
    }
}

impl From<ApiNumber> for Number {
    fn from(n: ApiNumber) -> Self {
        Self {
            number: n.number,
            country: CountryRef::Code(n.country),
            created_at: n.updated_at.unwrap_or_else(now),
            age: n.data_humans,
            short_code: n.short_code,
            archived: n.is_archive,
        }
    }
}

impl From<ApiMessage> for Message {
    fn from(m: ApiMessage) -> Self {
        Self {
            originator: m.in_number.unwrap_or_default(),
            body: m.text,
            created_at: m.created_at.unwrap_or_default(),
            age: m.data_humans,
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// The upstream signals success with `"response": "1"` (or the number 1).
fn check_response(value: &serde_json::Value, operation: &'static str) -> Result<(), ProviderError> {
    let ok = match value {
        serde_json::Value::String(s) => s == "1",
        serde_json::Value::Number(n) => n.as_u64() == Some(1),
        _ => false,
    };

    if ok {
        Ok(())
    } else {
        Err(ProviderError::Rejected {
            operation,
            response: value.to_string(),
        })
    }
}

const COUNTRIES_PATH: &[&str] = &["api", "v1", "free_numbers_content", "countries"];

/// Provider backed by the free-numbers JSON API.
#[derive(Clone)]
pub struct ApiProvider {
    client: Client,
    base_url: Url,
}

impl ApiProvider {
    /// Create a new API provider rooted at `base_url`.
    pub fn new(base_url: impl AsRef<str>, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let raw = base_url.as_ref();
        let base_url = Url::parse(raw).map_err(|e| ProviderError::BaseUrl {
            url: raw.to_string(),
            detail: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::BaseUrl {
                url: raw.to_string(),
                detail: "not a hierarchical URL".into(),
            });
        }

        Ok(Self {
            client: http_client(timeout)?,
            base_url,
        })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        operation: &'static str,
    ) -> Result<T, ProviderError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = send_checked(request, operation).await?;
        let body = response.text().await.map_err(ProviderError::http(operation))?;
        serde_json::from_str(&body).map_err(ProviderError::decode(operation))
    }
}

#[async_trait]
impl Provider for ApiProvider {
    fn name(&self) -> &'static str {
        "api"
    }

    #[instrument(skip(self))]
    async fn list_countries(&self) -> Result<Vec<Country>, ProviderError> {
        const OP: &str = "list_countries";
        let envelope: CountriesEnvelope = self
            .get_json(self.endpoint(COUNTRIES_PATH), &[], OP)
            .await?;
        check_response(&envelope.response, OP)?;

        debug!("Received {} countries", envelope.countries.len());
        Ok(envelope.countries.into_iter().map(Country::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_numbers(
        &self,
        country: Option<&CountryRef>,
    ) -> Result<Vec<Number>, ProviderError> {
        const OP: &str = "list_numbers";
        let country = country.ok_or(ProviderError::CountryRequired { operation: OP })?;

        // Codes and names share the same path segment.
        let segment = country.to_string();
        let mut segments: Vec<&str> = COUNTRIES_PATH.to_vec();
        segments.push(&segment);

        let envelope: NumbersEnvelope = self.get_json(self.endpoint(&segments), &[], OP).await?;
        check_response(&envelope.response, OP)?;

        debug!("Received {} numbers for country {}", envelope.numbers.len(), country);
        Ok(envelope.numbers.into_iter().map(Number::from).collect())
    }

    #[instrument(skip(self, number), fields(number = %number.number))]
    async fn list_messages(&self, number: &Number) -> Result<Vec<Message>, ProviderError> {
        const OP: &str = "list_messages";
        let code = number
            .country
            .code()
            .ok_or(ProviderError::CountryRequired { operation: OP })?;

        let envelope: MessagesEnvelope = self
            .get_json(
                self.endpoint(&["api", "getFreeMessageList"]),
                &[("phone", number.number.clone()), ("country", code.to_string())],
                OP,
            )
            .await?;
        check_response(&envelope.response, OP)?;

        let Some(page) = envelope.messages else {
            return Ok(Vec::new());
        };

        debug!(
            "Received {} messages (page {:?} of {:?}, total {:?})",
            page.data.len(),
            page.current_page,
            page.last_page,
            page.total
        );
        Ok(page.data.into_iter().map(Message::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_response() {
        assert!(check_response(&serde_json::json!("1"), "op").is_ok());
        assert!(check_response(&serde_json::json!(1), "op").is_ok());
        assert!(matches!(
            check_response(&serde_json::json!("ERROR_NO_NUMBERS"), "op"),
            Err(ProviderError::Rejected { operation: "op", .. })
        ));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let provider = ApiProvider::new("http://host:8080", None).unwrap();
        let mut segments = COUNTRIES_PATH.to_vec();
        segments.push("United Kingdom");
        let url = provider.endpoint(&segments);
        assert_eq!(
            url.as_str(),
            "http://host:8080/api/v1/free_numbers_content/countries/United%20Kingdom"
        );

        let nested = ApiProvider::new("http://host/proxy/", None).unwrap();
        assert_eq!(
            nested.endpoint(&["api", "getFreeMessageList"]).as_str(),
            "http://host/proxy/api/getFreeMessageList"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiProvider::new("not a url", None),
            Err(ProviderError::BaseUrl { .. })
        ));
        assert!(matches!(
            ApiProvider::new("mailto:someone@example.com", None),
            Err(ProviderError::BaseUrl { .. })
        ));
    }

    #[test]
    fn test_api_number_normalization() {
        let wire: ApiNumber = serde_json::from_value(serde_json::json!({
            "number": "+79001234567",
            "country": 7,
            "updated_at": "2024-05-01 10:00:00",
            "data_humans": "3 hours ago",
            "is_archive": true
        }))
        .unwrap();

        let number = Number::from(wire);
        assert_eq!(number.number, "+79001234567");
        assert_eq!(number.country, CountryRef::Code(7));
        assert_eq!(number.created_at, "2024-05-01 10:00:00");
        assert_eq!(number.age.as_deref(), Some("3 hours ago"));
        assert!(number.archived);
    }

    #[test]
    fn test_api_message_normalization() {
        let wire: ApiMessage = serde_json::from_value(serde_json::json!({
            "text": "Your code is 1234",
            "in_number": "Telegram",
            "created_at": "2024-05-01 10:05:00"
        }))
        .unwrap();

        let message = Message::from(wire);
        assert_eq!(message.originator, "Telegram");
        assert_eq!(message.body, "Your code is 1234");
        assert_eq!(message.created_at, "2024-05-01 10:05:00");
        assert!(message.age.is_none());
    }
}
