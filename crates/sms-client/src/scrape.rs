//! HTML scraping provider.
//!
//! Numbers are read from the landing page and messages from a per-number
//! table page. The message page is only served to clients presenting the
//! session cookies handed out by the landing page, so every message fetch
//! starts with a cookie round-trip.
//!
//! Parsing is best effort: blocks or rows that do not have the expected
//! shape are skipped and counted instead of failing the whole call.

use crate::error::ProviderError;
use crate::provider::{http_client, normalize_base, send_checked, Provider};
use crate::types::{CountryRef, Message, Number};
use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const NUMBER_CONTAINER: &str = "div.number-boxes";
const NUMBER_ITEM: &str = "div.number-boxes-item";
const NUMBER_TEXT: &str = "h1";
const COUNTRY_TEXT: &str = "h2";

const MESSAGE_TABLE: &str = "table";
const MESSAGE_ROW: &str = "table tbody tr";
const MESSAGE_CELL: &str = "td";

/// Rows need at least this many cells to be read.
pub const MIN_MESSAGE_COLUMNS: usize = 6;
pub const ORIGINATOR_COLUMN: usize = 1;
pub const BODY_COLUMN: usize = 3;
pub const TIMESTAMP_COLUMN: usize = 5;

/// Items extracted from a page along with the number of blocks skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

fn selector(css: &'static str, operation: &'static str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::Structure {
        operation,
        detail: format!("invalid selector '{}': {}", css, e),
    })
}

/// Collapse the text content of an element into single-spaced text.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Extract numbers from the listing page.
///
/// `fetched_at` becomes the creation timestamp since the page carries none.
pub fn parse_numbers(html: &str, fetched_at: &str) -> Result<Parsed<Number>, ProviderError> {
    const OP: &str = "list_numbers";
    let container_sel = selector(NUMBER_CONTAINER, OP)?;
    let item_sel = selector(NUMBER_ITEM, OP)?;
    let number_sel = selector(NUMBER_TEXT, OP)?;
    let country_sel = selector(COUNTRY_TEXT, OP)?;

    let document = Html::parse_document(html);
    let container = document
        .select(&container_sel)
        .next()
        .ok_or_else(|| ProviderError::Structure {
            operation: OP,
            detail: format!("no '{}' container", NUMBER_CONTAINER),
        })?;

    let mut items = Vec::new();
    let mut skipped = 0;
    for item in container.select(&item_sel) {
        match (first_text(item, &number_sel), first_text(item, &country_sel)) {
            (Some(number), Some(country)) => {
                items.push(Number::new(number, CountryRef::Label(country), fetched_at));
            }
            _ => skipped += 1,
        }
    }

    Ok(Parsed { items, skipped })
}

/// Extract messages from a number's message table.
pub fn parse_messages(html: &str) -> Result<Parsed<Message>, ProviderError> {
    const OP: &str = "list_messages";
    let table_sel = selector(MESSAGE_TABLE, OP)?;
    let row_sel = selector(MESSAGE_ROW, OP)?;
    let cell_sel = selector(MESSAGE_CELL, OP)?;

    let document = Html::parse_document(html);
    if document.select(&table_sel).next().is_none() {
        return Err(ProviderError::Structure {
            operation: OP,
            detail: "no message table".into(),
        });
    }

    let mut items = Vec::new();
    let mut skipped = 0;
    for row in document.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
        if cells.len() < MIN_MESSAGE_COLUMNS {
            skipped += 1;
            continue;
        }
        items.push(Message::new(
            cells[ORIGINATOR_COLUMN].clone(),
            cells[BODY_COLUMN].clone(),
            cells[TIMESTAMP_COLUMN].clone(),
        ));
    }

    Ok(Parsed { items, skipped })
}

/// Join the `name=value` part of every `Set-Cookie` header into a `Cookie` value.
fn collect_cookies(headers: &reqwest::header::HeaderMap) -> String {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Digits of a phone number, as used in message page paths.
fn number_slug(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// Provider that scrapes a public receive-SMS website.
#[derive(Clone)]
pub struct ScrapeProvider {
    client: Client,
    base_url: String,
}

impl ScrapeProvider {
    /// Create a new scrape provider rooted at `base_url`.
    pub fn new(base_url: impl AsRef<str>, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: normalize_base(base_url.as_ref()),
        })
    }

    /// Load the landing page and return the session cookies it sets.
    async fn session_cookies(&self) -> Result<String, ProviderError> {
        let response = send_checked(self.client.get(&self.base_url), "session_cookies").await?;
        let cookies = collect_cookies(response.headers());
        debug!("Session established with {} cookie bytes", cookies.len());
        Ok(cookies)
    }
}

#[async_trait]
impl Provider for ScrapeProvider {
    fn name(&self) -> &'static str {
        "scrape"
    }

    #[instrument(skip(self))]
    async fn list_numbers(
        &self,
        country: Option<&CountryRef>,
    ) -> Result<Vec<Number>, ProviderError> {
        const OP: &str = "list_numbers";
        let label = match country {
            None => None,
            Some(CountryRef::Label(label)) => Some(label.to_lowercase()),
            Some(CountryRef::Code(_)) => {
                return Err(ProviderError::Unsupported {
                    operation: "list_numbers by country code",
                    provider: self.name(),
                })
            }
        };

        let response = send_checked(self.client.get(&self.base_url), OP).await?;
        let html = response.text().await.map_err(ProviderError::http(OP))?;
        let fetched_at = chrono::Utc::now().to_rfc3339();

        let Parsed { mut items, skipped } = parse_numbers(&html, &fetched_at)?;
        if skipped > 0 {
            warn!("Skipped {} malformed number blocks", skipped);
        }

        if let Some(label) = label {
            items.retain(|n| n.country.to_string().to_lowercase() == label);
        }

        debug!("Scraped {} numbers", items.len());
        Ok(items)
    }

    #[instrument(skip(self, number), fields(number = %number.number))]
    async fn list_messages(&self, number: &Number) -> Result<Vec<Message>, ProviderError> {
        const OP: &str = "list_messages";
        let cookies = self.session_cookies().await?;

        let url = format!("{}sms/{}/", self.base_url, number_slug(&number.number));
        let mut request = self.client.get(&url);
        if !cookies.is_empty() {
            request = request.header(COOKIE, cookies);
        }

        let response = send_checked(request, OP).await?;
        let html = response.text().await.map_err(ProviderError::http(OP))?;

        let Parsed { items, skipped } = parse_messages(&html)?;
        if skipped > 0 {
            warn!("Skipped {} message rows with fewer than {} columns", skipped, MIN_MESSAGE_COLUMNS);
        }

        debug!("Scraped {} messages", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERS_PAGE: &str = r#"
        <html><body>
          <div class="number-boxes">
            <div class="number-boxes-item">
              <h1>+44 7700 900123</h1>
              <h2>United Kingdom</h2>
            </div>
            <div class="number-boxes-item">
              <h1>+1 555 0100</h1>
            </div>
            <div class="number-boxes-item">
              <h1>+33 6 12 34 56 78</h1>
              <h2> France </h2>
            </div>
          </div>
        </body></html>
    "#;

    const MESSAGES_PAGE: &str = r#"
        <html><body>
          <table>
            <thead><tr><th>#</th><th>From</th><th></th><th>Message</th><th></th><th>Time</th></tr></thead>
            <tbody>
              <tr><td>1</td><td>Google</td><td></td><td>G-123456 is your code</td><td>copy</td><td>2 min ago</td></tr>
              <tr><td>2</td><td>Ad</td><td>banner</td></tr>
              <tr><td>3</td><td>Telegram</td><td></td><td>Login code: 55555</td><td>copy</td><td>5 min ago</td><td>extra</td></tr>
            </tbody>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_numbers_skips_incomplete_items() {
        let parsed = parse_numbers(NUMBERS_PAGE, "t0").unwrap();

        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].number, "+44 7700 900123");
        assert_eq!(parsed.items[0].country, CountryRef::Label("United Kingdom".into()));
        assert_eq!(parsed.items[0].created_at, "t0");
        assert_eq!(parsed.items[1].country, CountryRef::Label("France".into()));
    }

    #[test]
    fn test_parse_numbers_missing_container() {
        let result = parse_numbers("<html><body><p>maintenance</p></body></html>", "t0");
        assert!(matches!(result, Err(ProviderError::Structure { operation: "list_numbers", .. })));
    }

    #[test]
    fn test_parse_messages_fixed_columns() {
        let parsed = parse_messages(MESSAGES_PAGE).unwrap();

        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0], Message::new("Google", "G-123456 is your code", "2 min ago"));
        assert_eq!(parsed.items[1].originator, "Telegram");
        assert_eq!(parsed.items[1].body, "Login code: 55555");
        assert_eq!(parsed.items[1].created_at, "5 min ago");
    }

    #[test]
    fn test_parse_messages_missing_table() {
        let result = parse_messages("<html><body>blocked</body></html>");
        assert!(matches!(result, Err(ProviderError::Structure { operation: "list_messages", .. })));
    }

    #[test]
    fn test_parse_messages_empty_table() {
        let parsed = parse_messages("<table><tbody></tbody></table>").unwrap();
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_number_slug() {
        assert_eq!(number_slug("+44 7700-900123"), "447700900123");
    }

    #[test]
    fn test_collect_cookies() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.append(SET_COOKIE, "session=abc; Path=/; HttpOnly".parse().unwrap());
        headers.append(SET_COOKIE, "cf_clearance=xyz; Secure".parse().unwrap());

        assert_eq!(collect_cookies(&headers), "session=abc; cf_clearance=xyz");
        assert_eq!(collect_cookies(&reqwest::header::HeaderMap::new()), "");
    }
}
