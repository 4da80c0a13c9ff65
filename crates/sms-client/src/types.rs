//! Domain types shared by every provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A country offering free numbers. Only the API provider lists these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// How a number is tied to its country.
///
/// The API provider uses numeric country codes while scraped pages only carry
/// a free-text label. The two are never converted into each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountryRef {
    Code(u32),
    Label(String),
}

impl CountryRef {
    /// Parse user input: all digits is a code, anything else a label.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<u32>() {
            Ok(code) => CountryRef::Code(code),
            Err(_) => CountryRef::Label(input.to_string()),
        }
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            CountryRef::Code(code) => Some(*code),
            CountryRef::Label(_) => None,
        }
    }
}

impl fmt::Display for CountryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountryRef::Code(code) => write!(f, "{}", code),
            CountryRef::Label(label) => f.write_str(label),
        }
    }
}

/// A disposable phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Number {
    /// Raw number string as the provider returned it.
    pub number: String,
    pub country: CountryRef,
    pub created_at: String,
    /// Human readable age ("2 hours ago").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archived: bool,
}

impl Number {
    pub fn new(
        number: impl Into<String>,
        country: CountryRef,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            country,
            created_at: created_at.into(),
            age: None,
            short_code: None,
            archived: false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number, self.country)
    }
}

/// An SMS received on a disposable number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub originator: String,
    pub body: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

impl Message {
    pub fn new(
        originator: impl Into<String>,
        body: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            originator: originator.into(),
            body: body.into(),
            created_at: created_at.into(),
            age: None,
        }
    }
}
