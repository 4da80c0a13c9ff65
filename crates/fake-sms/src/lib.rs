//! fake-sms: claim disposable phone numbers and read the SMS they receive.
//!
//! The binary is a thin shell over the commands defined here:
//! - numbers come from a [`sms_client::Provider`] (JSON API or scraped site)
//! - claimed numbers are kept in a local [`number_registry::NumberRegistry`]
//! - fetched messages can be filtered by a regex and are exported as JSON

pub mod commands;
pub mod config;
pub mod error;
pub mod export;

pub use config::Config;
pub use error::{AppError, AppResult};
