//! Commands of the fake-sms shell.

mod add;
mod countries;
mod list;
mod messages;
mod numbers;
mod remove;

pub use add::AddCommand;
pub use countries::CountriesCommand;
pub use list::ListCommand;
pub use messages::{MessagesCommand, MessagesReport};
pub use numbers::NumbersCommand;
pub use remove::RemoveCommand;

use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use number_registry::NumberRegistry;
use sms_client::{build_provider, Message, Number, Provider};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Everything a command needs: the selected provider, the registry and the
/// export directory.
pub struct Session {
    provider: Box<dyn Provider>,
    registry: NumberRegistry,
    export_dir: PathBuf,
}

impl Session {
    pub fn new(
        provider: Box<dyn Provider>,
        registry: NumberRegistry,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            provider,
            registry,
            export_dir: export_dir.into(),
        }
    }

    /// Build the provider and open the registry described by `config`.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider = build_provider(config.provider, &config.provider_options())?;
        let registry = NumberRegistry::open(config.db_dir.as_deref())?;
        Ok(Self::new(provider, registry, config.export_dir.clone()))
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn registry(&self) -> &NumberRegistry {
        &self.registry
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

/// A single shell command.
#[async_trait]
pub trait Command: Send + Sync {
    /// Command name (e.g., "list", "messages").
    fn name(&self) -> &str;

    /// Run the command and return the text to print.
    async fn execute(&self, session: &Session) -> AppResult<String>;
}

const RULE: &str = "===========================================";

/// Numbers as a table, prefixed with their position.
pub fn render_numbers(numbers: &[Number]) -> String {
    if numbers.is_empty() {
        return "No numbers.".into();
    }

    let mut out = format!("{:<4}{:<20}{:<24}{}\n", "#", "Number", "Country", "Created At");
    for (position, number) in numbers.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4}{:<20}{:<24}{}",
            position,
            number.number,
            number.country.to_string(),
            number.created_at
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Messages one block each, separated by rules.
pub fn render_messages(messages: &[Message]) -> String {
    let mut out = String::from(RULE);
    for message in messages {
        let _ = write!(
            out,
            "\nSender : {}, at : {}\nBody : {}\n{}",
            message.originator, message.created_at, message.body, RULE
        );
    }
    out
}
