//! `messages` command.

use super::{render_messages, Command, Session};
use crate::error::{AppError, AppResult};
use crate::export::export_messages;
use async_trait::async_trait;
use number_registry::RegistryError;
use sms_client::{Message, MessageFilter, Number};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Fetches, filters and exports the messages of a registered number.
pub struct MessagesCommand {
    pub position: usize,
    pub pattern: Option<String>,
}

/// Outcome of a `messages` run.
#[derive(Debug)]
pub struct MessagesReport {
    pub number: Number,
    /// Number of messages before filtering.
    pub fetched: usize,
    pub messages: Vec<Message>,
    pub export_path: PathBuf,
}

impl MessagesCommand {
    /// Run the pipeline without rendering.
    #[instrument(skip(self, session), fields(position = self.position))]
    pub async fn fetch(&self, session: &Session) -> AppResult<MessagesReport> {
        // A bad pattern must fail before anything is fetched.
        let filter = self
            .pattern
            .as_deref()
            .map(MessageFilter::new)
            .transpose()?;

        let numbers = session.registry().list().await?;
        let len = numbers.len();
        let number = numbers
            .into_iter()
            .nth(self.position)
            .ok_or(RegistryError::OutOfRange {
                position: self.position,
                len,
            })?;

        info!("Fetching messages for {}", number);
        let fetched = session
            .provider()
            .list_messages(&number)
            .await
            .map_err(|source| AppError::FetchMessages {
                number: number.number.clone(),
                source,
            })?;

        let count = fetched.len();
        let messages = match &filter {
            Some(filter) => filter.apply(&fetched),
            None => fetched,
        };
        debug!("{} of {} messages kept", messages.len(), count);

        let export_path = export_messages(session.export_dir(), &number.number, &messages).await?;

        Ok(MessagesReport {
            number,
            fetched: count,
            messages,
            export_path,
        })
    }
}

#[async_trait]
impl Command for MessagesCommand {
    fn name(&self) -> &str {
        "messages"
    }

    async fn execute(&self, session: &Session) -> AppResult<String> {
        let report = self.fetch(session).await?;

        Ok(format!(
            "Messages for {} ({} of {} shown)\n{}\nSaved to {}",
            report.number,
            report.messages.len(),
            report.fetched,
            render_messages(&report.messages),
            report.export_path.display()
        ))
    }
}
