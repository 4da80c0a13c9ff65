//! `add` command.

use super::{Command, Session};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use sms_client::CountryRef;
use tracing::info;

/// Claims one of the numbers currently offered by the provider.
///
/// The number is looked up in a fresh listing so that the stored entry keeps
/// the provider's country association and metadata.
pub struct AddCommand {
    pub number: String,
    pub country: Option<CountryRef>,
}

#[async_trait]
impl Command for AddCommand {
    fn name(&self) -> &str {
        "add"
    }

    async fn execute(&self, session: &Session) -> AppResult<String> {
        let available = session
            .provider()
            .list_numbers(self.country.as_ref())
            .await?;

        let wanted = self.number.trim();
        let selected = available
            .into_iter()
            .find(|n| n.number == wanted)
            .ok_or_else(|| AppError::NumberUnavailable(wanted.to_string()))?;

        info!("Saving {} to the registry", selected);
        let message = format!("Saved {}", selected);
        session.registry().add(selected).await?;
        Ok(message)
    }
}
