//! `numbers` command.

use super::{render_numbers, Command, Session};
use crate::error::AppResult;
use async_trait::async_trait;
use sms_client::CountryRef;

/// Lists the numbers currently offered by the provider.
pub struct NumbersCommand {
    pub country: Option<CountryRef>,
}

#[async_trait]
impl Command for NumbersCommand {
    fn name(&self) -> &str {
        "numbers"
    }

    async fn execute(&self, session: &Session) -> AppResult<String> {
        let numbers = session
            .provider()
            .list_numbers(self.country.as_ref())
            .await?;

        if numbers.is_empty() {
            return Ok("No new numbers available right now.".into());
        }
        Ok(render_numbers(&numbers))
    }
}
