//! `list` command.

use super::{render_numbers, Command, Session};
use crate::error::AppResult;
use async_trait::async_trait;

/// Prints the registry with positions.
pub struct ListCommand;

#[async_trait]
impl Command for ListCommand {
    fn name(&self) -> &str {
        "list"
    }

    async fn execute(&self, session: &Session) -> AppResult<String> {
        let numbers = session.registry().list().await?;
        Ok(render_numbers(&numbers))
    }
}
