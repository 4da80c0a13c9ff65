//! `remove` command.

use super::{Command, Session};
use crate::error::AppResult;
use async_trait::async_trait;

/// Deletes the registry entry at a position.
pub struct RemoveCommand {
    pub position: usize,
}

#[async_trait]
impl Command for RemoveCommand {
    fn name(&self) -> &str {
        "remove"
    }

    async fn execute(&self, session: &Session) -> AppResult<String> {
        let removed = session.registry().remove(self.position).await?;
        Ok(format!("Removed {}", removed))
    }
}
