//! `countries` command.

use super::{Command, Session};
use crate::error::AppResult;
use async_trait::async_trait;
use std::fmt::Write;

/// Lists the countries the provider offers numbers in.
pub struct CountriesCommand;

#[async_trait]
impl Command for CountriesCommand {
    fn name(&self) -> &str {
        "countries"
    }

    async fn execute(&self, session: &Session) -> AppResult<String> {
        let countries = session.provider().list_countries().await?;
        if countries.is_empty() {
            return Ok("No countries available right now.".into());
        }

        let mut out = format!("{:<8}{}", "Code", "Country");
        for country in &countries {
            let _ = write!(out, "\n{:<8}{}", country.code, country.name);
        }
        Ok(out)
    }
}
