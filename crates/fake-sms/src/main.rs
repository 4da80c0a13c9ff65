//! fake-sms - Entry point.

use anyhow::Context;
use clap::{Parser, Subcommand};
use fake_sms::commands::{
    AddCommand, Command, CountriesCommand, ListCommand, MessagesCommand, NumbersCommand,
    RemoveCommand, Session,
};
use fake_sms::{AppResult, Config};
use sms_client::{CountryRef, ProviderKind};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "fake-sms", version, about = "Claim disposable phone numbers and read their SMS")]
struct Cli {
    /// Backend to use (api or scrape); overrides FAKE_SMS_PROVIDER
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// Registry directory; overrides FAKE_SMS_DB_DIR
    #[arg(long, global = true)]
    db_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List countries with free numbers
    Countries,
    /// List numbers currently available
    Numbers {
        /// Country code (api) or country name (scrape)
        #[arg(long)]
        country: Option<String>,
    },
    /// Save an available number to the registry
    Add {
        number: String,
        /// Country code (api) or country name (scrape)
        #[arg(long)]
        country: Option<String>,
    },
    /// Show saved numbers
    List,
    /// Remove a saved number by position
    Remove { position: usize },
    /// Fetch, filter and export the messages of a saved number
    Messages {
        position: usize,
        /// Keep only messages whose body matches this regular expression
        #[arg(long)]
        filter: Option<String>,
    },
}

impl Commands {
    fn into_command(self) -> Box<dyn Command> {
        match self {
            Commands::Countries => Box::new(CountriesCommand),
            Commands::Numbers { country } => Box::new(NumbersCommand {
                country: country.as_deref().map(CountryRef::parse),
            }),
            Commands::Add { number, country } => Box::new(AddCommand {
                number,
                country: country.as_deref().map(CountryRef::parse),
            }),
            Commands::List => Box::new(ListCommand),
            Commands::Remove { position } => Box::new(RemoveCommand { position }),
            Commands::Messages { position, filter } => Box::new(MessagesCommand {
                position,
                pattern: filter,
            }),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    // Load configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }
    if let Some(db_dir) = cli.db_dir {
        config.db_dir = Some(db_dir);
    }

    // Initialize logging
    init_logging(&config.log_level);

    let session = Session::from_config(&config)?;
    let command = cli.command.into_command();
    debug!(
        "Running '{}' with the {} provider",
        command.name(),
        config.provider
    );

    let output = command.execute(&session).await?;
    println!("{}", output);
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
