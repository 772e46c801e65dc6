// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cardlex - an LLM provider gateway for language-learning flashcards.
//!
//! This is the binary entry point for the Cardlex CLI.

mod credential;
mod generate;
mod models;
mod prefs;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use cardlex_config::CardlexConfig;
use cardlex_core::{CardlexError, KvStore, ProviderKind};
use cardlex_gateway::Gateway;
use cardlex_storage::{Database, SqliteKvStore};
use clap::{Parser, Subcommand};

/// Cardlex - an LLM provider gateway for language-learning flashcards.
#[derive(Parser, Debug)]
#[command(name = "cardlex", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (defaults to the XDG hierarchy).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate study content and print the caller-contract JSON.
    Generate(generate::GenerateArgs),
    /// Manage the encrypted user credential.
    Credential {
        #[command(subcommand)]
        action: credential::CredentialAction,
    },
    /// List the models the active credential can use.
    Models {
        /// Query this provider instead of the configured preference.
        #[arg(long)]
        provider: Option<String>,
    },
    /// Inspect or change the provider/model preference.
    Prefs {
        #[command(subcommand)]
        action: prefs::PrefsAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => cardlex_config::load_and_validate_path(path),
        None => cardlex_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            cardlex_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.gateway.log_level);

    let result = match cli.command {
        Some(Commands::Generate(args)) => generate::run_generate(config, args).await,
        Some(Commands::Credential { action }) => credential::run_credential(config, action).await,
        Some(Commands::Models { provider }) => {
            models::run_models(config, provider.as_deref()).await
        }
        Some(Commands::Prefs { action }) => prefs::run_prefs(config, action).await,
        None => {
            println!("cardlex: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("cardlex: {e}");
        std::process::exit(1);
    }
}

/// Open the SQLite store named in `config` and wire a gateway over it.
pub(crate) async fn open_gateway(config: CardlexConfig) -> Result<Gateway, CardlexError> {
    let db_path = PathBuf::from(&config.storage.database_path);
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| CardlexError::Storage {
            source: Box::new(e),
        })?;
    }

    let db = Database::open(&db_path, config.storage.wal_mode).await?;
    let kv: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(db));
    Gateway::new(config, kv)
}

/// Parse a `--provider` value, naming the accepted tags on error.
pub(crate) fn parse_provider(raw: &str) -> Result<ProviderKind, CardlexError> {
    ProviderKind::from_str(raw).map_err(|_| {
        CardlexError::Config(format!(
            "unknown provider '{raw}'; expected 'openai' or 'gemini'"
        ))
    })
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cardlex={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
