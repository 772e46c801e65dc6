// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cardlex credential` command implementation.
//!
//! Stores the user's API key through the encrypting vault and reports its
//! status without ever printing the key.

use std::io::IsTerminal;

use cardlex_config::CardlexConfig;
use cardlex_core::CardlexError;
use cardlex_vault::CredentialStatus;
use clap::Subcommand;
use secrecy::{ExposeSecret, SecretString};

/// The environment variable name for providing the API key non-interactively.
pub const API_KEY_ENV_VAR: &str = "CARDLEX_API_KEY";

/// Credential management actions.
#[derive(Subcommand, Debug)]
pub enum CredentialAction {
    /// Encrypt and store an API key for generation.
    Set {
        /// API key value; prompted for when omitted.
        #[arg(long)]
        key: Option<String>,
    },
    /// Show whether a credential is stored, without revealing it.
    Status,
}

/// Run the `cardlex credential` command.
pub async fn run_credential(
    config: CardlexConfig,
    action: CredentialAction,
) -> Result<(), CardlexError> {
    match action {
        CredentialAction::Set { key } => run_set(config, key).await,
        CredentialAction::Status => run_status(config).await,
    }
}

async fn run_set(config: CardlexConfig, key: Option<String>) -> Result<(), CardlexError> {
    let api_key = acquire_api_key(key)?;
    let gateway = crate::open_gateway(config).await?;
    gateway.store_credential(api_key.expose_secret()).await?;
    println!("Credential stored.");
    Ok(())
}

async fn run_status(config: CardlexConfig) -> Result<(), CardlexError> {
    let gateway = crate::open_gateway(config).await?;
    let status = gateway.credential_status().await?;
    let use_color = std::io::stdout().is_terminal();
    print_status(&status, use_color);
    Ok(())
}

/// Get the API key from the `--key` flag, the environment, or a TTY prompt.
///
/// Priority:
/// 1. `--key` flag value
/// 2. `CARDLEX_API_KEY` environment variable (for headless use)
/// 3. Interactive TTY prompt via `rpassword`
///
/// Returns an error if no source yields a non-empty key.
fn acquire_api_key(flag: Option<String>) -> Result<SecretString, CardlexError> {
    if let Some(key) = flag {
        if key.trim().is_empty() {
            return Err(CardlexError::Vault("empty api key not allowed".to_string()));
        }
        return Ok(SecretString::from(key));
    }

    if let Ok(key) = std::env::var(API_KEY_ENV_VAR)
        && !key.is_empty()
    {
        return Ok(SecretString::from(key));
    }

    if std::io::stdin().is_terminal() {
        eprint!("API key: ");
        let key = rpassword::read_password()
            .map_err(|e| CardlexError::Vault(format!("failed to read api key: {e}")))?;
        if key.is_empty() {
            return Err(CardlexError::Vault("empty api key not allowed".to_string()));
        }
        return Ok(SecretString::from(key));
    }

    Err(CardlexError::Vault(
        "No api key provided. Pass --key, set CARDLEX_API_KEY, or run interactively.".to_string(),
    ))
}

/// Print the vault status line with optional colors.
fn print_status(status: &CredentialStatus, use_color: bool) {
    println!();
    println!("  cardlex credential");
    println!("  {}", "-".repeat(35));

    match status {
        CredentialStatus::Present { preview } => {
            if use_color {
                use colored::Colorize;
                println!("    Credential: {} stored ({preview})", "✓".green());
            } else {
                println!("    Credential: [OK] stored ({preview})");
            }
        }
        CredentialStatus::Absent => {
            println!("    Credential: none stored");
            println!();
            println!("  Store one with: cardlex credential set");
        }
        CredentialStatus::Unreadable => {
            if use_color {
                use colored::Colorize;
                println!(
                    "    Credential: {} {}",
                    "✗".red(),
                    "stored but unreadable".red()
                );
            } else {
                println!("    Credential: [FAIL] stored but unreadable");
            }
            println!();
            println!("  Store a fresh key with: cardlex credential set");
        }
    }

    println!();
}
