// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cardlex prefs` command implementation.
//!
//! Reads and writes the provider/model preference the gateway consults
//! when a generation request arrives.

use cardlex_config::CardlexConfig;
use cardlex_core::CardlexError;
use clap::Subcommand;

/// Preference management actions.
#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Persist the provider and model used for generation.
    Set {
        /// Provider tag: openai or gemini.
        #[arg(long)]
        provider: String,

        /// Model identifier, e.g. "gpt-4o-mini".
        #[arg(long)]
        model: String,
    },
    /// Show the provider and model a generation would use right now.
    Show,
}

/// Run the `cardlex prefs` command.
pub async fn run_prefs(config: CardlexConfig, action: PrefsAction) -> Result<(), CardlexError> {
    match action {
        PrefsAction::Set { provider, model } => {
            let provider = crate::parse_provider(&provider)?;
            let model = model.trim().to_string();
            if model.is_empty() {
                return Err(CardlexError::Config("model must not be empty".to_string()));
            }

            let gateway = crate::open_gateway(config).await?;
            gateway.set_preference(provider, model.clone()).await?;
            println!("Preference set: {provider} / {model}");
            Ok(())
        }
        PrefsAction::Show => {
            let gateway = crate::open_gateway(config).await?;
            let (provider, model) = gateway.preference().await;
            println!("{provider} / {model}");
            Ok(())
        }
    }
}
