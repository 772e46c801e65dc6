// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cardlex generate` command implementation.
//!
//! Runs one generation through the gateway and prints the caller-contract
//! JSON on stdout. A failed generation is still a contract response
//! (`success: false`), so the process exits zero either way.

use cardlex_config::CardlexConfig;
use cardlex_core::CardlexError;
use cardlex_gateway::GenerateRequest;
use clap::Args;

/// Arguments for `cardlex generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Generation purpose: flashcard, definition, mnemonic, translation,
    /// examples, or translation_popup.
    #[arg(long)]
    pub purpose: String,

    /// Stable user identifier for conversation continuity and quota.
    #[arg(long)]
    pub user: String,

    /// Source text to work from.
    #[arg(long)]
    pub text: String,

    /// Language key of the text, e.g. "fr" or "de".
    #[arg(long)]
    pub language: String,

    /// One-off API key; bypasses the stored credential and the shared key.
    #[arg(long)]
    pub credential: Option<String>,
}

impl GenerateArgs {
    /// Map the CLI flags onto a gateway request.
    fn into_request(self) -> GenerateRequest {
        GenerateRequest {
            purpose_type: self.purpose,
            user_id: self.user,
            text: self.text,
            language: self.language,
            explicit_credential: self.credential,
        }
    }
}

/// Run the `cardlex generate` command.
pub async fn run_generate(config: CardlexConfig, args: GenerateArgs) -> Result<(), CardlexError> {
    let gateway = crate::open_gateway(config).await?;

    let response = gateway.generate(args.into_request()).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
    );

    Ok(())
}
