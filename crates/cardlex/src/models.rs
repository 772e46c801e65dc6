// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `cardlex models` command implementation.

use cardlex_config::CardlexConfig;
use cardlex_core::CardlexError;

/// Run the `cardlex models` command.
///
/// Lists the model identifiers the resolved credential can use, one per
/// line. `--provider` queries that provider instead of the configured
/// preference.
pub async fn run_models(config: CardlexConfig, provider: Option<&str>) -> Result<(), CardlexError> {
    let provider = provider.map(crate::parse_provider).transpose()?;

    let gateway = crate::open_gateway(config).await?;
    let models = gateway
        .list_models(provider)
        .await
        .map_err(|e| CardlexError::Provider {
            message: e.to_string(),
            source: Some(Box::new(e)),
        })?;

    if models.is_empty() {
        eprintln!("cardlex: provider returned no models");
        return Ok(());
    }
    for model in &models {
        println!("{model}");
    }

    Ok(())
}
