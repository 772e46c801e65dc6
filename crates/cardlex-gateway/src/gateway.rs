// SPDX-FileCopyrightText: 2026 Cardlex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation pipeline.
//!
//! [`Gateway::generate`] is the one entry point the host UI calls. It never
//! returns an error type: every failure is classified and folded into the
//! [`GatewayResponse`] value, so the boundary carries data, not exceptions.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use cardlex_config::CardlexConfig;
use cardlex_core::{
    classify_send_error, requests_mnemonic, CanonicalResult, CardlexError, ChatMessage,
    ClassifiedError, ErrorKind, KvStore, OutputSchema, ProviderKind, PurposeType,
};
use cardlex_gemini::GeminiClient;
use cardlex_openai::OpenAiClient;
use cardlex_vault::{CredentialStatus, CredentialStore};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::TranslationCache;
use crate::contract::{GatewayResponse, GenerateRequest};
use crate::conversation::ConversationStore;
use crate::prefs::{PreferenceStore, ProviderPreference};
use crate::prompts;
use crate::quota::QuotaClient;

/// Orchestrates credentials, conversations, cache, quota, and the two
/// provider clients behind one generation entry point.
pub struct Gateway {
    config: CardlexConfig,
    credentials: CredentialStore,
    conversations: ConversationStore,
    cache: TranslationCache,
    prefs: PreferenceStore,
    quota: Option<QuotaClient>,
    openai: OpenAiClient,
    gemini: GeminiClient,
}

impl Gateway {
    /// Wire up a gateway over the given KV store.
    ///
    /// Construction builds the HTTP clients but performs no I/O.
    pub fn new(config: CardlexConfig, kv: Arc<dyn KvStore>) -> Result<Self, CardlexError> {
        let timeout = Duration::from_secs(config.gateway.request_timeout_secs);
        let openai = OpenAiClient::new(&config.openai, timeout)?;
        let gemini = GeminiClient::new(&config.gemini, timeout)?;
        let quota = QuotaClient::from_config(&config.quota, timeout)?;
        Ok(Gateway {
            credentials: CredentialStore::new(kv.clone(), config.vault.kdf_iterations),
            conversations: ConversationStore::new(kv.clone()),
            cache: TranslationCache::new(kv.clone(), config.cache.ttl_hours),
            prefs: PreferenceStore::new(kv),
            quota,
            openai,
            gemini,
            config,
        })
    }

    /// Run one generation and fold the outcome into the caller contract.
    pub async fn generate(&self, request: GenerateRequest) -> GatewayResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(
            request_id = %request_id,
            purpose = %request.purpose_type,
            user_id = %request.user_id,
            "generation requested"
        );
        match self.run_pipeline(&request).await {
            Ok(result) => {
                info!(request_id = %request_id, purpose = %result.purpose, "generation succeeded");
                GatewayResponse::success(result)
            }
            Err(error) => {
                warn!(
                    request_id = %request_id,
                    kind = %error.kind,
                    message = %error.message,
                    "generation failed"
                );
                GatewayResponse::failure(error)
            }
        }
    }

    async fn run_pipeline(
        &self,
        request: &GenerateRequest,
    ) -> Result<CanonicalResult, ClassifiedError> {
        let purpose = validate(request)?;
        let text = request.text.trim();

        if purpose.cacheable() {
            match self.cache.get(text, &request.language).await {
                Ok(Some(translation)) => {
                    debug!("popup served from cache");
                    return Ok(popup_result(translation));
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "cache probe failed, generating instead"),
            }
        }

        // A stored pair that fails to decrypt aborts here, before any
        // network traffic.
        let own_credential = self
            .own_credential(request.explicit_credential.as_deref())
            .await?;
        let (provider, model) = self.provider_and_model().await;
        let (api_key, using_own) = match own_credential {
            Some(secret) => (secret, true),
            None => match self.shared_key(provider) {
                Some(secret) => (secret, false),
                None => {
                    return Err(ClassifiedError::new(
                        ErrorKind::Auth,
                        "no API key available; store a credential first",
                    ));
                }
            },
        };

        if !using_own && let Some(quota) = &self.quota {
            match quota.can_generate(&request.user_id, false).await {
                Ok(true) => {}
                Ok(false) => {
                    return Err(ClassifiedError::new(
                        ErrorKind::RateLimit,
                        "shared-key generation quota reached",
                    ));
                }
                Err(send_error) => {
                    let mut classified = classify_send_error(provider, &send_error);
                    // The quota service failed, not the provider.
                    classified.provider = None;
                    return Err(classified);
                }
            }
        }

        let system_instruction = prompts::system_instruction(purpose, &request.language);
        let user_prompt = prompts::user_prompt(purpose, text, &request.language);
        let schema = OutputSchema::for_purpose(purpose, requests_mnemonic(&user_prompt));

        // Held from fetch through append so concurrent generations for the
        // same (user, purpose) cannot drop each other's exchange.
        let guard = self.conversations.lock(&request.user_id, purpose).await;
        let mut conversation = self
            .conversations
            .get_or_create(&request.user_id, purpose, &system_instruction)
            .await
            .map_err(storage_failure)?;

        let mut outbound = conversation.messages.clone();
        outbound.push(ChatMessage::user(user_prompt.clone()));

        let reply_text = match provider {
            ProviderKind::OpenAi => {
                let wire = cardlex_openai::build_request(&model, &outbound, &schema);
                self.openai.generate(api_key.expose_secret(), &wire).await
            }
            ProviderKind::Gemini => {
                let wire = cardlex_gemini::build_request(&outbound, &schema);
                self.gemini
                    .generate(api_key.expose_secret(), &model, &wire)
                    .await
            }
        }
        .map_err(|e| classify_send_error(provider, &e))?;

        let fields = schema.parse_reply(&reply_text).map_err(|message| {
            let payload = serde_json::from_str(&reply_text)
                .ok()
                .or_else(|| Some(Value::String(reply_text.clone())));
            ClassifiedError::parse(message, payload).with_provider(provider)
        })?;

        self.conversations
            .append_and_store(&mut conversation, &user_prompt, &reply_text)
            .await
            .map_err(storage_failure)?;
        drop(guard);

        if purpose.cacheable()
            && let Some(translation) = fields.get("translation")
            && let Err(e) = self.cache.put(text, &request.language, translation).await
        {
            warn!(error = %e, "failed to record the popup translation in the cache");
        }

        if !using_own && let Some(quota) = &self.quota {
            match quota.increment_count(&request.user_id).await {
                Ok(reply) => {
                    debug!(remaining = ?reply.remaining_cards, "shared-key count incremented");
                }
                Err(e) => warn!(error = ?e, "count increment failed"),
            }
        }

        Ok(CanonicalResult { purpose, fields })
    }

    /// List the models the resolved credential can use.
    pub async fn list_models(
        &self,
        provider_override: Option<ProviderKind>,
    ) -> Result<Vec<String>, ClassifiedError> {
        let provider = match provider_override {
            Some(provider) => provider,
            None => self.provider_and_model().await.0,
        };
        let api_key = match self.own_credential(None).await? {
            Some(secret) => secret,
            None => self.shared_key(provider).ok_or_else(|| {
                ClassifiedError::new(
                    ErrorKind::Auth,
                    "no API key available; store a credential first",
                )
            })?,
        };
        match provider {
            ProviderKind::OpenAi => self.openai.list_models(api_key.expose_secret()).await,
            ProviderKind::Gemini => self.gemini.list_models(api_key.expose_secret()).await,
        }
        .map_err(|e| classify_send_error(provider, &e))
    }

    /// Encrypt and persist a user credential.
    pub async fn store_credential(&self, api_key: &str) -> Result<(), CardlexError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CardlexError::Vault("api key must not be empty".to_string()));
        }
        self.credentials.store(api_key).await
    }

    /// Report the stored credential state without exposing the key.
    pub async fn credential_status(&self) -> Result<CredentialStatus, CardlexError> {
        self.credentials.status().await
    }

    /// Persist the provider/model preference.
    pub async fn set_preference(
        &self,
        provider: ProviderKind,
        model: String,
    ) -> Result<(), CardlexError> {
        self.prefs.store(&ProviderPreference { provider, model }).await
    }

    /// The provider and model a generation would use right now.
    pub async fn preference(&self) -> (ProviderKind, String) {
        self.provider_and_model().await
    }

    /// Explicit key if supplied, else the stored vault credential.
    async fn own_credential(
        &self,
        explicit: Option<&str>,
    ) -> Result<Option<SecretString>, ClassifiedError> {
        if let Some(key) = explicit {
            let key = key.trim();
            if !key.is_empty() {
                return Ok(Some(SecretString::from(key.to_string())));
            }
        }
        match self.credentials.load().await {
            Ok(stored) => Ok(stored),
            Err(CardlexError::Vault(_)) => Err(ClassifiedError::decryption()),
            Err(e) => Err(storage_failure(e)),
        }
    }

    async fn provider_and_model(&self) -> (ProviderKind, String) {
        match self.prefs.load().await {
            Ok(Some(preference)) => (preference.provider, preference.model),
            Ok(None) => self.defaults(),
            Err(e) => {
                warn!(error = %e, "failed to load the preference record, using defaults");
                self.defaults()
            }
        }
    }

    fn defaults(&self) -> (ProviderKind, String) {
        let provider = self.config.gateway.default_provider;
        (provider, self.default_model(provider))
    }

    fn default_model(&self, provider: ProviderKind) -> String {
        match provider {
            ProviderKind::OpenAi => self.config.openai.default_model.clone(),
            ProviderKind::Gemini => self.config.gemini.default_model.clone(),
        }
    }

    fn shared_key(&self, provider: ProviderKind) -> Option<SecretString> {
        let configured = match provider {
            ProviderKind::OpenAi => self.config.openai.shared_api_key.as_deref(),
            ProviderKind::Gemini => self.config.gemini.shared_api_key.as_deref(),
        };
        configured
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::from(key.to_string()))
    }
}

fn validate(request: &GenerateRequest) -> Result<PurposeType, ClassifiedError> {
    let purpose = PurposeType::from_str(request.purpose_type.trim()).map_err(|_| {
        ClassifiedError::validation(format!("unknown purpose `{}`", request.purpose_type))
    })?;
    if request.user_id.trim().is_empty() {
        return Err(ClassifiedError::validation("userId must not be empty"));
    }
    if request.text.trim().is_empty() {
        return Err(ClassifiedError::validation("text must not be empty"));
    }
    if request.language.trim().is_empty() {
        return Err(ClassifiedError::validation("language must not be empty"));
    }
    Ok(purpose)
}

fn popup_result(translation: String) -> CanonicalResult {
    let mut fields = BTreeMap::new();
    fields.insert("translation".to_string(), translation);
    CanonicalResult {
        purpose: PurposeType::TranslationPopup,
        fields,
    }
}

fn storage_failure(error: CardlexError) -> ClassifiedError {
    ClassifiedError::new(ErrorKind::Unknown, format!("storage failure: {error}"))
}
