// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini insight provider for Textrack.
//!
//! Implements [`InsightProvider`] on top of the `generateContent` REST
//! endpoint: ledger analysis as plain text, and field extraction from a
//! free-text note as JSON.

pub mod client;
pub mod prompt;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use textrack_config::model::GeminiConfig;
use textrack_core::{
    AdapterType, HealthStatus, InsightProvider, PluginAdapter, Record, RecordPatch, TextrackError,
};

use crate::client::GeminiClient;

/// Environment variable consulted when `gemini.api_key` is unset.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini-backed [`InsightProvider`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Result<Self, TextrackError> {
        let api_key = resolve_api_key(&config.api_key, std::env::var(API_KEY_ENV).ok())?;
        let client = GeminiClient::new(
            &api_key,
            config.model.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = config.model, "Gemini provider initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Insight
    }

    async fn health_check(&self) -> Result<HealthStatus, TextrackError> {
        // Credentials resolved and client built; no request is spent here.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    async fn analyze(&self, records: &[Record]) -> Result<String, TextrackError> {
        let request = prompt::analysis_request(records);
        let text = self.client.generate(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(TextrackError::AiUnavailable {
                message: "empty analysis".into(),
                source: None,
            });
        }
        Ok(text.to_string())
    }

    async fn suggest_metadata(&self, note: &str) -> Result<RecordPatch, TextrackError> {
        let reply = self.client.generate(&prompt::suggestion_request(note)).await?;
        debug!(chars = reply.len(), "suggestion reply received");
        prompt::parse_suggestion(&reply)
    }
}

fn resolve_api_key(
    config_key: &Option<String>,
    env_key: Option<String>,
) -> Result<String, TextrackError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.clone());
    }

    env_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
        TextrackError::Config(format!(
            "Gemini API key not found. Set gemini.api_key in config or the {API_KEY_ENV} environment variable."
        ))
    })
}
