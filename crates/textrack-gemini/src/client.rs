// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One request per call. Failures are reported as
//! [`TextrackError::AiUnavailable`]; retrying is left to the user.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use textrack_core::TextrackError;

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Thin wrapper over a configured [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Builds a client that authenticates with `api_key`.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TextrackError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| TextrackError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| unavailable("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Sends `request` and returns the text of the first candidate.
    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<String, TextrackError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| unavailable("HTTP request failed", e))?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");

        let body = response
            .text()
            .await
            .map_err(|e| unavailable("failed to read response body", e))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Gemini API error ({} {}): {}",
                    api_err.error.code, api_err.error.status, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(TextrackError::AiUnavailable {
                message,
                source: None,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| unavailable("failed to parse API response", e))?;
        parsed.text().ok_or_else(|| TextrackError::AiUnavailable {
            message: "response contained no candidates".into(),
            source: None,
        })
    }
}

fn unavailable(
    context: &str,
    err: impl std::error::Error + Send + Sync + 'static,
) -> TextrackError {
    TextrackError::AiUnavailable {
        message: format!("{context}: {err}"),
        source: Some(Box::new(err)),
    }
}
