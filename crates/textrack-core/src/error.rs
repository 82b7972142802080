// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Textrack ledger.

use thiserror::Error;

/// The primary error type used across all Textrack crates.
#[derive(Debug, Error)]
pub enum TextrackError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Key-value store errors (unreadable directory, failed write).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Persisted JSON under `key` could not be parsed.
    #[error("persisted state under `{key}` is malformed: {source}")]
    MalformedState {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A session tried to modify or delete a record it does not own.
    #[error("permission denied: record {id} is not owned by {actor}")]
    PermissionDenied { id: String, actor: String },

    /// No record exists with the given id.
    #[error("record not found: {id}")]
    RecordNotFound { id: String },

    /// A submitted field failed form validation.
    #[error("invalid {field}: {message}")]
    InvalidRecord { field: &'static str, message: String },

    /// The AI collaborator failed (network, HTTP status, unparseable reply).
    #[error("AI service unavailable: {message}")]
    AiUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A request to the same AI endpoint is already outstanding.
    #[error("an {endpoint} request is already in flight")]
    InsightInFlight { endpoint: &'static str },

    /// Export rendering or writing failed.
    #[error("export error: {0}")]
    Export(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TextrackError {
    /// Wraps any error as a storage failure.
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage { source: err.into() }
    }

    /// Returns true when the error is an ownership rejection.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
