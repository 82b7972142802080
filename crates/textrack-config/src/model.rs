// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Textrack configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TextrackConfig {
    /// General ledger behavior.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Local key-value store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gemini insight provider settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ledger export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// What to do when persisted record JSON cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptStatePolicy {
    /// Keep the raw value under `<key>.corrupt` and start from an empty ledger.
    #[default]
    Reset,
    /// Refuse to start until the file is repaired.
    Fail,
}

/// Key-value store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one file per store key.
    #[serde(default = "default_storage_path")]
    pub path: String,

    /// Recovery policy for malformed persisted records.
    #[serde(default)]
    pub on_corrupt: CorruptStatePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            on_corrupt: CorruptStatePolicy::default(),
        }
    }
}

fn default_storage_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("textrack"))
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".textrack".to_string())
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to the `GEMINI_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for both analysis and field extraction.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL, without the `/v1beta` path.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Heading printed above the exported table.
    #[serde(default = "default_export_title")]
    pub title: String,

    /// Default output file when `--output` is not given.
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: default_export_title(),
            output_path: default_output_path(),
        }
    }
}

fn default_export_title() -> String {
    "Hashir's Office Ledger".to_string()
}

fn default_output_path() -> String {
    "ledger.pdf".to_string()
}
