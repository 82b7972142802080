// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::TextrackConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates semantic constraints serde cannot express.
///
/// Collects every failure rather than stopping at the first one.
pub fn validate_config(config: &TextrackConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.ledger.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "ledger.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.ledger.log_level
        ));
    }

    if config.storage.path.trim().is_empty() {
        fail("storage.path must not be empty".to_string());
    }

    if config.gemini.model.trim().is_empty() {
        fail("gemini.model must not be empty".to_string());
    }

    let base_url = config.gemini.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "gemini.base_url must start with http:// or https://, got `{base_url}`"
        ));
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be greater than 0".to_string());
    }

    if config.export.title.trim().is_empty() {
        fail("export.title must not be empty".to_string());
    }

    if config.export.output_path.trim().is_empty() {
        fail("export.output_path must not be empty".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
