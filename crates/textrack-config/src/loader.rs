// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./textrack.toml` > `~/.config/textrack/textrack.toml`
//! > `/etc/textrack/textrack.toml`, with environment variable overrides via the
//! `TEXTRACK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TextrackConfig;

/// Top-level config sections, used to map flat env keys onto dotted paths.
const SECTIONS: &[&str] = &["ledger", "storage", "gemini", "export"];

/// Path of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/textrack/textrack.toml";

/// File name of the local (working directory) config file.
pub const LOCAL_CONFIG_FILE: &str = "textrack.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/textrack/textrack.toml`
/// 3. `~/.config/textrack/textrack.toml`
/// 4. `./textrack.toml`
/// 5. `TEXTRACK_*` environment variables
pub fn load_config() -> Result<TextrackConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TextrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TextrackConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TextrackConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TextrackConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Returns the user config file path, if a config directory exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("textrack").join(LOCAL_CONFIG_FILE))
}

/// Build the Figment used for standard config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TextrackConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `TEXTRACK_SECTION_KEY` to `section.key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `TEXTRACK_GEMINI_API_KEY` maps to `gemini.api_key`. Figment hands the key
/// over in its original case, so matching happens on the lowercased form.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("TEXTRACK_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
