// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store port for locally persisted state.

use crate::error::TextrackError;
use crate::traits::adapter::PluginAdapter;

/// Synchronous string key-value storage.
///
/// Values are opaque strings; callers own their encoding. A `set` must be
/// all-or-nothing: after a crash a reader sees either the previous value or
/// the new one.
pub trait KeyValueStore: PluginAdapter {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, TextrackError>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), TextrackError>;
}
