// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record model and common types shared across the Textrack workspace.
//!
//! Field names of [`Record`] serialize in camelCase; they are the on-disk
//! storage contract and must not change without a migration.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Alphabet used for generated record and session identifiers.
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a generated identifier body.
pub const SHORT_ID_LEN: usize = 7;

/// Prefix of generated session identifiers.
pub const SESSION_ID_PREFIX: &str = "user_";

/// Anonymous identity of the installation that created or edits records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh `user_xxxxxxx` identifier.
    pub fn generate() -> Self {
        Self(format!("{SESSION_ID_PREFIX}{}", short_id()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The acting principal, passed explicitly into every repository mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: SessionId,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: SessionId(session_id.into()),
        }
    }

    /// Returns true when this session created `record`.
    pub fn owns(&self, record: &Record) -> bool {
        record.created_by == self.session_id.0
    }
}

/// One textile-production ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub dori_detail: String,
    pub warpin_detail: String,
    pub bheem_detail: String,
    pub delivery_detail: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub entry_date: String,
    pub created_by: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, never earlier than `created_at`.
    pub updated_at: i64,
}

impl Record {
    /// Short batch label shown in listings and exports (first 4 chars of the id).
    pub fn batch_label(&self) -> String {
        self.id.chars().take(4).collect()
    }

    /// Copies the user-editable fields out of the record.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            dori_detail: self.dori_detail.clone(),
            warpin_detail: self.warpin_detail.clone(),
            bheem_detail: self.bheem_detail.clone(),
            delivery_detail: self.delivery_detail.clone(),
            entry_date: self.entry_date.clone(),
        }
    }
}

/// The five user-supplied fields of a record, all required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub dori_detail: String,
    pub warpin_detail: String,
    pub bheem_detail: String,
    pub delivery_detail: String,
    pub entry_date: String,
}

/// A partial set of record fields.
///
/// Used for owner edits (only supplied fields change) and for AI
/// suggestions extracted from a floor note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dori_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warpin_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bheem_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<String>,
}

impl RecordPatch {
    /// Returns true when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.dori_detail.is_none()
            && self.warpin_detail.is_none()
            && self.bheem_detail.is_none()
            && self.delivery_detail.is_none()
            && self.entry_date.is_none()
    }

    /// Drops fields whose value is blank after trimming.
    pub fn without_blanks(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            dori_detail: keep(self.dori_detail),
            warpin_detail: keep(self.warpin_detail),
            bheem_detail: keep(self.bheem_detail),
            delivery_detail: keep(self.delivery_detail),
            entry_date: keep(self.entry_date),
        }
    }

    /// Overwrites the supplied fields of `fields`, leaving the rest untouched.
    pub fn apply_to(&self, fields: &mut RecordFields) {
        if let Some(v) = &self.dori_detail {
            fields.dori_detail = v.clone();
        }
        if let Some(v) = &self.warpin_detail {
            fields.warpin_detail = v.clone();
        }
        if let Some(v) = &self.bheem_detail {
            fields.bheem_detail = v.clone();
        }
        if let Some(v) = &self.delivery_detail {
            fields.delivery_detail = v.clone();
        }
        if let Some(v) = &self.entry_date {
            fields.entry_date = v.clone();
        }
    }
}

impl From<RecordFields> for RecordPatch {
    fn from(fields: RecordFields) -> Self {
        Self {
            dori_detail: Some(fields.dori_detail),
            warpin_detail: Some(fields.warpin_detail),
            bheem_detail: Some(fields.bheem_detail),
            delivery_detail: Some(fields.delivery_detail),
            entry_date: Some(fields.entry_date),
        }
    }
}

/// Whether the user explicitly confirmed a destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

/// Result of an owner-gated delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed.
    Deleted(Record),
    /// The user did not confirm; nothing was removed.
    Cancelled,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Insight,
}

/// Generates a random 7-character base-36 identifier.
pub fn short_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SHORT_ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
