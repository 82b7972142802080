// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI insight provider trait (text generation backends such as Gemini).

use async_trait::async_trait;

use crate::error::TextrackError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Record, RecordPatch};

/// External text-generation collaborator.
///
/// Both calls are single request/response exchanges. Implementations
/// report every failure as [`TextrackError::AiUnavailable`]; deciding how to
/// degrade is left to the caller.
#[async_trait]
pub trait InsightProvider: PluginAdapter {
    /// Produces a natural-language summary of the given records.
    async fn analyze(&self, records: &[Record]) -> Result<String, TextrackError>;

    /// Extracts record fields from a free-text floor note.
    ///
    /// An empty patch means the service had no suggestion.
    async fn suggest_metadata(&self, note: &str) -> Result<RecordPatch, TextrackError>;
}
