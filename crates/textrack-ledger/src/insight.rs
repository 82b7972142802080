// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI insight orchestration with graceful degradation.
//!
//! [`InsightService`] wraps an [`InsightProvider`] and owns the caller-side
//! policy: failures become the fixed fallback text (analysis) or "no
//! suggestion" (field extraction), and each endpoint allows at most one
//! outstanding request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, warn};

use textrack_core::{
    AdapterType, HealthStatus, InsightProvider, PluginAdapter, Record, RecordPatch, TextrackError,
};

/// Shown in place of an analysis when the AI service fails.
pub const AI_FALLBACK_MESSAGE: &str = "AI service is unavailable. Please check configuration.";

/// Marks an endpoint busy for the lifetime of the guard.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, endpoint: &'static str) -> Result<Self, TextrackError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TextrackError::InsightInFlight { endpoint })?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Caller-side wrapper around an insight provider.
pub struct InsightService {
    provider: Arc<dyn InsightProvider>,
    analyzing: AtomicBool,
    suggesting: AtomicBool,
}

impl InsightService {
    pub fn new(provider: Arc<dyn InsightProvider>) -> Self {
        Self {
            provider,
            analyzing: AtomicBool::new(false),
            suggesting: AtomicBool::new(false),
        }
    }

    pub fn provider(&self) -> &Arc<dyn InsightProvider> {
        &self.provider
    }

    /// Summarizes `records`, substituting [`AI_FALLBACK_MESSAGE`] on failure.
    ///
    /// Only a concurrent trigger is reported as an error.
    pub async fn analyze(&self, records: &[Record]) -> Result<String, TextrackError> {
        let _busy = InFlight::acquire(&self.analyzing, "analyze")?;
        match self.provider.analyze(records).await {
            Ok(text) => {
                debug!(records = records.len(), chars = text.len(), "analysis received");
                Ok(text)
            }
            Err(e) => {
                warn!(error = %e, provider = self.provider.name(), "analysis failed, using fallback");
                Ok(AI_FALLBACK_MESSAGE.to_string())
            }
        }
    }

    /// Extracts record fields from `note`.
    ///
    /// `Ok(None)` covers a blank note, an empty suggestion and any provider
    /// failure.
    pub async fn suggest(&self, note: &str) -> Result<Option<RecordPatch>, TextrackError> {
        let note = note.trim();
        if note.is_empty() {
            return Ok(None);
        }

        let _busy = InFlight::acquire(&self.suggesting, "suggest")?;
        match self.provider.suggest_metadata(note).await {
            Ok(patch) => {
                let patch = patch.without_blanks();
                Ok((!patch.is_empty()).then_some(patch))
            }
            Err(e) => {
                warn!(error = %e, provider = self.provider.name(), "suggestion failed, skipping");
                Ok(None)
            }
        }
    }
}

/// Stand-in provider used when no AI backend is configured.
///
/// Every call fails with the configured reason, so callers degrade exactly
/// as they would on a network failure.
pub struct OfflineInsight {
    reason: String,
}

impl OfflineInsight {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> TextrackError {
        TextrackError::AiUnavailable {
            message: self.reason.clone(),
            source: None,
        }
    }
}

#[async_trait]
impl PluginAdapter for OfflineInsight {
    fn name(&self) -> &str {
        "offline"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Insight
    }

    async fn health_check(&self) -> Result<HealthStatus, TextrackError> {
        Ok(HealthStatus::Unhealthy(self.reason.clone()))
    }
}

#[async_trait]
impl InsightProvider for OfflineInsight {
    async fn analyze(&self, _records: &[Record]) -> Result<String, TextrackError> {
        Err(self.unavailable())
    }

    async fn suggest_metadata(&self, _note: &str) -> Result<RecordPatch, TextrackError> {
        Err(self.unavailable())
    }
}
