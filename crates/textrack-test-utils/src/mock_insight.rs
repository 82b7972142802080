// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock insight provider for deterministic testing.
//!
//! `MockInsight` implements `InsightProvider` with pre-configured replies,
//! so ledger flows can be tested without network access.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use textrack_core::{
    AdapterType, HealthStatus, InsightProvider, PluginAdapter, Record, RecordPatch, TextrackError,
};

/// Reply used when the analysis queue is empty.
pub const DEFAULT_ANALYSIS: &str = "mock analysis";

/// A mock insight provider.
///
/// Replies are popped from FIFO queues. An empty analysis queue yields
/// [`DEFAULT_ANALYSIS`]; an empty suggestion queue yields an empty patch.
/// A queued `Err(message)` is returned as `AiUnavailable`.
#[derive(Default)]
pub struct MockInsight {
    fail_all: AtomicBool,
    analyses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    suggestions: Arc<Mutex<VecDeque<Result<RecordPatch, String>>>>,
    analyze_calls: AtomicUsize,
    suggest_calls: AtomicUsize,
    /// Record count seen by the most recent `analyze`.
    last_record_count: AtomicUsize,
}

impl MockInsight {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every call fails, as if the service were down.
    pub fn failing() -> Self {
        Self {
            fail_all: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub async fn push_analysis(&self, text: impl Into<String>) {
        self.analyses.lock().await.push_back(Ok(text.into()));
    }

    pub async fn push_analysis_error(&self, message: impl Into<String>) {
        self.analyses.lock().await.push_back(Err(message.into()));
    }

    pub async fn push_suggestion(&self, patch: RecordPatch) {
        self.suggestions.lock().await.push_back(Ok(patch));
    }

    pub async fn push_suggestion_error(&self, message: impl Into<String>) {
        self.suggestions.lock().await.push_back(Err(message.into()));
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }

    pub fn last_record_count(&self) -> usize {
        self.last_record_count.load(Ordering::SeqCst)
    }
}

fn unavailable(message: String) -> TextrackError {
    TextrackError::AiUnavailable {
        message,
        source: None,
    }
}

#[async_trait]
impl PluginAdapter for MockInsight {
    fn name(&self) -> &str {
        "mock-insight"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Insight
    }

    async fn health_check(&self) -> Result<HealthStatus, TextrackError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl InsightProvider for MockInsight {
    async fn analyze(&self, records: &[Record]) -> Result<String, TextrackError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.last_record_count.store(records.len(), Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(unavailable("mock outage".into()));
        }
        match self.analyses.lock().await.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(unavailable(message)),
            None => Ok(DEFAULT_ANALYSIS.to_string()),
        }
    }

    async fn suggest_metadata(&self, _note: &str) -> Result<RecordPatch, TextrackError> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(unavailable("mock outage".into()));
        }
        match self.suggestions.lock().await.pop_front() {
            Some(Ok(patch)) => Ok(patch),
            Some(Err(message)) => Err(unavailable(message)),
            None => Ok(RecordPatch::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_when_queues_empty() {
        let mock = MockInsight::new();
        assert_eq!(mock.analyze(&[]).await.unwrap(), DEFAULT_ANALYSIS);
        assert!(mock.suggest_metadata("x").await.unwrap().is_empty());
        assert_eq!(mock.analyze_calls(), 1);
        assert_eq!(mock.suggest_calls(), 1);
    }

    #[tokio::test]
    async fn queued_replies_in_order() {
        let mock = MockInsight::new();
        mock.push_analysis("first").await;
        mock.push_analysis_error("boom").await;

        assert_eq!(mock.analyze(&[]).await.unwrap(), "first");
        assert!(matches!(
            mock.analyze(&[]).await,
            Err(TextrackError::AiUnavailable { .. })
        ));
        assert_eq!(mock.analyze(&[]).await.unwrap(), DEFAULT_ANALYSIS);
    }

    #[tokio::test]
    async fn failing_mock_fails_everything() {
        let mock = MockInsight::failing();
        mock.push_analysis("ignored").await;
        assert!(mock.analyze(&[]).await.is_err());
        assert!(mock.suggest_metadata("x").await.is_err());
    }
}
