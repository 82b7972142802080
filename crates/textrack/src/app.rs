// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of the ledger stack from configuration.

use std::sync::Arc;

use tracing::debug;

use textrack_config::TextrackConfig;
use textrack_core::{InsightProvider, SessionContext, TextrackError};
use textrack_gemini::GeminiProvider;
use textrack_ledger::{InsightService, OfflineInsight, RecordRepository};
use textrack_storage::{FileStore, LedgerStore};

/// Everything a command needs: the acting session, its records, and the AI.
pub struct App {
    pub config: TextrackConfig,
    pub session: SessionContext,
    pub repo: RecordRepository,
    pub insight: InsightService,
}

impl App {
    /// Opens the file-backed store named by `config.storage.path`.
    pub fn open(config: TextrackConfig) -> Result<Self, TextrackError> {
        let store = FileStore::open(&config.storage.path)?;
        let ledger = LedgerStore::new(Arc::new(store), config.storage.on_corrupt);
        let session = ledger.load_or_create_session()?;
        let repo = RecordRepository::load(ledger)?;
        let insight = InsightService::new(insight_provider(&config));

        debug!(
            session = %session.session_id,
            records = repo.len(),
            provider = insight.provider().name(),
            "ledger opened"
        );
        Ok(Self {
            config,
            session,
            repo,
            insight,
        })
    }
}

/// The Gemini provider, or an offline stand-in when it cannot be built
/// (typically a missing API key).
pub fn insight_provider(config: &TextrackConfig) -> Arc<dyn InsightProvider> {
    match GeminiProvider::new(&config.gemini) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            debug!(error = %e, "AI provider unavailable, running offline");
            Arc::new(OfflineInsight::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_store_and_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TextrackConfig::default();
        config.storage.path = dir.path().join("data").to_string_lossy().into_owned();
        config.gemini.api_key = Some("test-key".into());

        let app = App::open(config.clone()).unwrap();
        assert!(app.repo.is_empty());
        assert_eq!(app.insight.provider().name(), "gemini");

        let reopened = App::open(config).unwrap();
        assert_eq!(reopened.session, app.session);
    }

    #[test]
    fn provider_name_reflects_key_presence() {
        let mut config = TextrackConfig::default();
        config.gemini.api_key = Some("k".into());
        assert_eq!(insight_provider(&config).name(), "gemini");
    }
}
