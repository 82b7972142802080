// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end ledger tests.
//!
//! `TestHarness` assembles the full ledger stack over an in-memory store and
//! a [`MockInsight`] provider. `restart()` reloads the repository from the
//! same store, which is how persistence across app restarts is checked.

use std::sync::Arc;

use textrack_config::{CorruptStatePolicy, TextrackConfig};
use textrack_core::{KeyValueStore, Record, SessionContext, TextrackError};
use textrack_ledger::{InsightService, RecordRepository};
use textrack_storage::{LedgerStore, MemoryStore, RECORDS_KEY, SESSION_KEY};

use crate::mock_insight::MockInsight;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    session_id: Option<String>,
    records: Vec<Record>,
    raw_records: Option<String>,
    on_corrupt: CorruptStatePolicy,
    insight: MockInsight,
    clock: Option<i64>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            session_id: None,
            records: Vec::new(),
            raw_records: None,
            on_corrupt: CorruptStatePolicy::default(),
            insight: MockInsight::new(),
            clock: None,
        }
    }

    /// Persist `id` as the installation's session before startup.
    pub fn with_session(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Seed the persisted record list.
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Seed the records key with an arbitrary (possibly malformed) string.
    pub fn with_raw_records(mut self, raw: impl Into<String>) -> Self {
        self.raw_records = Some(raw.into());
        self
    }

    pub fn with_corrupt_policy(mut self, policy: CorruptStatePolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn with_insight(mut self, insight: MockInsight) -> Self {
        self.insight = insight;
        self
    }

    /// Freeze the repository clock at `millis`.
    pub fn with_fixed_clock(mut self, millis: i64) -> Self {
        self.clock = Some(millis);
        self
    }

    pub fn build(self) -> Result<TestHarness, TextrackError> {
        let store = MemoryStore::new();
        if let Some(id) = &self.session_id {
            store.set(SESSION_KEY, id)?;
        }
        if let Some(raw) = &self.raw_records {
            store.set(RECORDS_KEY, raw)?;
        } else if !self.records.is_empty() {
            let json = serde_json::to_string(&self.records)
                .map_err(|e| TextrackError::Internal(format!("seed records: {e}")))?;
            store.set(RECORDS_KEY, &json)?;
        }

        let ledger = LedgerStore::new(Arc::new(store.clone()), self.on_corrupt);
        let session = ledger.load_or_create_session()?;
        let repo = load_repo(&ledger, self.clock)?;

        let mock_insight = Arc::new(self.insight);
        let insight = InsightService::new(mock_insight.clone());

        let mut config = TextrackConfig::default();
        config.storage.on_corrupt = self.on_corrupt;

        Ok(TestHarness {
            store,
            ledger,
            session,
            repo,
            insight,
            mock_insight,
            config,
            clock: self.clock,
        })
    }
}

fn load_repo(ledger: &LedgerStore, clock: Option<i64>) -> Result<RecordRepository, TextrackError> {
    let repo = RecordRepository::load(ledger.clone())?;
    Ok(match clock {
        Some(millis) => repo.with_clock(move || millis),
        None => repo,
    })
}

/// A fully wired ledger over an in-memory store.
pub struct TestHarness {
    /// The backing store, shared with `ledger`.
    pub store: MemoryStore,
    pub ledger: LedgerStore,
    /// Session resolved at startup.
    pub session: SessionContext,
    pub repo: RecordRepository,
    pub insight: InsightService,
    /// The provider behind `insight`, for queueing replies and counting calls.
    pub mock_insight: Arc<MockInsight>,
    pub config: TextrackConfig,
    clock: Option<i64>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Reloads session and records from the store, as a fresh start would.
    pub fn restart(&mut self) -> Result<(), TextrackError> {
        self.session = self.ledger.load_or_create_session()?;
        self.repo = load_repo(&self.ledger, self.clock)?;
        Ok(())
    }

    /// Raw persisted value of the records key.
    pub fn persisted_records(&self) -> Result<Option<String>, TextrackError> {
        self.store.get(RECORDS_KEY)
    }
}
