// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session and record persistence on top of a [`KeyValueStore`].
//!
//! The record list is stored as one JSON array under [`RECORDS_KEY`] and is
//! rewritten in full on every mutation. The anonymous session id lives under
//! [`SESSION_KEY`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use textrack_config::CorruptStatePolicy;
use textrack_core::{KeyValueStore, Record, SessionContext, SessionId, TextrackError};

/// Key holding the anonymous session identifier.
pub const SESSION_KEY: &str = "textrack_user_id";

/// Key holding the JSON array of records.
pub const RECORDS_KEY: &str = "textrack_records_simplified_v2";

/// Suffix of the key that preserves an unparseable records value.
const CORRUPT_SUFFIX: &str = ".corrupt";

/// Typed access to the ledger's two persisted keys.
#[derive(Clone)]
pub struct LedgerStore {
    store: Arc<dyn KeyValueStore>,
    on_corrupt: CorruptStatePolicy,
}

impl LedgerStore {
    pub fn new(store: Arc<dyn KeyValueStore>, on_corrupt: CorruptStatePolicy) -> Self {
        Self { store, on_corrupt }
    }

    /// Returns the persisted session, generating and saving one on first run.
    pub fn load_or_create_session(&self) -> Result<SessionContext, TextrackError> {
        if let Some(id) = self.store.get(SESSION_KEY)? {
            let id = id.trim();
            if !id.is_empty() {
                debug!(session = id, "session loaded");
                return Ok(SessionContext::new(id));
            }
        }

        let session_id = SessionId::generate();
        self.store.set(SESSION_KEY, session_id.as_str())?;
        info!(session = %session_id, "new session created");
        Ok(SessionContext { session_id })
    }

    /// Loads the persisted record list, newest first.
    ///
    /// A missing or blank value is an empty ledger. Malformed JSON is handled
    /// according to the configured [`CorruptStatePolicy`].
    pub fn load_records(&self) -> Result<Vec<Record>, TextrackError> {
        let Some(raw) = self.store.get(RECORDS_KEY)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Record>>(&raw) {
            Ok(records) => {
                debug!(count = records.len(), "records loaded");
                Ok(records)
            }
            Err(e) => match self.on_corrupt {
                CorruptStatePolicy::Fail => Err(TextrackError::MalformedState {
                    key: RECORDS_KEY.to_string(),
                    source: Box::new(e),
                }),
                CorruptStatePolicy::Reset => {
                    let backup = format!("{RECORDS_KEY}{CORRUPT_SUFFIX}");
                    self.store.set(&backup, &raw)?;
                    warn!(
                        error = %e,
                        backup = %backup,
                        "persisted records are malformed, starting with an empty ledger"
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Persists the full record list.
    pub fn save_records(&self, records: &[Record]) -> Result<(), TextrackError> {
        let json = serde_json::to_string(records).map_err(TextrackError::storage)?;
        self.store.set(RECORDS_KEY, &json)?;
        debug!(count = records.len(), "records saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use tracing_test::traced_test;

    fn record(id: &str) -> Record {
        Record {
            id: id.into(),
            dori_detail: "dori".into(),
            warpin_detail: "warpin".into(),
            bheem_detail: "bheem".into(),
            delivery_detail: "delivery".into(),
            entry_date: "2024-01-01".into(),
            created_by: "user_owner01".into(),
            created_at: 1,
            updated_at: 1,
        }
    }

    fn ledger(store: &MemoryStore, policy: CorruptStatePolicy) -> LedgerStore {
        LedgerStore::new(Arc::new(store.clone()), policy)
    }

    #[test]
    fn session_is_generated_once_and_reused() {
        let store = MemoryStore::new();
        let ledger = ledger(&store, CorruptStatePolicy::Reset);

        let first = ledger.load_or_create_session().unwrap();
        let second = ledger.load_or_create_session().unwrap();
        assert_eq!(first, second);
        assert!(first.session_id.as_str().starts_with("user_"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn blank_session_is_replaced() {
        let store = MemoryStore::with_entries([(SESSION_KEY, "  ")]);
        let session = ledger(&store, CorruptStatePolicy::Reset)
            .load_or_create_session()
            .unwrap();
        assert!(session.session_id.as_str().starts_with("user_"));
        assert_eq!(
            store.get(SESSION_KEY).unwrap().as_deref(),
            Some(session.session_id.as_str())
        );
    }

    #[test]
    fn records_round_trip_through_store() {
        let store = MemoryStore::new();
        let ledger = ledger(&store, CorruptStatePolicy::Reset);
        let records = vec![record("bbbbbbb"), record("aaaaaaa")];

        ledger.save_records(&records).unwrap();
        assert_eq!(ledger.load_records().unwrap(), records);
    }

    #[test]
    fn missing_or_blank_records_are_empty() {
        let store = MemoryStore::new();
        assert!(ledger(&store, CorruptStatePolicy::Fail).load_records().unwrap().is_empty());

        let blank = MemoryStore::with_entries([(RECORDS_KEY, "")]);
        assert!(ledger(&blank, CorruptStatePolicy::Fail).load_records().unwrap().is_empty());
    }

    #[test]
    fn persisted_json_uses_camel_case_keys() {
        let store = MemoryStore::new();
        ledger(&store, CorruptStatePolicy::Reset)
            .save_records(&[record("abc1234")])
            .unwrap();
        let raw = store.get(RECORDS_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"doriDetail\":\"dori\""));
        assert!(raw.contains("\"createdBy\":\"user_owner01\""));
    }

    #[test]
    fn corrupt_records_fail_under_fail_policy() {
        let store = MemoryStore::with_entries([(RECORDS_KEY, "{not json")]);
        let err = ledger(&store, CorruptStatePolicy::Fail).load_records().unwrap_err();
        assert!(matches!(err, TextrackError::MalformedState { ref key, .. } if key == RECORDS_KEY));
    }

    #[test]
    #[traced_test]
    fn corrupt_records_reset_and_keep_backup() {
        let store = MemoryStore::with_entries([(RECORDS_KEY, "{not json")]);
        let records = ledger(&store, CorruptStatePolicy::Reset).load_records().unwrap();

        assert!(records.is_empty());
        assert_eq!(
            store.get("textrack_records_simplified_v2.corrupt").unwrap().as_deref(),
            Some("{not json")
        );
        assert!(logs_contain("persisted records are malformed"));
    }
}
