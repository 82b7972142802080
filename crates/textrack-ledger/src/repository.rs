// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record repository backed by a [`LedgerStore`].
//!
//! Records are kept newest-created first. Every successful mutation writes
//! the full list back to the store before it becomes visible; if the write
//! fails the in-memory list is left as it was.

use std::sync::Arc;

use tracing::{debug, info};

use textrack_core::types::{now_millis, short_id};
use textrack_core::{
    Confirmation, DeleteOutcome, Record, RecordFields, RecordPatch, SessionContext, TextrackError,
};
use textrack_storage::LedgerStore;

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Ordered collection of records with ownership-gated mutation.
pub struct RecordRepository {
    store: LedgerStore,
    records: Vec<Record>,
    clock: Clock,
}

impl RecordRepository {
    /// Loads the persisted records from `store`.
    pub fn load(store: LedgerStore) -> Result<Self, TextrackError> {
        let records = store.load_records()?;
        debug!(count = records.len(), "repository loaded");
        Ok(Self {
            store,
            records,
            clock: Arc::new(now_millis),
        })
    }

    /// Replaces the wall clock (epoch millis) used for timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// All records, most recently created first.
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record if `actor` may modify it.
    ///
    /// Front ends call this before opening an edit form so a locked record
    /// is rejected up front.
    pub fn owned(&self, id: &str, actor: &SessionContext) -> Result<&Record, TextrackError> {
        let record = self.get(id).ok_or_else(|| TextrackError::RecordNotFound {
            id: id.to_string(),
        })?;
        if !actor.owns(record) {
            return Err(TextrackError::PermissionDenied {
                id: id.to_string(),
                actor: actor.session_id.to_string(),
            });
        }
        Ok(record)
    }

    /// Adds a new record owned by `actor` at the front of the list.
    pub fn create(
        &mut self,
        fields: RecordFields,
        actor: &SessionContext,
    ) -> Result<Record, TextrackError> {
        let now = (self.clock)();
        let record = Record {
            id: self.fresh_id(),
            dori_detail: fields.dori_detail,
            warpin_detail: fields.warpin_detail,
            bheem_detail: fields.bheem_detail,
            delivery_detail: fields.delivery_detail,
            entry_date: fields.entry_date,
            created_by: actor.session_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend(self.records.iter().cloned());
        self.commit(next)?;

        info!(id = %record.id, session = %actor.session_id, "record created");
        Ok(record)
    }

    /// Merges the supplied fields of `patch` into an owned record.
    ///
    /// `id`, `createdBy` and `createdAt` never change and the record keeps its
    /// position in the list.
    pub fn update(
        &mut self,
        id: &str,
        patch: &RecordPatch,
        actor: &SessionContext,
    ) -> Result<Record, TextrackError> {
        let current = self.owned(id, actor)?;

        let mut fields = current.fields();
        patch.apply_to(&mut fields);
        let updated = Record {
            dori_detail: fields.dori_detail,
            warpin_detail: fields.warpin_detail,
            bheem_detail: fields.bheem_detail,
            delivery_detail: fields.delivery_detail,
            entry_date: fields.entry_date,
            updated_at: (self.clock)().max(current.created_at),
            ..current.clone()
        };

        let next = self
            .records
            .iter()
            .map(|r| if r.id == id { updated.clone() } else { r.clone() })
            .collect();
        self.commit(next)?;

        info!(id, session = %actor.session_id, "record updated");
        Ok(updated)
    }

    /// Removes an owned record once the user has confirmed.
    ///
    /// Ownership is checked first, so a non-owner is denied whether or not
    /// they confirmed.
    pub fn delete(
        &mut self,
        id: &str,
        actor: &SessionContext,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, TextrackError> {
        let removed = self.owned(id, actor)?.clone();

        if confirmation == Confirmation::Declined {
            debug!(id, "delete not confirmed");
            return Ok(DeleteOutcome::Cancelled);
        }

        let next = self.records.iter().filter(|r| r.id != id).cloned().collect();
        self.commit(next)?;

        info!(id, session = %actor.session_id, "record deleted");
        Ok(DeleteOutcome::Deleted(removed))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = short_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self, next: Vec<Record>) -> Result<(), TextrackError> {
        self.store.save_records(&next)?;
        self.records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textrack_config::CorruptStatePolicy;
    use textrack_core::KeyValueStore;
    use textrack_storage::{MemoryStore, RECORDS_KEY};

    const OWNER: &str = "user_owner01";
    const OTHER: &str = "user_other01";

    fn fields(dori: &str, date: &str) -> RecordFields {
        RecordFields {
            dori_detail: dori.into(),
            warpin_detail: "warp 12".into(),
            bheem_detail: "bheem 3".into(),
            delivery_detail: "truck at 5".into(),
            entry_date: date.into(),
        }
    }

    fn repo(store: &MemoryStore) -> RecordRepository {
        let ledger = LedgerStore::new(Arc::new(store.clone()), CorruptStatePolicy::Fail);
        RecordRepository::load(ledger).unwrap().with_clock(|| 1_000)
    }

    #[test]
    fn create_prepends_and_stamps_owner() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let owner = SessionContext::new(OWNER);

        let first = repo.create(fields("first", "2024-01-01"), &owner).unwrap();
        let second = repo.create(fields("second", "2024-01-02"), &owner).unwrap();

        assert_eq!(repo.list()[0].id, second.id);
        assert_eq!(repo.list()[1].id, first.id);
        assert_eq!(first.created_by, OWNER);
        assert_eq!(first.created_at, 1_000);
        assert_eq!(first.updated_at, 1_000);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn create_persists_full_list() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        repo.create(fields("a", "2024-01-01"), &SessionContext::new(OWNER))
            .unwrap();

        let reloaded = super::tests::repo(&store);
        assert_eq!(reloaded.list(), repo.list());
        assert!(store.get(RECORDS_KEY).unwrap().is_some());
    }

    #[test]
    fn owner_update_merges_and_keeps_identity() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let owner = SessionContext::new(OWNER);
        let created = repo.create(fields("a", "2024-01-01"), &owner).unwrap();
        let mut repo = repo.with_clock(|| 5_000);

        let patch = RecordPatch {
            delivery_detail: Some("delivered".into()),
            ..RecordPatch::default()
        };
        let updated = repo.update(&created.id, &patch, &owner).unwrap();

        assert_eq!(updated.delivery_detail, "delivered");
        assert_eq!(updated.dori_detail, created.dori_detail);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_by, created.created_by);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.updated_at, 5_000);
    }

    #[test]
    fn update_does_not_reorder() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let owner = SessionContext::new(OWNER);
        let older = repo.create(fields("older", "2024-01-01"), &owner).unwrap();
        repo.create(fields("newer", "2024-01-01"), &owner).unwrap();

        repo.update(&older.id, &RecordPatch::default(), &owner).unwrap();
        assert_eq!(repo.list()[1].id, older.id);
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let owner = SessionContext::new(OWNER);
        let created = repo.create(fields("a", "2024-01-01"), &owner).unwrap();

        let mut repo = repo.with_clock(|| 10);
        let updated = repo.update(&created.id, &RecordPatch::default(), &owner).unwrap();
        assert_eq!(updated.updated_at, created.created_at);
    }

    #[test]
    fn non_owner_update_is_denied_without_change() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let created = repo
            .create(fields("a", "2024-01-01"), &SessionContext::new(OWNER))
            .unwrap();
        let before = repo.list().to_vec();
        let writes = store.write_count();

        let patch = RecordPatch {
            dori_detail: Some("hijack".into()),
            ..RecordPatch::default()
        };
        let err = repo
            .update(&created.id, &patch, &SessionContext::new(OTHER))
            .unwrap_err();

        assert!(err.is_permission_denied());
        assert_eq!(repo.list(), before.as_slice());
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn non_owner_delete_is_denied_even_when_confirmed() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let created = repo
            .create(fields("a", "2024-01-01"), &SessionContext::new(OWNER))
            .unwrap();

        let err = repo
            .delete(&created.id, &SessionContext::new(OTHER), Confirmation::Confirmed)
            .unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn unconfirmed_delete_removes_nothing() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let owner = SessionContext::new(OWNER);
        let created = repo.create(fields("a", "2024-01-01"), &owner).unwrap();

        let outcome = repo.delete(&created.id, &owner, Confirmation::Declined).unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn confirmed_delete_removes_exactly_that_record() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let owner = SessionContext::new(OWNER);
        let keep = repo.create(fields("keep", "2024-01-01"), &owner).unwrap();
        let gone = repo.create(fields("gone", "2024-01-01"), &owner).unwrap();

        let outcome = repo.delete(&gone.id, &owner, Confirmation::Confirmed).unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted(gone));
        assert_eq!(repo.list(), &[keep][..]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let mut repo = repo(&store);
        let err = repo
            .update("missing", &RecordPatch::default(), &SessionContext::new(OWNER))
            .unwrap_err();
        assert!(matches!(err, TextrackError::RecordNotFound { .. }));
    }
}
