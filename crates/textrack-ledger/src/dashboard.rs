// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Headline counters shown above the ledger.

use textrack_core::{Record, SessionContext};

/// Summary cards: total batches, active stocks, recent updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    pub total_batches: usize,
    /// Every batch in the ledger counts as active stock.
    pub active_stocks: usize,
    /// `"Today"` when the ledger has entries, `"None"` otherwise.
    pub recent_updates: &'static str,
    /// Records the current session may edit.
    pub owned: usize,
}

impl LedgerSummary {
    pub fn from_records(records: &[Record], session: &SessionContext) -> Self {
        Self {
            total_batches: records.len(),
            active_stocks: records.len(),
            recent_updates: if records.is_empty() { "None" } else { "Today" },
            owned: records.iter().filter(|r| session.owns(r)).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner: &str) -> Record {
        Record {
            id: "abc1234".into(),
            dori_detail: "d".into(),
            warpin_detail: "w".into(),
            bheem_detail: "b".into(),
            delivery_detail: "x".into(),
            entry_date: "2024-01-01".into(),
            created_by: owner.into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn empty_ledger() {
        let summary = LedgerSummary::from_records(&[], &SessionContext::new("user_a"));
        assert_eq!(summary.total_batches, 0);
        assert_eq!(summary.recent_updates, "None");
    }

    #[test]
    fn counts_all_and_owned() {
        let records = [record("user_a"), record("user_b"), record("user_a")];
        let summary = LedgerSummary::from_records(&records, &SessionContext::new("user_a"));
        assert_eq!(summary.total_batches, 3);
        assert_eq!(summary.active_stocks, 3);
        assert_eq!(summary.recent_updates, "Today");
        assert_eq!(summary.owned, 2);
    }
}
