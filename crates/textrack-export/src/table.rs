// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tabular projection of the ledger shared by every export format.

use textrack_core::Record;

/// Column headings, in output order.
pub const COLUMNS: [&str; 6] = ["Date", "Batch", "Dori", "Warpin", "Bheem", "Delivery"];

/// A titled table with one row per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTable {
    pub title: String,
    pub rows: Vec<[String; 6]>,
}

impl LedgerTable {
    /// Projects `records` into rows, preserving their order.
    pub fn from_records<'a>(
        title: impl Into<String>,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> Self {
        Self {
            title: title.into(),
            rows: records.into_iter().map(row).collect(),
        }
    }
}

fn row(r: &Record) -> [String; 6] {
    [
        r.entry_date.clone(),
        r.batch_label(),
        r.dori_detail.clone(),
        r.warpin_detail.clone(),
        r.bheem_detail.clone(),
        r.delivery_detail.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record {
            id: id.into(),
            dori_detail: "d".into(),
            warpin_detail: "w".into(),
            bheem_detail: "b".into(),
            delivery_detail: "x".into(),
            entry_date: "2024-01-01".into(),
            created_by: "user_a".into(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn rows_follow_column_order() {
        let records = [record("abc1234")];
        let table = LedgerTable::from_records("Ledger", &records);
        assert_eq!(
            table.rows[0],
            ["2024-01-01", "abc1", "d", "w", "b", "x"].map(String::from)
        );
    }

    #[test]
    fn one_row_per_record_in_order() {
        let records = [record("zzzz999"), record("aaaa111")];
        let table = LedgerTable::from_records("Ledger", &records);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "zzzz");
        assert_eq!(table.rows[1][1], "aaaa");
    }
}
