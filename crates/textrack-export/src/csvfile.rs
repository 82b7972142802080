// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV rendering: a header row followed by one line per record.

use textrack_core::TextrackError;

use crate::table::{COLUMNS, LedgerTable};

pub fn render_csv(table: &LedgerTable) -> Result<Vec<u8>, TextrackError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS).map_err(export_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(export_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| TextrackError::Export(format!("failed to flush CSV: {e}")))
}

fn export_err(e: csv::Error) -> TextrackError {
    TextrackError::Export(format!("failed to write CSV row: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_quoting() {
        let table = LedgerTable {
            title: "ignored".into(),
            rows: vec![[
                "2024-01-01".into(),
                "abc1".into(),
                "40s, combed".into(),
                "w".into(),
                "b".into(),
                "said \"soon\"".into(),
            ]],
        };
        let text = String::from_utf8(render_csv(&table).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Date,Batch,Dori,Warpin,Bheem,Delivery"));
        assert_eq!(
            lines.next(),
            Some(r#"2024-01-01,abc1,"40s, combed",w,b,"said ""soon""""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_table_has_only_header() {
        let table = LedgerTable {
            title: "t".into(),
            rows: vec![],
        };
        let text = String::from_utf8(render_csv(&table).unwrap()).unwrap();
        assert_eq!(text, "Date,Batch,Dori,Warpin,Bheem,Delivery\n");
    }
}
