// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Export of the (filtered) ledger as a PDF or CSV table.

pub mod csvfile;
pub mod pdf;
pub mod table;

use std::path::Path;

use strum::{Display, EnumString};
use tracing::info;

use textrack_core::{Record, TextrackError};

pub use csvfile::render_csv;
pub use pdf::render_pdf;
pub use table::{COLUMNS, LedgerTable};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Csv,
}

impl ExportFormat {
    pub fn render(self, table: &LedgerTable) -> Result<Vec<u8>, TextrackError> {
        match self {
            Self::Pdf => render_pdf(table),
            Self::Csv => render_csv(table),
        }
    }

    /// Guesses the format from a file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

/// Renders `records` under `title` and writes the document to `path`.
///
/// Returns the number of rows written.
pub fn export_records<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    title: &str,
    format: ExportFormat,
    path: &Path,
) -> Result<usize, TextrackError> {
    let table = LedgerTable::from_records(title, records);
    let bytes = format.render(&table)?;
    std::fs::write(path, bytes)
        .map_err(|e| TextrackError::Export(format!("failed to write {}: {e}", path.display())))?;
    info!(path = %path.display(), %format, rows = table.rows.len(), "ledger exported");
    Ok(table.rows.len())
}
