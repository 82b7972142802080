// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PDF rendering of a [`LedgerTable`] on A4 portrait pages.
//!
//! Uses the built-in Helvetica faces so no font files are embedded. Rows
//! that do not fit on a page continue on the next one under a repeated
//! header; cell text is truncated to its column width.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::debug;

use textrack_core::TextrackError;

use crate::table::{COLUMNS, LedgerTable};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 14.0;
const TITLE_Y: f32 = PAGE_HEIGHT - 20.0;
const HEADER_Y: f32 = PAGE_HEIGHT - 30.0;
const BOTTOM_MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 7.0;

const TITLE_SIZE: f32 = 16.0;
const CELL_SIZE: f32 = 9.0;

/// Column widths in millimetres; they sum to the printable width.
const COLUMN_WIDTHS: [f32; 6] = [24.0, 14.0, 36.0, 36.0, 36.0, 36.0];

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

pub(crate) fn rows_per_page() -> usize {
    ((HEADER_Y - ROW_HEIGHT - BOTTOM_MARGIN) / ROW_HEIGHT) as usize
}

/// Renders `table` to PDF bytes.
pub fn render_pdf(table: &LedgerTable) -> Result<Vec<u8>, TextrackError> {
    let (doc, page, layer) =
        PdfDocument::new(&table.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| TextrackError::Export(format!("failed to load font: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| TextrackError::Export(format!("failed to load font: {e}")))?;

    let first = doc.get_page(page).get_layer(layer);
    first.use_text(&table.title, TITLE_SIZE, Mm(MARGIN_X), Mm(TITLE_Y), &bold);

    let chunk = rows_per_page();
    let mut pages = 1;
    let mut current = first;
    draw_row(&current, &COLUMNS.map(String::from), HEADER_Y, &bold);

    for (i, row) in table.rows.iter().enumerate() {
        let slot = i % chunk;
        if i > 0 && slot == 0 {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(page).get_layer(layer);
            draw_row(&current, &COLUMNS.map(String::from), HEADER_Y, &bold);
            pages += 1;
        }
        let y = HEADER_Y - ROW_HEIGHT * (slot as f32 + 1.0);
        draw_row(&current, row, y, &regular);
    }

    let mut out = BufWriter::new(Vec::new());
    doc.save(&mut out)
        .map_err(|e| TextrackError::Export(format!("failed to serialize PDF: {e}")))?;
    let bytes = out
        .into_inner()
        .map_err(|e| TextrackError::Export(format!("failed to flush PDF: {e}")))?;

    debug!(rows = table.rows.len(), pages, bytes = bytes.len(), "pdf rendered");
    Ok(bytes)
}

fn draw_row(layer: &PdfLayerReference, cells: &[String; 6], y: f32, font: &IndirectFontRef) {
    let mut x = MARGIN_X;
    for (cell, width) in cells.iter().zip(COLUMN_WIDTHS) {
        let text = clip(cell, max_chars(width));
        if !text.is_empty() {
            layer.use_text(text, CELL_SIZE, Mm(x), Mm(y), font);
        }
        x += width;
    }
}

fn max_chars(width_mm: f32) -> usize {
    let glyph = CELL_SIZE * AVG_GLYPH_EM * PT_TO_MM;
    ((width_mm - 2.0) / glyph).max(1.0) as usize
}

/// Truncates `text` to `max` characters, marking the cut with `...`.
pub(crate) fn clip(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
