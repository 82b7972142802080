// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record drafts: field validation and AI-suggestion merging.

use chrono::NaiveDate;

use textrack_core::{Record, RecordFields, RecordPatch, TextrackError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The editable state behind a new-entry or edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub fields: RecordFields,
}

impl RecordDraft {
    /// An empty draft dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            fields: RecordFields {
                entry_date: today.format(DATE_FORMAT).to_string(),
                ..RecordFields::default()
            },
        }
    }

    /// An empty draft dated with the current UTC day.
    pub fn for_today() -> Self {
        Self::new(chrono::Utc::now().date_naive())
    }

    /// A draft prefilled from an existing record, for editing.
    pub fn from_record(record: &Record) -> Self {
        Self {
            fields: record.fields(),
        }
    }

    /// Overwrites the fields supplied by `patch`.
    pub fn apply(&mut self, patch: &RecordPatch) {
        patch.apply_to(&mut self.fields);
    }

    /// Checks every field and returns the trimmed values.
    pub fn validate(&self) -> Result<RecordFields, TextrackError> {
        let f = &self.fields;
        Ok(RecordFields {
            dori_detail: required("doriDetail", &f.dori_detail)?,
            warpin_detail: required("warpinDetail", &f.warpin_detail)?,
            bheem_detail: required("bheemDetail", &f.bheem_detail)?,
            delivery_detail: required("deliveryDetail", &f.delivery_detail)?,
            entry_date: entry_date(&f.entry_date)?,
        })
    }
}

/// Validates only the fields an edit supplies.
pub fn validate_patch(patch: &RecordPatch) -> Result<RecordPatch, TextrackError> {
    let check = |field, value: &Option<String>| value.as_deref().map(|v| required(field, v)).transpose();
    Ok(RecordPatch {
        dori_detail: check("doriDetail", &patch.dori_detail)?,
        warpin_detail: check("warpinDetail", &patch.warpin_detail)?,
        bheem_detail: check("bheemDetail", &patch.bheem_detail)?,
        delivery_detail: check("deliveryDetail", &patch.delivery_detail)?,
        entry_date: patch.entry_date.as_deref().map(entry_date).transpose()?,
    })
}

fn required(field: &'static str, value: &str) -> Result<String, TextrackError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TextrackError::InvalidRecord {
            field,
            message: "is required".to_string(),
        });
    }
    Ok(value.to_string())
}

fn entry_date(value: &str) -> Result<String, TextrackError> {
    let value = required("entryDate", value)?;
    let date = NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|e| {
        TextrackError::InvalidRecord {
            field: "entryDate",
            message: format!("`{value}` is not a YYYY-MM-DD date ({e})"),
        }
    })?;
    Ok(date.format(DATE_FORMAT).to_string())
}
