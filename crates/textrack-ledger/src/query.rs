// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search and date-grouping views over the record list.
//!
//! Both are pure functions of their input and preserve its relative order.

use std::collections::HashMap;

use chrono::NaiveDate;

use textrack_core::Record;

/// Label for records whose `entryDate` is not a valid `YYYY-MM-DD` date.
pub const INVALID_DATE_LABEL: &str = "Invalid Date";

/// Records matching `query` case-insensitively in any searched field.
///
/// Searched fields: dori, warpin, bheem and delivery details, id, entry
/// date. An empty query matches everything.
pub fn filter<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let needle = query.to_lowercase();
    records.iter().filter(|r| matches(r, &needle)).collect()
}

/// Returns true when any searched field of `record` contains `needle`.
///
/// `needle` must already be lower-cased.
fn matches(record: &Record, needle: &str) -> bool {
    [
        &record.dori_detail,
        &record.warpin_detail,
        &record.bheem_detail,
        &record.delivery_detail,
        &record.id,
        &record.entry_date,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Records sharing one display date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup<'a> {
    pub label: String,
    pub records: Vec<&'a Record>,
}

/// Buckets records by the long form of their entry date.
///
/// Groups appear in order of first occurrence; within a group records keep
/// their input order.
pub fn group_by_date<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<DateGroup<'a>> {
    let mut groups: Vec<DateGroup<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let label = date_label(&record.entry_date);
        match index.get(&label) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(DateGroup {
                    label,
                    records: vec![record],
                });
            }
        }
    }
    groups
}

/// Formats `YYYY-MM-DD` as e.g. `Monday, January 1, 2024`.
pub fn date_label(entry_date: &str) -> String {
    match NaiveDate::parse_from_str(entry_date.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%A, %B %-d, %Y").to_string(),
        Err(_) => INVALID_DATE_LABEL.to_string(),
    }
}
