// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction and lenient parsing of model replies.

use serde_json::Value;

use textrack_core::{Record, RecordPatch, TextrackError};

use crate::types::GenerateContentRequest;

const ANALYST_INSTRUCTION: &str = "You are an operations analyst for a small textile workshop. \
Batches move through dori (thread), warpin (warping), bheem (beam) and delivery stages. \
Reply in plain text, at most five short sentences.";

const EXTRACTOR_INSTRUCTION: &str = "Extract ledger fields from a workshop note. \
Reply with one JSON object using only the keys doriDetail, warpinDetail, bheemDetail, \
deliveryDetail and entryDate (YYYY-MM-DD). Omit keys the note does not mention.";

/// Request summarizing the whole ledger.
pub fn analysis_request(records: &[Record]) -> GenerateContentRequest {
    let mut body = String::from("Summarize stock levels, delays and anything unusual in these batches:\n");
    if records.is_empty() {
        body.push_str("(no batches recorded)\n");
    }
    for r in records {
        body.push_str(&format!(
            "- {} [{}] dori: {}; warpin: {}; bheem: {}; delivery: {}\n",
            r.entry_date,
            r.batch_label(),
            r.dori_detail,
            r.warpin_detail,
            r.bheem_detail,
            r.delivery_detail
        ));
    }
    GenerateContentRequest::user_text(body).with_system(ANALYST_INSTRUCTION)
}

/// Request extracting record fields from a free-text note.
pub fn suggestion_request(note: &str) -> GenerateContentRequest {
    GenerateContentRequest::user_text(format!("Note: {note}"))
        .with_system(EXTRACTOR_INSTRUCTION)
        .expect_json()
}

/// Parses a model reply into a patch.
///
/// Accepts a bare object or one wrapped in a Markdown code fence. Unknown
/// keys are ignored, numbers are kept as text and other value types are
/// skipped.
pub fn parse_suggestion(reply: &str) -> Result<RecordPatch, TextrackError> {
    let json = strip_code_fence(reply);
    let value: Value = serde_json::from_str(json).map_err(|e| TextrackError::AiUnavailable {
        message: format!("suggestion is not valid JSON: {e}"),
        source: Some(Box::new(e)),
    })?;
    let Value::Object(map) = value else {
        return Err(TextrackError::AiUnavailable {
            message: "suggestion is not a JSON object".into(),
            source: None,
        });
    };

    let field = |key: &str| match map.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Ok(RecordPatch {
        dori_detail: field("doriDetail"),
        warpin_detail: field("warpinDetail"),
        bheem_detail: field("bheemDetail"),
        delivery_detail: field("deliveryDetail"),
        entry_date: field("entryDate"),
    }
    .without_blanks())
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
