// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot ledger commands shared by the CLI and the shell.

use std::path::PathBuf;

use clap::Args;
use colored::{ColoredString, Colorize};

use textrack_core::{
    Confirmation, DeleteOutcome, Record, RecordPatch, SessionContext, TextrackError,
};
use textrack_export::{ExportFormat, export_records};
use textrack_ledger::form::validate_patch;
use textrack_ledger::{LedgerSummary, RecordDraft, filter, group_by_date};

use crate::app::App;

/// Record fields settable from the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Dori (thread) detail.
    #[arg(long)]
    pub dori: Option<String>,
    /// Warpin (warping) detail.
    #[arg(long)]
    pub warpin: Option<String>,
    /// Bheem (beam) detail.
    #[arg(long)]
    pub bheem: Option<String>,
    /// Delivery detail.
    #[arg(long)]
    pub delivery: Option<String>,
    /// Entry date; defaults to today for new records.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,
    /// Free-text note; the AI fills in any field not given explicitly.
    #[arg(long)]
    pub note: Option<String>,
}

impl FieldArgs {
    pub fn patch(&self) -> RecordPatch {
        RecordPatch {
            dori_detail: self.dori.clone(),
            warpin_detail: self.warpin.clone(),
            bheem_detail: self.bheem.clone(),
            delivery_detail: self.delivery.clone(),
            entry_date: self.date.clone(),
        }
    }
}

/// Export destination and format.
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Only export records matching this search.
    #[arg(long, short)]
    pub search: Option<String>,
    /// Output format; inferred from the file extension when omitted.
    #[arg(long)]
    pub format: Option<ExportFormat>,
    /// Output file (defaults to `export.output_path`).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Creates a record from `args`, letting the AI fill fields from `--note`.
pub async fn add(app: &mut App, args: &FieldArgs) -> Result<Record, TextrackError> {
    let mut draft = RecordDraft::for_today();
    if let Some(suggested) = suggestion(app, args.note.as_deref()).await? {
        draft.apply(&suggested);
    }
    draft.apply(&args.patch());
    let fields = draft.validate()?;
    app.repo.create(fields, &app.session)
}

/// Edits an owned record.
///
/// Only the fields given as flags or suggested from `--note` change, and
/// only those are validated. Flags win over the suggestion.
pub async fn edit(app: &mut App, id: &str, args: &FieldArgs) -> Result<Record, TextrackError> {
    app.repo.owned(id, &app.session)?;
    let suggested = suggestion(app, args.note.as_deref()).await?.unwrap_or_default();
    let patch = validate_patch(&overlay(suggested, args.patch()))?;
    if patch.is_empty() {
        return Ok(app.repo.owned(id, &app.session)?.clone());
    }
    app.repo.update(id, &patch, &app.session)
}

/// Fields set in `top`, falling back to `base`.
fn overlay(base: RecordPatch, top: RecordPatch) -> RecordPatch {
    RecordPatch {
        dori_detail: top.dori_detail.or(base.dori_detail),
        warpin_detail: top.warpin_detail.or(base.warpin_detail),
        bheem_detail: top.bheem_detail.or(base.bheem_detail),
        delivery_detail: top.delivery_detail.or(base.delivery_detail),
        entry_date: top.entry_date.or(base.entry_date),
    }
}

/// Deletes an owned record after `confirm` approves it.
///
/// A record owned by another session is rejected before `confirm` runs.
pub fn delete(
    app: &mut App,
    id: &str,
    confirm: impl FnOnce(&Record) -> bool,
) -> Result<DeleteOutcome, TextrackError> {
    let record = app.repo.owned(id, &app.session)?;
    let confirmation = Confirmation::from(confirm(record));
    app.repo.delete(id, &app.session, confirmation)
}

/// Writes the records matching `search` to a PDF or CSV file.
pub fn export(app: &App, args: &ExportArgs) -> Result<(PathBuf, usize), TextrackError> {
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&app.config.export.output_path));
    let format = args
        .format
        .or_else(|| ExportFormat::from_path(&path))
        .unwrap_or_default();
    let records = filter(app.repo.list(), args.search.as_deref().unwrap_or(""));
    let rows = export_records(records, &app.config.export.title, format, &path)?;
    Ok((path, rows))
}

async fn suggestion(app: &App, note: Option<&str>) -> Result<Option<RecordPatch>, TextrackError> {
    let Some(note) = note else {
        return Ok(None);
    };
    let suggested = app.insight.suggest(note).await?;
    match &suggested {
        Some(patch) => {
            eprintln!("{}", format!("AI suggestion: {}", describe_patch(patch)).dimmed());
        }
        None => eprintln!("{}", "No AI suggestion for that note.".dimmed()),
    }
    Ok(suggested)
}

/// One-line summary of the fields a patch sets.
pub fn describe_patch(patch: &RecordPatch) -> String {
    let parts: Vec<String> = [
        ("dori", &patch.dori_detail),
        ("warpin", &patch.warpin_detail),
        ("bheem", &patch.bheem_detail),
        ("delivery", &patch.delivery_detail),
        ("date", &patch.entry_date),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name}={v}")))
    .collect();
    if parts.is_empty() {
        "(nothing)".to_string()
    } else {
        parts.join(", ")
    }
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// The dashboard line shown above a listing.
pub fn render_summary(summary: &LedgerSummary, color: bool) -> String {
    format!(
        "{} {}   {} {}   {} {}",
        paint("Total Batches", color, |s| s.dimmed()),
        summary.total_batches,
        paint("Active Stocks", color, |s| s.dimmed()),
        summary.active_stocks,
        paint("Recent Updates", color, |s| s.dimmed()),
        summary.recent_updates,
    )
}

/// Summary plus the matching records grouped by entry date.
pub fn render_listing(
    all: &[Record],
    search: &str,
    session: &SessionContext,
    color: bool,
) -> String {
    let mut out = render_summary(&LedgerSummary::from_records(all, session), color);
    out.push('\n');

    let matches = filter(all, search);
    if matches.is_empty() {
        let note = if all.is_empty() {
            "No records yet."
        } else {
            "No records match your search."
        };
        out.push('\n');
        out.push_str(note);
        out.push('\n');
        return out;
    }

    for group in group_by_date(matches) {
        out.push('\n');
        out.push_str(&paint(&group.label, color, |s| s.bold()));
        out.push('\n');
        for record in group.records {
            out.push_str(&render_record(record, session, color));
            out.push('\n');
        }
    }
    out
}

/// One listing row: `#` plus the upper-cased batch label, the four details,
/// then either the full id (needed for `edit`/`delete`) or, on rows owned by
/// another session, the owner's id tail and "View Only".
fn render_record(record: &Record, session: &SessionContext, color: bool) -> String {
    let batch = format!("#{}", record.batch_label().to_uppercase());
    let marker = if session.owns(record) {
        format!("  {}", paint(&format!("[{}]", record.id), color, |s| s.dimmed()))
    } else {
        format!(
            "  {} {}",
            paint(&owner_tail(&record.created_by), color, |s| s.dimmed()),
            paint("View Only", color, |s| s.yellow())
        )
    };
    format!(
        "  {}  Dori: {} | Warpin: {} | Bheem: {} | Delivery: {}{marker}",
        paint(&batch, color, |s| s.cyan()),
        record.dori_detail,
        record.warpin_detail,
        record.bheem_detail,
        record.delivery_detail,
    )
}

/// Last six characters of an owner id.
fn owner_tail(created_by: &str) -> String {
    let skip = created_by.chars().count().saturating_sub(6);
    created_by.chars().skip(skip).collect()
}

/// Pretty JSON array of the records matching `search`.
pub fn render_json(all: &[Record], search: &str) -> Result<String, TextrackError> {
    serde_json::to_string_pretty(&filter(all, search))
        .map_err(|e| TextrackError::Internal(format!("failed to encode records: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use textrack_test_utils::{MockInsight, TestHarness};

    const ME: &str = "user_me00001";

    fn record(id: &str, owner: &str, date: &str) -> Record {
        Record {
            id: id.into(),
            dori_detail: "1000m cotton".into(),
            warpin_detail: "warp 12".into(),
            bheem_detail: "beam 3".into(),
            delivery_detail: "friday".into(),
            entry_date: date.into(),
            created_by: owner.into(),
            created_at: 1,
            updated_at: 1,
        }
    }

    fn app(harness: TestHarness) -> App {
        App {
            config: harness.config,
            session: harness.session,
            repo: harness.repo,
            insight: harness.insight,
        }
    }

    fn full_args() -> FieldArgs {
        FieldArgs {
            dori: Some("dori".into()),
            warpin: Some("warp".into()),
            bheem: Some("beam".into()),
            delivery: Some("ship".into()),
            date: Some("2024-04-01".into()),
            note: None,
        }
    }

    #[tokio::test]
    async fn add_uses_explicit_fields() {
        let mut app = app(TestHarness::builder().with_session(ME).build().unwrap());
        let created = add(&mut app, &full_args()).await.unwrap();
        assert_eq!(created.created_by, ME);
        assert_eq!(created.entry_date, "2024-04-01");
        assert_eq!(app.repo.len(), 1);
    }

    #[tokio::test]
    async fn add_fills_missing_fields_from_note() {
        let mock = MockInsight::new();
        mock.push_suggestion(RecordPatch {
            dori_detail: Some("from ai".into()),
            warpin_detail: Some("ai warp".into()),
            ..RecordPatch::default()
        })
        .await;
        let mut app = app(TestHarness::builder().with_insight(mock).build().unwrap());

        let args = FieldArgs {
            warpin: Some("typed warp".into()),
            bheem: Some("beam".into()),
            delivery: Some("ship".into()),
            note: Some("ai please".into()),
            ..FieldArgs::default()
        };
        let created = add(&mut app, &args).await.unwrap();
        assert_eq!(created.dori_detail, "from ai");
        assert_eq!(created.warpin_detail, "typed warp");
    }

    #[tokio::test]
    async fn add_with_missing_field_is_rejected() {
        let mut app = app(TestHarness::builder().build().unwrap());
        let args = FieldArgs {
            dori: Some("only dori".into()),
            ..FieldArgs::default()
        };
        let err = add(&mut app, &args).await.unwrap_err();
        assert!(matches!(err, TextrackError::InvalidRecord { .. }));
        assert!(app.repo.is_empty());
    }

    #[tokio::test]
    async fn edit_of_locked_record_is_denied_before_ai_call() {
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![record("abc1234", "user_someone", "2024-01-01")])
            .build()
            .unwrap();
        let mock = harness.mock_insight.clone();
        let mut app = app(harness);

        let args = FieldArgs {
            note: Some("anything".into()),
            ..FieldArgs::default()
        };
        let err = edit(&mut app, "abc1234", &args).await.unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(mock.suggest_calls(), 0);
    }

    #[tokio::test]
    async fn edit_keeps_unspecified_fields() {
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![record("abc1234", ME, "2024-01-01")])
            .build()
            .unwrap();
        let mut app = app(harness);

        let args = FieldArgs {
            delivery: Some("monday".into()),
            ..FieldArgs::default()
        };
        let updated = edit(&mut app, "abc1234", &args).await.unwrap();
        assert_eq!(updated.delivery_detail, "monday");
        assert_eq!(updated.dori_detail, "1000m cotton");
    }

    #[tokio::test]
    async fn edit_validates_only_supplied_fields() {
        let mut legacy = record("abc1234", ME, "2024-01-01");
        legacy.entry_date = "01/02/2024".into();
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![legacy])
            .build()
            .unwrap();
        let mut app = app(harness);

        let args = FieldArgs {
            delivery: Some("  monday ".into()),
            ..FieldArgs::default()
        };
        let updated = edit(&mut app, "abc1234", &args).await.unwrap();
        assert_eq!(updated.delivery_detail, "monday");
        assert_eq!(updated.entry_date, "01/02/2024");
    }

    #[tokio::test]
    async fn edit_with_blank_field_is_rejected() {
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![record("abc1234", ME, "2024-01-01")])
            .build()
            .unwrap();
        let mut app = app(harness);

        let args = FieldArgs {
            bheem: Some("   ".into()),
            ..FieldArgs::default()
        };
        let err = edit(&mut app, "abc1234", &args).await.unwrap_err();
        assert!(matches!(err, TextrackError::InvalidRecord { field: "bheemDetail", .. }));
        assert_eq!(app.repo.get("abc1234").unwrap().bheem_detail, "beam 3");
    }

    #[tokio::test]
    async fn edit_flags_win_over_suggestion() {
        let mock = MockInsight::new();
        mock.push_suggestion(RecordPatch {
            dori_detail: Some("ai dori".into()),
            delivery_detail: Some("ai delivery".into()),
            ..RecordPatch::default()
        })
        .await;
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![record("abc1234", ME, "2024-01-01")])
            .with_insight(mock)
            .build()
            .unwrap();
        let mut app = app(harness);

        let args = FieldArgs {
            delivery: Some("typed delivery".into()),
            note: Some("note".into()),
            ..FieldArgs::default()
        };
        let updated = edit(&mut app, "abc1234", &args).await.unwrap();
        assert_eq!(updated.dori_detail, "ai dori");
        assert_eq!(updated.delivery_detail, "typed delivery");
        assert_eq!(updated.warpin_detail, "warp 12");
    }

    #[tokio::test]
    async fn edit_without_changes_writes_nothing() {
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![record("abc1234", ME, "2024-01-01")])
            .build()
            .unwrap();
        let writes = harness.store.write_count();
        let store = harness.store.clone();
        let mut app = app(harness);

        let unchanged = edit(&mut app, "abc1234", &FieldArgs::default()).await.unwrap();
        assert_eq!(unchanged, record("abc1234", ME, "2024-01-01"));
        assert_eq!(store.write_count(), writes);
    }

    #[test]
    fn delete_of_locked_record_never_prompts() {
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![record("abc1234", "user_someone", "2024-01-01")])
            .build()
            .unwrap();
        let mut app = app(harness);

        let mut prompted = false;
        let err = delete(&mut app, "abc1234", |_| {
            prompted = true;
            true
        })
        .unwrap_err();
        assert!(err.is_permission_denied());
        assert!(!prompted);
    }

    #[test]
    fn declined_delete_keeps_record() {
        let harness = TestHarness::builder()
            .with_session(ME)
            .with_records(vec![record("abc1234", ME, "2024-01-01")])
            .build()
            .unwrap();
        let mut app = app(harness);

        let outcome = delete(&mut app, "abc1234", |_| false).unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(app.repo.len(), 1);
    }

    #[test]
    fn export_defaults_to_pdf_and_honours_search() {
        let dir = tempfile::tempdir().unwrap();
        let harness = TestHarness::builder()
            .with_records(vec![
                record("abc1234", ME, "2024-01-01"),
                {
                    let mut r = record("zzz9999", ME, "2024-01-02");
                    r.dori_detail = "silk".into();
                    r
                },
            ])
            .build()
            .unwrap();
        let app = app(harness);

        let args = ExportArgs {
            search: Some("SILK".into()),
            format: None,
            output: Some(dir.path().join("out.csv")),
        };
        let (path, rows) = export(&app, &args).unwrap();
        assert_eq!(rows, 1);
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("zzz9,silk"));

        let args = ExportArgs {
            output: Some(dir.path().join("ledger")),
            ..ExportArgs::default()
        };
        let (path, rows) = export(&app, &args).unwrap();
        assert_eq!(rows, 2);
        assert!(std::fs::read(path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn listing_groups_and_marks_locked_records() {
        let records = vec![
            record("aaa1111", ME, "2024-01-01"),
            record("bbb2222", "user_other", "2024-01-02"),
        ];
        let session = SessionContext::new(ME);
        let text = render_listing(&records, "", &session, false);

        assert!(text.starts_with("Total Batches 2   Active Stocks 2   Recent Updates Today"));
        assert!(text.contains("Monday, January 1, 2024\n  #AAA1  Dori: 1000m cotton"));
        assert!(text.contains("Tuesday, January 2, 2024\n  #BBB2  Dori:"));
        assert!(text.contains("Delivery: friday  [aaa1111]\n"));
        assert!(text.contains("Delivery: friday  _other View Only\n"));
        assert_eq!(text.matches("View Only").count(), 1);
    }

    #[test]
    fn owner_tail_keeps_last_six_chars() {
        assert_eq!(owner_tail("user_k3x9q1z"), "3x9q1z");
        assert_eq!(owner_tail("abc"), "abc");
    }

    #[test]
    fn listing_explains_empty_results() {
        let session = SessionContext::new(ME);
        assert!(render_listing(&[], "", &session, false).contains("No records yet."));
        let records = vec![record("aaa1111", ME, "2024-01-01")];
        assert!(render_listing(&records, "nomatch", &session, false).contains("No records match"));
    }

    #[test]
    fn json_listing_uses_storage_field_names() {
        let records = vec![record("aaa1111", ME, "2024-01-01")];
        let json = render_json(&records, "").unwrap();
        assert!(json.contains("\"doriDetail\""));
        assert!(json.contains("\"createdBy\""));
    }

    #[test]
    fn patch_description_lists_set_fields() {
        let patch = RecordPatch {
            bheem_detail: Some("beam 2".into()),
            entry_date: Some("2024-01-01".into()),
            ..RecordPatch::default()
        };
        assert_eq!(describe_patch(&patch), "bheem=beam 2, date=2024-01-01");
        assert_eq!(describe_patch(&RecordPatch::default()), "(nothing)");
    }
}
