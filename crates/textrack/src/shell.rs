// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `textrack shell` command implementation.
//!
//! An interactive REPL over the ledger with readline history. A search
//! typed with `search` stays active for `list` and `export` until cleared,
//! like the search box of a ledger screen.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use textrack_core::{DeleteOutcome, RecordPatch, TextrackError};
use textrack_ledger::RecordDraft;

use crate::app::App;
use crate::commands::{self, ExportArgs};

/// A parsed shell input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Add,
    Edit(String),
    Delete(String),
    Analyze,
    Export(Option<String>),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match (word.to_ascii_lowercase().as_str(), rest) {
        ("", _) => ShellCommand::Empty,
        ("list" | "ls", _) => ShellCommand::List,
        ("search" | "find", q) => ShellCommand::Search(q.to_string()),
        ("add" | "new", _) => ShellCommand::Add,
        ("edit", id) if !id.is_empty() => ShellCommand::Edit(id.to_string()),
        ("delete" | "rm", id) if !id.is_empty() => ShellCommand::Delete(id.to_string()),
        ("analyze" | "insight", _) => ShellCommand::Analyze,
        ("export", path) => ShellCommand::Export((!path.is_empty()).then(|| path.to_string())),
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "/quit" | "/exit", _) => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

const HELP: &str = "\
  list               show records (filtered by the active search)
  search [text]      set or clear the search
  add                new record, optionally filled in by AI from a note
  edit <id>          edit one of your records
  delete <id>        delete one of your records
  analyze            AI summary of the whole ledger
  export [file]      export the filtered records (pdf or csv)
  quit               leave the shell";

/// Runs the `textrack shell` interactive REPL.
pub async fn run_shell(mut app: App) -> Result<(), TextrackError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| TextrackError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "textrack shell".bold().green());
    println!(
        "Signed in as {}. Type {} for commands, {} to exit.\n",
        app.session.session_id.to_string().cyan(),
        "help".yellow(),
        "quit".yellow()
    );

    let mut search = String::new();
    let prompt = format!("{}> ", "textrack".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        let _ = rl.add_history_entry(&line);

        let command = parse_command(&line);
        debug!(?command, "shell command");
        let result = match command {
            ShellCommand::Empty => Ok(()),
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("{HELP}");
                Ok(())
            }
            ShellCommand::List => {
                print!("{}", commands::render_listing(app.repo.list(), &search, &app.session, true));
                Ok(())
            }
            ShellCommand::Search(q) => {
                search = q;
                if search.is_empty() {
                    println!("{}", "Search cleared.".dimmed());
                } else {
                    println!("{}", format!("Searching for \"{search}\".").dimmed());
                }
                Ok(())
            }
            ShellCommand::Add => add(&mut rl, &mut app).await,
            ShellCommand::Edit(id) => edit(&mut rl, &mut app, &id).await,
            ShellCommand::Delete(id) => delete(&mut rl, &mut app, &id),
            ShellCommand::Analyze => analyze(&app).await,
            ShellCommand::Export(path) => {
                let args = ExportArgs {
                    search: Some(search.clone()),
                    format: None,
                    output: path.map(Into::into),
                };
                commands::export(&app, &args).map(|(path, rows)| {
                    println!("Exported {rows} record(s) to {}", path.display());
                })
            }
            ShellCommand::Unknown(text) => {
                println!("Unknown command `{text}`. Type {} for commands.", "help".yellow());
                Ok(())
            }
        };

        if let Err(e) = result {
            report(&e);
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn report(e: &TextrackError) {
    match e {
        TextrackError::PermissionDenied { .. } => {
            eprintln!("{}", "Permission denied. This record is locked to another session.".yellow());
        }
        TextrackError::InvalidRecord { .. } => eprintln!("{}", e.to_string().yellow()),
        _ => eprintln!("{}: {e}", "error".red()),
    }
}

async fn add(rl: &mut DefaultEditor, app: &mut App) -> Result<(), TextrackError> {
    let mut draft = RecordDraft::for_today();
    suggest_into(rl, app, &mut draft).await?;
    let Some(fields) = prompt_fields(rl, &draft)? else {
        return Ok(());
    };
    draft.apply(&fields);
    let record = app.repo.create(draft.validate()?, &app.session)?;
    println!("Created {}.", record.id.cyan());
    Ok(())
}

async fn edit(rl: &mut DefaultEditor, app: &mut App, id: &str) -> Result<(), TextrackError> {
    let mut draft = RecordDraft::from_record(app.repo.owned(id, &app.session)?);
    suggest_into(rl, app, &mut draft).await?;
    let Some(fields) = prompt_fields(rl, &draft)? else {
        return Ok(());
    };
    draft.apply(&fields);
    let fields = draft.validate()?;
    app.repo.update(id, &RecordPatch::from(fields), &app.session)?;
    println!("Updated {}.", id.cyan());
    Ok(())
}

fn delete(rl: &mut DefaultEditor, app: &mut App, id: &str) -> Result<(), TextrackError> {
    let outcome = commands::delete(app, id, |_| {
        matches!(rl.readline("Delete this record? [y/N] "), Ok(answer) if is_yes(&answer))
    })?;
    match outcome {
        DeleteOutcome::Deleted(record) => println!("Deleted {}.", record.id.cyan()),
        DeleteOutcome::Cancelled => println!("{}", "Cancelled.".dimmed()),
    }
    Ok(())
}

async fn analyze(app: &App) -> Result<(), TextrackError> {
    println!("{}", "Analyzing...".dimmed());
    let insight = app.insight.analyze(app.repo.list()).await?;
    println!("{}\n{insight}", "AI Insight".bold());
    Ok(())
}

/// Offers the AI helper: a non-empty note is turned into field suggestions.
async fn suggest_into(
    rl: &mut DefaultEditor,
    app: &App,
    draft: &mut RecordDraft,
) -> Result<(), TextrackError> {
    let note = match rl.readline("Note for AI (enter to skip): ") {
        Ok(note) => note,
        Err(_) => return Ok(()),
    };
    if note.trim().is_empty() {
        return Ok(());
    }
    println!("{}", "Asking AI...".dimmed());
    match app.insight.suggest(&note).await? {
        Some(patch) => {
            println!("{}", format!("AI suggestion: {}", commands::describe_patch(&patch)).dimmed());
            draft.apply(&patch);
        }
        None => println!("{}", "No suggestion.".dimmed()),
    }
    Ok(())
}

/// Prompts for every field, prefilled with the draft's value.
///
/// Returns `None` when the user aborts with Ctrl-C or Ctrl-D.
fn prompt_fields(
    rl: &mut DefaultEditor,
    draft: &RecordDraft,
) -> Result<Option<RecordPatch>, TextrackError> {
    let f = &draft.fields;
    let mut ask = |label: &str, initial: &str| -> Result<Option<String>, TextrackError> {
        match rl.readline_with_initial(&format!("{label}: "), (initial, "")) {
            Ok(value) => Ok(Some(value)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(TextrackError::Internal(format!("readline failed: {e}"))),
        }
    };

    let Some(dori) = ask("Dori", &f.dori_detail)? else { return Ok(None) };
    let Some(warpin) = ask("Warpin", &f.warpin_detail)? else { return Ok(None) };
    let Some(bheem) = ask("Bheem", &f.bheem_detail)? else { return Ok(None) };
    let Some(delivery) = ask("Delivery", &f.delivery_detail)? else { return Ok(None) };
    let Some(date) = ask("Date (YYYY-MM-DD)", &f.entry_date)? else { return Ok(None) };

    Ok(Some(RecordPatch {
        dori_detail: Some(dori),
        warpin_detail: Some(warpin),
        bheem_detail: Some(bheem),
        delivery_detail: Some(delivery),
        entry_date: Some(date),
    }))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
