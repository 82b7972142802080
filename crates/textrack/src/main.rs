// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Textrack - a textile production ledger.
//!
//! This is the binary entry point.

mod app;
mod commands;
mod doctor;
mod shell;

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use textrack_config::TextrackConfig;
use textrack_core::{DeleteOutcome, Record, TextrackError};

use crate::app::App;
use crate::commands::{ExportArgs, FieldArgs};

/// Textrack - track dori, warpin, bheem and delivery for every batch.
#[derive(Parser, Debug)]
#[command(name = "textrack", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a record (missing fields can come from an AI-read --note).
    Add(FieldArgs),
    /// Edit one of your records.
    Edit {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete one of your records.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// List records grouped by date.
    List {
        /// Case-insensitive search over details, id and date.
        #[arg(long, short)]
        search: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Ask the AI for a summary of the whole ledger.
    Analyze,
    /// Ask the AI to extract record fields from a note, without saving.
    Suggest { note: String },
    /// Export records to PDF or CSV.
    Export(ExportArgs),
    /// Launch an interactive shell.
    Shell,
    /// Run diagnostic checks.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => textrack_config::load_and_validate_path(path),
        None => textrack_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            textrack_config::render_errors(&errors);
            std::process::exit(2);
        }
    };

    init_tracing(&config.ledger.log_level);

    match run(cli.command, config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match &e {
                TextrackError::PermissionDenied { .. } => {
                    eprintln!("{}", "Permission denied. This record is locked to another session.".yellow());
                }
                _ => eprintln!("{}: {e}", "error".red()),
            }
            std::process::exit(1);
        }
    }
}

async fn run(command: Option<Commands>, config: TextrackConfig) -> Result<i32, TextrackError> {
    let Some(command) = command else {
        println!("textrack: use --help for available commands");
        return Ok(0);
    };

    match command {
        Commands::Doctor { plain } => {
            let failures = doctor::run_doctor(&config, plain).await?;
            return Ok(if failures > 0 { 1 } else { 0 });
        }
        Commands::Add(fields) => {
            let mut app = App::open(config)?;
            let record = commands::add(&mut app, &fields).await?;
            println!("Created {}", record.id.cyan());
        }
        Commands::Edit { id, fields } => {
            let mut app = App::open(config)?;
            commands::edit(&mut app, &id, &fields).await?;
            println!("Updated {}", id.cyan());
        }
        Commands::Delete { id, yes } => {
            let mut app = App::open(config)?;
            match commands::delete(&mut app, &id, |record| yes || confirm_delete(record))? {
                DeleteOutcome::Deleted(record) => println!("Deleted {}", record.id.cyan()),
                DeleteOutcome::Cancelled => println!("{}", "Cancelled.".dimmed()),
            }
        }
        Commands::List { search, json } => {
            let app = App::open(config)?;
            let search = search.unwrap_or_default();
            if json {
                println!("{}", commands::render_json(app.repo.list(), &search)?);
            } else {
                let color = std::io::stdout().is_terminal();
                print!(
                    "{}",
                    commands::render_listing(app.repo.list(), &search, &app.session, color)
                );
            }
        }
        Commands::Analyze => {
            let app = App::open(config)?;
            let insight = app.insight.analyze(app.repo.list()).await?;
            println!("{insight}");
        }
        Commands::Suggest { note } => {
            let app = App::open(config)?;
            match app.insight.suggest(&note).await? {
                Some(patch) => println!(
                    "{}",
                    serde_json::to_string_pretty(&patch)
                        .map_err(|e| TextrackError::Internal(e.to_string()))?
                ),
                None => {
                    eprintln!("{}", "No suggestion.".dimmed());
                    return Ok(1);
                }
            }
        }
        Commands::Export(args) => {
            let app = App::open(config)?;
            let (path, rows) = commands::export(&app, &args)?;
            println!("Exported {rows} record(s) to {}", path.display());
        }
        Commands::Shell => shell::run_shell(App::open(config)?).await?,
    }
    Ok(0)
}

/// Asks on the terminal; anything but an explicit yes declines.
fn confirm_delete(record: &Record) -> bool {
    print!(
        "Delete this record? {} ({}) [y/N] ",
        record.id.cyan(),
        record.entry_date
    );
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => shell::is_yes(&answer),
        Err(_) => false,
    }
}

/// Initialize the tracing subscriber with env-filter support.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("textrack={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_fields() {
        let cli = Cli::try_parse_from([
            "textrack", "add", "--dori", "1000m", "--note", "two beams", "--date", "2024-01-01",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(fields)) => {
                assert_eq!(fields.dori.as_deref(), Some("1000m"));
                assert_eq!(fields.note.as_deref(), Some("two beams"));
                assert!(fields.bheem.is_none());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parses_export_format() {
        let cli = Cli::try_parse_from([
            "textrack", "--config", "t.toml", "export", "--format", "csv", "-o", "out.csv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("t.toml")));
        match cli.command {
            Some(Commands::Export(args)) => {
                assert_eq!(args.format, Some(textrack_export::ExportFormat::Csv));
                assert_eq!(args.output, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_export_format() {
        assert!(Cli::try_parse_from(["textrack", "export", "--format", "xlsx"]).is_err());
    }

    #[test]
    fn delete_requires_id() {
        assert!(Cli::try_parse_from(["textrack", "delete"]).is_err());
        let cli = Cli::try_parse_from(["textrack", "delete", "abc1234", "--yes"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete { yes: true, .. })));
    }
}
