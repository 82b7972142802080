// SPDX-FileCopyrightText: 2026 Textrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `textrack doctor` command implementation.
//!
//! Runs diagnostic checks against the local ledger to identify storage,
//! data, and AI configuration problems. No network requests are made.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

use textrack_config::{CorruptStatePolicy, TextrackConfig};
use textrack_core::{HealthStatus, KeyValueStore, PluginAdapter, TextrackError};
use textrack_gemini::GeminiProvider;
use textrack_storage::{FileStore, LedgerStore, RECORDS_KEY, SESSION_KEY};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `textrack doctor` command.
///
/// With `plain`, disables colored output. Returns the number of failed checks.
pub async fn run_doctor(config: &TextrackConfig, plain: bool) -> Result<usize, TextrackError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = run_checks(config).await;

    println!();
    println!("  textrack doctor");
    println!("  {}", "-".repeat(50));

    let mut fail_count = 0;
    let mut warn_count = 0;
    for result in &results {
        match result.status {
            CheckStatus::Pass => {}
            CheckStatus::Warn => warn_count += 1,
            CheckStatus::Fail => fail_count += 1,
        }
        println!("{}", format_line(result, use_color));
    }

    println!();
    if fail_count > 0 || warn_count > 0 {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(fail_count)
}

/// Runs every check in order.
pub async fn run_checks(config: &TextrackConfig) -> Vec<CheckResult> {
    let mut results = vec![CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        "valid",
        Instant::now(),
    )];

    let start = Instant::now();
    let path = std::path::Path::new(&config.storage.path);
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => results.push(CheckResult::new(
            "Storage",
            CheckStatus::Warn,
            format!("{} does not exist yet (created on first use)", path.display()),
            start,
        )),
        Err(e) => results.push(CheckResult::new(
            "Storage",
            CheckStatus::Fail,
            format!("{}: {e}", path.display()),
            start,
        )),
        Ok(meta) if !meta.is_dir() => results.push(CheckResult::new(
            "Storage",
            CheckStatus::Fail,
            format!("{} is not a directory", path.display()),
            start,
        )),
        // The directory exists, so opening the store creates nothing.
        Ok(_) => match FileStore::open(path) {
            Ok(store) => {
                results.push(check_store(&store, start).await);
                let store: Arc<dyn KeyValueStore> = Arc::new(store);
                results.push(check_session(&store));
                results.push(check_records(&store));
            }
            Err(e) => results.push(CheckResult::new(
                "Storage",
                CheckStatus::Fail,
                format!("{}: {e}", path.display()),
                start,
            )),
        },
    }

    results.push(check_ai(config).await);
    results
}

async fn check_store(store: &FileStore, start: Instant) -> CheckResult {
    let location = store.dir().display().to_string();
    match store.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new("Storage", CheckStatus::Pass, location, start),
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new("Storage", CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("Storage", CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new("Storage", CheckStatus::Fail, e.to_string(), start),
    }
}

fn check_session(store: &Arc<dyn KeyValueStore>) -> CheckResult {
    let start = Instant::now();
    match store.get(SESSION_KEY) {
        Ok(Some(id)) if !id.trim().is_empty() => {
            CheckResult::new("Session", CheckStatus::Pass, id.trim().to_string(), start)
        }
        Ok(_) => CheckResult::new(
            "Session",
            CheckStatus::Warn,
            "not created yet (will be created on first use)",
            start,
        ),
        Err(e) => CheckResult::new("Session", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Parses the records strictly so corruption is reported, never reset.
fn check_records(store: &Arc<dyn KeyValueStore>) -> CheckResult {
    let start = Instant::now();
    let strict = LedgerStore::new(store.clone(), CorruptStatePolicy::Fail);
    let backup = format!("{RECORDS_KEY}.corrupt");
    let has_backup = matches!(store.get(&backup), Ok(Some(_)));

    match strict.load_records() {
        Ok(records) if has_backup => CheckResult::new(
            "Records",
            CheckStatus::Warn,
            format!("{} record(s); a previous corrupt copy is kept as {backup}", records.len()),
            start,
        ),
        Ok(records) => CheckResult::new(
            "Records",
            CheckStatus::Pass,
            format!("{} record(s)", records.len()),
            start,
        ),
        Err(TextrackError::MalformedState { source, .. }) => CheckResult::new(
            "Records",
            CheckStatus::Fail,
            format!("malformed JSON: {source}"),
            start,
        ),
        Err(e) => CheckResult::new("Records", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_ai(config: &TextrackConfig) -> CheckResult {
    let start = Instant::now();
    match GeminiProvider::new(&config.gemini) {
        Ok(provider) => match provider.health_check().await {
            Ok(HealthStatus::Healthy) => CheckResult::new(
                "AI service",
                CheckStatus::Pass,
                format!("{} configured", config.gemini.model),
                start,
            ),
            Ok(HealthStatus::Degraded(r) | HealthStatus::Unhealthy(r)) => {
                CheckResult::new("AI service", CheckStatus::Warn, r, start)
            }
            Err(e) => CheckResult::new("AI service", CheckStatus::Warn, e.to_string(), start),
        },
        Err(_) => CheckResult::new(
            "AI service",
            CheckStatus::Warn,
            "no API key configured (AI features disabled)",
            start,
        ),
    }
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    match (&result.status, use_color) {
        (CheckStatus::Pass, true) => format!(
            "    {} {:<14} {} ({duration_ms}ms)",
            "✓".green(),
            result.name,
            result.message
        ),
        (CheckStatus::Warn, true) => format!(
            "    {} {:<14} {} ({duration_ms}ms)",
            "!".yellow(),
            result.name,
            result.message.yellow()
        ),
        (CheckStatus::Fail, true) => format!(
            "    {} {:<14} {} ({duration_ms}ms)",
            "✗".red(),
            result.name,
            result.message.red()
        ),
        (status, false) => {
            let tag = match status {
                CheckStatus::Pass => "[OK]  ",
                CheckStatus::Warn => "[WARN]",
                CheckStatus::Fail => "[FAIL]",
            };
            format!(
                "    {tag} {:<14} {} ({duration_ms}ms)",
                result.name, result.message
            )
        }
    }
}
