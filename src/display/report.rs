//! Report formatting
//!
//! Formats backup runs, restores and search hits for the terminal.

use std::path::{Path, PathBuf};

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::{BackupReport, Outcome, RestoreOutcome};

#[derive(Tabled)]
struct MailboxRow {
    #[tabled(rename = "Mailbox")]
    mailbox: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a backup run as a per-mailbox table followed by the totals line
pub fn format_backup_report(report: &BackupReport) -> String {
    if report.mailboxes.is_empty() {
        return "No mailboxes found in the selected domains.".to_string();
    }

    let rows = report.mailboxes.iter().map(|m| {
        let (result, detail) = match &m.outcome {
            Outcome::Skipped { age_days } => {
                ("skipped".to_string(), format!("{} day(s) old", age_days))
            }
            Outcome::Archived { archive } => ("archived".to_string(), file_name(archive)),
            Outcome::Simulated { archive } => ("would archive".to_string(), file_name(archive)),
            Outcome::Failed { stage, error, .. } => {
                (format!("failed ({})", stage), error.clone())
            }
        };
        MailboxRow {
            mailbox: m.mailbox.to_string(),
            result,
            detail,
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n\n{}", table, report.summary())
}

/// Format the result of a restore
pub fn format_restore_outcome(outcome: &RestoreOutcome) -> String {
    let verb = if outcome.dry_run {
        "Would restore"
    } else {
        "Restored"
    };
    let mut output = format!(
        "{} {} to {}\n",
        verb,
        outcome.mailbox,
        outcome.destination.display()
    );
    output.push_str(&format!(
        "  Entries: {}\n  Size:    {}\n",
        outcome.summary.entries,
        format_size(outcome.summary.total_bytes)
    ));
    if outcome.replaced_existing {
        output.push_str("  Existing mailbox directory was replaced\n");
    }
    output
}

/// One path per line, or a note when nothing matched
pub fn format_search_results(term: &str, found: &[PathBuf]) -> String {
    if found.is_empty() {
        return format!("No archives matching '{}'.", term);
    }

    let mut output = String::new();
    for path in found {
        output.push_str(&path.display().to_string());
        output.push('\n');
    }
    output.push_str(&format!("\n{} archive(s) found.", found.len()));
    output
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
