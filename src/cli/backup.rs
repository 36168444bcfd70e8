//! Backup command
//!
//! Runs the backup workflow either interactively on the terminal or, with
//! `--batch`, from flags alone.

use crate::backup::{ArchiveManager, BackupReport, BackupWorkflow};
use crate::config::{RunContext, Settings};
use crate::display::format_backup_report;
use crate::error::MailBackupResult;
use crate::prompt::{PresetSelection, SelectionProvider, TerminalPrompt};

/// Backup flags taken from the command line
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    /// No prompts; take everything from the flags below
    pub batch: bool,
    /// Domains to process in batch mode; empty means all
    pub domains: Vec<String>,
    /// Minimum age in batch mode; `None` uses the settings file
    pub min_age_days: Option<u32>,
    /// Answer confirmations with yes
    pub assume_yes: bool,
}

impl BackupOptions {
    /// The answers a batch run gives in place of the operator
    pub fn preset(&self) -> PresetSelection {
        let mut preset = PresetSelection::everything();
        if !self.domains.is_empty() {
            preset = preset.with_domains(self.domains.clone());
        }
        if let Some(days) = self.min_age_days {
            preset = preset.with_min_age(days);
        }
        preset
    }
}

/// Run a backup and print its summary table
pub fn handle_backup(
    ctx: &RunContext,
    settings: &Settings,
    opts: &BackupOptions,
) -> MailBackupResult<BackupReport> {
    let workflow = BackupWorkflow::new(ctx, settings.default_min_age_days)
        .with_archiver(ArchiveManager::with_compression(settings.compression()?));

    let mut provider: Box<dyn SelectionProvider> = if opts.batch {
        Box::new(opts.preset())
    } else {
        Box::new(TerminalPrompt::stdio(opts.assume_yes))
    };

    let report = workflow.run(provider.as_mut())?;
    println!();
    println!("{}", format_backup_report(&report));
    Ok(report)
}
