//! Batch backup of mailboxes
//!
//! One pass per mailbox:
//!
//! ```text
//! Pending -> (too recent: Skipped)
//!         -> Archiving -> (error: Failed)
//!         -> Verifying -> (error: Failed, archive kept, mailbox kept)
//!         -> Deleting  -> (error: Failed, archive kept)
//!         -> Archived
//! ```
//!
//! A failure only ends that mailbox's pass; the batch moves on. Under dry run
//! the archive and delete steps are logged instead of performed.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use log::{debug, error, info, warn};

use super::archive::ArchiveManager;
use super::retention::{age_in_days, is_eligible_for_deletion};
use crate::config::RunContext;
use crate::error::{MailBackupError, MailBackupResult};
use crate::mailbox::resolver::validate_component;
use crate::mailbox::{list_domains, list_mailboxes, Mailbox, MailboxId, PathResolver};
use crate::prompt::SelectionProvider;

/// Step of a mailbox's pass that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Archive,
    Verify,
    Delete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => write!(f, "archiving"),
            Self::Verify => write!(f, "verification"),
            Self::Delete => write!(f, "deletion"),
        }
    }
}

/// How a mailbox's pass ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Younger than the minimum age
    Skipped { age_days: i64 },
    /// Archived, verified and removed from the mail root
    Archived { archive: PathBuf },
    /// Dry run: would have been archived and removed
    Simulated { archive: PathBuf },
    Failed {
        stage: Stage,
        archive: PathBuf,
        error: String,
    },
}

#[derive(Debug, Clone)]
pub struct MailboxReport {
    pub mailbox: MailboxId,
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Everything one backup run did
#[derive(Debug, Clone, Default)]
pub struct BackupReport {
    pub domains: Vec<String>,
    pub min_age_days: u32,
    pub dry_run: bool,
    pub mailboxes: Vec<MailboxReport>,
}

impl BackupReport {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.mailboxes.iter().filter(|m| pred(&m.outcome)).count()
    }

    pub fn archived(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Archived { .. }))
    }

    pub fn simulated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Simulated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// One-line summary for the log
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "[DRY RUN] {} mailbox(es) would be archived and deleted, {} skipped",
                self.simulated(),
                self.skipped()
            )
        } else {
            format!(
                "{} mailbox(es) archived and deleted, {} skipped, {} failed",
                self.archived(),
                self.skipped(),
                self.failed()
            )
        }
    }
}

/// Drives domain selection, retention and archiving for one run
pub struct BackupWorkflow<'a> {
    ctx: &'a RunContext,
    resolver: PathResolver,
    archiver: ArchiveManager,
    default_min_age_days: u32,
}

impl<'a> BackupWorkflow<'a> {
    pub fn new(ctx: &'a RunContext, default_min_age_days: u32) -> Self {
        Self {
            ctx,
            resolver: PathResolver::for_run(ctx),
            archiver: ArchiveManager::new(),
            default_min_age_days,
        }
    }

    pub fn with_archiver(mut self, archiver: ArchiveManager) -> Self {
        self.archiver = archiver;
        self
    }

    /// Select, confirm and process mailboxes
    ///
    /// Returns `Aborted` if no domain was selected or the operator declined;
    /// finding no domains or no mailboxes is not an error and yields an empty
    /// report.
    pub fn run(&self, provider: &mut dyn SelectionProvider) -> MailBackupResult<BackupReport> {
        let available = list_domains(self.ctx.paths.mail_root())?;
        if available.is_empty() {
            warn!(
                "No domain directories under {}, nothing to do",
                self.ctx.paths.mail_root().display()
            );
            return Ok(BackupReport {
                dry_run: self.ctx.dry_run,
                ..BackupReport::default()
            });
        }
        let domains = provider.select_domains(&available)?;
        if domains.is_empty() {
            info!("No domains selected, nothing to do");
            return Err(MailBackupError::Aborted("no domains selected".into()));
        }
        for domain in &domains {
            validate_component("domain", domain)?;
        }
        info!("Starting backup for: {}", domains.join(", "));

        let min_age_days = provider.prompt_min_age(self.default_min_age_days)?;
        info!("Minimum mailbox age: {} day(s)", min_age_days);

        let mailboxes = list_mailboxes(&self.resolver, &domains)?;
        let mut report = BackupReport {
            domains,
            min_age_days,
            dry_run: self.ctx.dry_run,
            mailboxes: Vec::with_capacity(mailboxes.len()),
        };

        if mailboxes.is_empty() {
            warn!("No mailboxes found in the selected domains");
            return Ok(report);
        }

        let question = if self.ctx.dry_run {
            format!("Simulate processing {} mailbox(es) now?", mailboxes.len())
        } else {
            format!("Process {} mailbox(es) now?", mailboxes.len())
        };
        if !provider.confirm(&question)? {
            info!("Backup cancelled");
            return Err(MailBackupError::Aborted("backup not confirmed".into()));
        }

        for mailbox in &mailboxes {
            let outcome = self.process_mailbox(mailbox, min_age_days);
            report.mailboxes.push(MailboxReport {
                mailbox: mailbox.id.clone(),
                path: mailbox.path.clone(),
                outcome,
            });
        }

        info!("{}", report.summary());
        Ok(report)
    }

    /// Run one mailbox through retention, archiving, verification and deletion
    pub fn process_mailbox(&self, mailbox: &Mailbox, min_age_days: u32) -> Outcome {
        let now = &self.ctx.started_at;
        let age_days = age_in_days(&mailbox.modified, now);
        if !is_eligible_for_deletion(&mailbox.modified, now, min_age_days) {
            info!(
                "Skipping {} (last modified {} day(s) ago, minimum {})",
                mailbox.path.display(),
                age_days,
                min_age_days
            );
            return Outcome::Skipped { age_days };
        }

        let archive = self
            .ctx
            .run_backup_dir()
            .join(self.resolver.archive_file_name(&mailbox.id));

        if self.ctx.dry_run {
            info!(
                "[DRY RUN] Would archive {} -> {}",
                mailbox.path.display(),
                archive.display()
            );
            info!("[DRY RUN] Would delete mailbox {}", mailbox.path.display());
            return Outcome::Simulated { archive };
        }

        debug!("Creating backup of {}", mailbox.id);
        let failed = |stage: Stage, err: MailBackupError, archive: PathBuf| {
            error!(
                "Failed to process {} during {}: {}",
                mailbox.id, stage, err
            );
            Outcome::Failed {
                stage,
                archive,
                error: err.to_string(),
            }
        };

        if let Err(e) = self.archiver.create(&mailbox.path, &archive) {
            return failed(Stage::Archive, e, archive);
        }
        let summary = match self.archiver.verify(&archive, mailbox.id.user()) {
            Ok(summary) => summary,
            Err(e) => return failed(Stage::Verify, e, archive),
        };
        info!(
            "Archived {} -> {} ({} entries)",
            mailbox.id,
            archive.display(),
            summary.entries
        );

        if let Err(e) = fs::remove_dir_all(&mailbox.path) {
            let e = MailBackupError::io_at("Failed to remove", &mailbox.path, e);
            return failed(Stage::Delete, e, archive);
        }
        info!("Deleted mailbox {}", mailbox.path.display());

        Outcome::Archived { archive }
    }
}
