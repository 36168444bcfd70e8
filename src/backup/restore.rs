//! Mailbox restoration
//!
//! Puts an archived mailbox back under the mail root. The destination is
//! derived from the archive: the user is the archive's top-level member, the
//! domain is what precedes `_{user}` in the file name.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::archive::{ArchiveManager, ArchiveSummary};
use crate::config::RunContext;
use crate::error::{MailBackupError, MailBackupResult};
use crate::mailbox::{ArchiveName, MailboxId, PathResolver};
use crate::prompt::SelectionProvider;

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    pub mailbox: MailboxId,
    pub destination: PathBuf,
    /// An existing mailbox directory was removed first
    pub replaced_existing: bool,
    pub summary: ArchiveSummary,
    pub dry_run: bool,
}

/// Handles restoring mailboxes from archives
pub struct RestoreWorkflow<'a> {
    ctx: &'a RunContext,
    resolver: PathResolver,
    archiver: ArchiveManager,
}

impl<'a> RestoreWorkflow<'a> {
    pub fn new(ctx: &'a RunContext) -> Self {
        Self {
            ctx,
            resolver: PathResolver::for_run(ctx),
            archiver: ArchiveManager::new(),
        }
    }

    /// Work out where `archive_path` restores to, without touching anything
    pub fn resolve_destination(
        &self,
        archive_path: &Path,
    ) -> MailBackupResult<(MailboxId, PathBuf, ArchiveSummary)> {
        if !archive_path.is_file() {
            return Err(MailBackupError::archive_missing(archive_path));
        }
        let name = ArchiveName::from_path(archive_path)?;
        let summary = self.archiver.inspect(archive_path)?;
        let mailbox = name.mailbox_for_user(&summary.root_name)?;
        let destination = self.resolver.mailbox_dir(&mailbox);
        Ok((mailbox, destination, summary))
    }

    /// Restore one archive
    ///
    /// If the mailbox directory already exists the provider must confirm its
    /// removal; declining returns `DestinationConflict` and leaves it as is.
    pub fn restore(
        &self,
        archive_path: &Path,
        provider: &mut dyn SelectionProvider,
    ) -> MailBackupResult<RestoreOutcome> {
        let (mailbox, destination, summary) = self.resolve_destination(archive_path)?;
        info!(
            "Restoring {} from {} ({} entries)",
            mailbox,
            archive_path.display(),
            summary.entries
        );

        let replaced_existing = destination.exists();
        if replaced_existing {
            let question = format!(
                "Destination {} already exists. Replace it?",
                destination.display()
            );
            if !provider.confirm(&question)? {
                info!("Restore cancelled, {} left untouched", destination.display());
                return Err(MailBackupError::DestinationConflict(destination));
            }
        }

        let domain_dir = self.resolver.domain_dir(mailbox.domain())?;
        let outcome = RestoreOutcome {
            mailbox,
            destination,
            replaced_existing,
            summary,
            dry_run: self.ctx.dry_run,
        };

        if self.ctx.dry_run {
            if replaced_existing {
                info!("[DRY RUN] Would remove {}", outcome.destination.display());
            }
            info!(
                "[DRY RUN] Would extract {} into {}",
                archive_path.display(),
                domain_dir.display()
            );
            return Ok(outcome);
        }

        if replaced_existing {
            fs::remove_dir_all(&outcome.destination).map_err(|e| {
                MailBackupError::io_at("Failed to remove", &outcome.destination, e)
            })?;
            info!("Removed existing {}", outcome.destination.display());
        }

        self.archiver.extract(archive_path, &domain_dir)?;
        info!(
            "Restored {} to {}",
            archive_path.display(),
            outcome.destination.display()
        );

        Ok(outcome)
    }
}
