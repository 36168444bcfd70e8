//! Path management for mailbackup
//!
//! Resolves the three filesystem roots the tool works with.
//!
//! ## Path Resolution Order
//!
//! For each root, the first of these that is set wins:
//!
//! 1. Command-line flag (`--mail-root`, `--backup-root`, `--log-dir`)
//! 2. Environment variable (`MAILBACKUP_MAIL_ROOT`, `MAILBACKUP_BACKUP_ROOT`,
//!    `MAILBACKUP_LOG_DIR`); clap merges 1 and 2 before we see them
//! 3. The settings file
//! 4. Built-in defaults (`/var/mail/vhosts`, `/backup/mail`, `/var/log/mailbackup`)

use std::path::{Path, PathBuf};

use super::settings::Settings;

pub const DEFAULT_MAIL_ROOT: &str = "/var/mail/vhosts";
pub const DEFAULT_BACKUP_ROOT: &str = "/backup/mail";
pub const DEFAULT_LOG_DIR: &str = "/var/log/mailbackup";

/// Overrides supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub mail_root: Option<PathBuf>,
    pub backup_root: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

/// The filesystem roots used by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailPaths {
    /// Per-domain mailbox directories live here
    mail_root: PathBuf,
    /// Dated archive directories live here
    backup_root: PathBuf,
    /// One log file per run is written here
    log_dir: PathBuf,
}

impl MailPaths {
    /// Resolve the roots from overrides, then settings, then defaults
    pub fn resolve(overrides: PathOverrides, settings: &Settings) -> Self {
        Self {
            mail_root: overrides
                .mail_root
                .or_else(|| settings.mail_root.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MAIL_ROOT)),
            backup_root: overrides
                .backup_root
                .or_else(|| settings.backup_root.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_ROOT)),
            log_dir: overrides
                .log_dir
                .or_else(|| settings.log_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
        }
    }

    /// Create MailPaths with explicit roots (useful for testing)
    pub fn with_roots(
        mail_root: impl Into<PathBuf>,
        backup_root: impl Into<PathBuf>,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mail_root: mail_root.into(),
            backup_root: backup_root.into(),
            log_dir: log_dir.into(),
        }
    }

    pub fn mail_root(&self) -> &Path {
        &self.mail_root
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}
