//! Mailbox identity and path resolution
//!
//! A mailbox is identified by its domain and user. This module turns that pair
//! into the mailbox directory under the mail root and into the archive file
//! name used for the current run, and parses archive file names back.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::context::{RunContext, BATCH_TIMESTAMP_FORMAT};
use crate::error::{MailBackupError, MailBackupResult};

/// File extension of every archive this tool writes
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Length of a rendered batch timestamp (`2024-01-01_00-00-00`)
const TIMESTAMP_LEN: usize = 19;

/// Check that a domain or user name is a single, harmless path component
pub fn validate_component(kind: &str, value: &str) -> MailBackupResult<()> {
    if value.is_empty() {
        return Err(MailBackupError::InvalidPath(format!("{} must not be empty", kind)));
    }
    if value == "." || value == ".." {
        return Err(MailBackupError::InvalidPath(format!(
            "{} '{}' is not a valid name",
            kind, value
        )));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(MailBackupError::InvalidPath(format!(
            "{} '{}' must not contain path separators",
            kind,
            value.escape_default()
        )));
    }
    Ok(())
}

/// A validated (domain, user) pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MailboxId {
    domain: String,
    user: String,
}

impl MailboxId {
    pub fn new(domain: impl Into<String>, user: impl Into<String>) -> MailBackupResult<Self> {
        let domain = domain.into();
        let user = user.into();
        validate_component("domain", &domain)?;
        validate_component("user", &user)?;
        Ok(Self { domain, user })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.user)
    }
}

/// Maps mailbox identities to directories and archive names for one run
#[derive(Debug, Clone)]
pub struct PathResolver {
    mail_root: PathBuf,
    batch_timestamp: String,
}

impl PathResolver {
    pub fn new(mail_root: impl Into<PathBuf>, batch_timestamp: impl Into<String>) -> Self {
        Self {
            mail_root: mail_root.into(),
            batch_timestamp: batch_timestamp.into(),
        }
    }

    /// Resolver bound to the run's mail root and batch timestamp
    pub fn for_run(ctx: &RunContext) -> Self {
        Self::new(ctx.paths.mail_root(), ctx.batch_timestamp())
    }

    pub fn mail_root(&self) -> &Path {
        &self.mail_root
    }

    /// `{mail_root}/{domain}`
    pub fn domain_dir(&self, domain: &str) -> MailBackupResult<PathBuf> {
        validate_component("domain", domain)?;
        Ok(self.mail_root.join(domain))
    }

    /// `{mail_root}/{domain}/{user}`
    pub fn mailbox_dir(&self, id: &MailboxId) -> PathBuf {
        self.mail_root.join(&id.domain).join(&id.user)
    }

    /// `{domain}_{user}_{timestamp}.tar.gz`
    pub fn archive_file_name(&self, id: &MailboxId) -> String {
        format!(
            "{}_{}_{}{}",
            id.domain, id.user, self.batch_timestamp, ARCHIVE_EXTENSION
        )
    }

    /// Validate raw names and return both the mailbox directory and archive name
    pub fn resolve(&self, domain: &str, user: &str) -> MailBackupResult<(PathBuf, String)> {
        let id = MailboxId::new(domain, user)?;
        Ok((self.mailbox_dir(&id), self.archive_file_name(&id)))
    }
}

/// A parsed `{domain}_{user}_{timestamp}.tar.gz` file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    prefix: String,
    timestamp: NaiveDateTime,
}

impl ArchiveName {
    pub fn parse(file_name: &str) -> MailBackupResult<Self> {
        let invalid = || {
            MailBackupError::InvalidArgument(format!(
                "'{}' is not named like domain_user_YYYY-MM-DD_HH-MM-SS{}",
                file_name, ARCHIVE_EXTENSION
            ))
        };

        let stem = file_name.strip_suffix(ARCHIVE_EXTENSION).ok_or_else(invalid)?;
        if stem.len() < TIMESTAMP_LEN + 2 || !stem.is_char_boundary(stem.len() - TIMESTAMP_LEN) {
            return Err(invalid());
        }

        let (head, stamp) = stem.split_at(stem.len() - TIMESTAMP_LEN);
        let prefix = head.strip_suffix('_').ok_or_else(invalid)?;
        if prefix.is_empty() {
            return Err(invalid());
        }
        let timestamp =
            NaiveDateTime::parse_from_str(stamp, BATCH_TIMESTAMP_FORMAT).map_err(|_| invalid())?;

        Ok(Self {
            prefix: prefix.to_string(),
            timestamp,
        })
    }

    pub fn from_path(path: &Path) -> MailBackupResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                MailBackupError::InvalidArgument(format!(
                    "'{}' has no usable file name",
                    path.display()
                ))
            })?;
        Self::parse(file_name)
    }

    /// The `{domain}_{user}` part of the name
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Recover the mailbox identity given the user name stored in the archive
    ///
    /// The prefix alone is ambiguous once a domain or user contains `_`, so the
    /// user comes from the archive's root member and the domain is whatever
    /// precedes `_{user}`.
    pub fn mailbox_for_user(&self, user: &str) -> MailBackupResult<MailboxId> {
        let domain = self
            .prefix
            .strip_suffix(user)
            .and_then(|rest| rest.strip_suffix('_'))
            .ok_or_else(|| {
                MailBackupError::InvalidArgument(format!(
                    "archive name prefix '{}' does not end with its mailbox '{}'",
                    self.prefix, user
                ))
            })?;
        MailboxId::new(domain, user)
    }
}
