//! Mailbox discovery
//!
//! Lists the domains under the mail root and the mailboxes inside selected
//! domains, together with each mailbox's last-modified time.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, error, warn};

use super::resolver::{MailboxId, PathResolver};
use crate::error::{MailBackupError, MailBackupResult};

/// A mailbox directory found on disk
#[derive(Debug, Clone)]
pub struct Mailbox {
    pub id: MailboxId,
    pub path: PathBuf,
    /// Last-modified time of the mailbox directory itself
    pub modified: DateTime<Local>,
}

/// Sorted names of all directories directly under `root`
fn list_subdirectories(root: &Path) -> MailBackupResult<Vec<String>> {
    let entries =
        fs::read_dir(root).map_err(|e| MailBackupError::io_at("Failed to read", root, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MailBackupError::io_at("Failed to read entry in", root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Ignoring non UTF-8 directory name {:?} in {}", raw, root.display()),
        }
    }

    names.sort();
    Ok(names)
}

/// All domain directories under the mail root, sorted by name
pub fn list_domains(mail_root: &Path) -> MailBackupResult<Vec<String>> {
    if !mail_root.is_dir() {
        return Err(MailBackupError::root_missing(mail_root));
    }
    list_subdirectories(mail_root)
}

/// All mailboxes in the given domains
///
/// Domains that are not directories under the mail root are reported and
/// skipped. Mailboxes whose metadata can't be read are logged and skipped.
pub fn list_mailboxes(
    resolver: &PathResolver,
    domains: &[String],
) -> MailBackupResult<Vec<Mailbox>> {
    let mut mailboxes = Vec::new();

    for domain in domains {
        let domain_dir = resolver.domain_dir(domain)?;
        if !domain_dir.is_dir() {
            warn!("Domain directory not found, skipping: {}", domain_dir.display());
            continue;
        }

        for user in list_subdirectories(&domain_dir)? {
            let id = match MailboxId::new(domain.as_str(), user) {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping entry in {}: {}", domain_dir.display(), e);
                    continue;
                }
            };
            let path = resolver.mailbox_dir(&id);
            match modified_time(&path) {
                Ok(modified) => {
                    debug!("Found mailbox {} (modified {})", id, modified);
                    mailboxes.push(Mailbox { id, path, modified });
                }
                Err(e) => error!("Failed to read metadata of {}: {}", path.display(), e),
            }
        }
    }

    mailboxes.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(mailboxes)
}

fn modified_time(path: &Path) -> MailBackupResult<DateTime<Local>> {
    let metadata =
        fs::metadata(path).map_err(|e| MailBackupError::io_at("Failed to stat", path, e))?;
    let modified = metadata
        .modified()
        .map_err(|e| MailBackupError::io_at("Failed to read mtime of", path, e))?;
    Ok(DateTime::<Local>::from(modified))
}
