//! Archive search

use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::error::{MailBackupError, MailBackupResult};
use crate::mailbox::ARCHIVE_EXTENSION;

/// Archives under `backup_root` whose file name contains `term`
///
/// Matching is case-sensitive and looks at the file name only. The walk is
/// lazy and sorted by file name at each level; unreadable entries are logged
/// and skipped.
pub fn search_archives<'t>(
    backup_root: &Path,
    term: &'t str,
) -> MailBackupResult<impl Iterator<Item = PathBuf> + 't> {
    if !backup_root.is_dir() {
        return Err(MailBackupError::root_missing(backup_root));
    }

    let walk = WalkDir::new(backup_root).sort_by_file_name().into_iter();
    Ok(walk.filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry during search: {}", e);
                return None;
            }
        };
        if !entry.file_type().is_file() {
            return None;
        }

        let matches = {
            let name = entry.file_name().to_string_lossy();
            name.ends_with(ARCHIVE_EXTENSION) && name.contains(term)
        };
        matches.then(|| entry.into_path())
    }))
}
