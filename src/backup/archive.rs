//! Compressed tar archives of mailbox directories
//!
//! Archives are gzip-compressed tarballs whose single top-level member is the
//! mailbox directory's own name, so extracting into the domain directory
//! recreates the mailbox in place.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, warn};
use tar::{Archive, Builder};

use crate::error::{MailBackupError, MailBackupResult};

/// What an archive contains, as seen by reading it end to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Name of the single top-level member
    pub root_name: String,
    /// Number of entries (directories, files, links)
    pub entries: usize,
    /// Sum of entry payload sizes
    pub total_bytes: u64,
}

/// Creates, verifies and extracts mailbox archives
#[derive(Debug, Clone, Copy)]
pub struct ArchiveManager {
    compression: Compression,
}

impl Default for ArchiveManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveManager {
    /// Create an ArchiveManager using the default gzip level
    pub fn new() -> Self {
        Self {
            compression: Compression::default(),
        }
    }

    pub fn with_compression(level: u32) -> Self {
        Self {
            compression: Compression::new(level),
        }
    }

    /// Archive `source_dir` into `dest`
    ///
    /// The archive is written next to `dest` with a `.partial` suffix and only
    /// linked into place once it is complete and synced, so `dest` either
    /// doesn't exist or is a whole archive. An existing `dest` is never
    /// replaced: that is a `DestinationConflict`.
    pub fn create(&self, source_dir: &Path, dest: &Path) -> MailBackupResult<()> {
        if !source_dir.is_dir() {
            return Err(MailBackupError::mailbox_missing(source_dir));
        }
        let root_name = source_dir.file_name().ok_or_else(|| {
            MailBackupError::InvalidPath(format!(
                "{} has no directory name to archive under",
                source_dir.display()
            ))
        })?;
        if dest.exists() {
            return Err(MailBackupError::DestinationConflict(dest.to_path_buf()));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| MailBackupError::archive_io_at("Failed to create", parent, e))?;
        }

        let partial = partial_path(dest);
        let result = self
            .write_archive(source_dir, Path::new(root_name), &partial)
            .and_then(|()| publish(&partial, dest));

        if let Err(e) = fs::remove_file(&partial) {
            if result.is_ok() {
                warn!("Failed to remove {}: {}", partial.display(), e);
            }
        }
        result?;

        debug!("Wrote archive {}", dest.display());
        Ok(())
    }

    fn write_archive(
        &self,
        source_dir: &Path,
        root_name: &Path,
        partial: &Path,
    ) -> MailBackupResult<()> {
        let file = File::create(partial)
            .map_err(|e| MailBackupError::archive_io_at("Failed to create", partial, e))?;

        let encoder = GzEncoder::new(BufWriter::new(file), self.compression);
        let mut builder = Builder::new(encoder);
        builder.follow_symlinks(false);

        builder
            .append_dir_all(root_name, source_dir)
            .map_err(|e| MailBackupError::archive_io_at("Failed to archive", source_dir, e))?;

        let encoder = builder
            .into_inner()
            .map_err(|e| MailBackupError::archive_io_at("Failed to finish tar stream", partial, e))?;
        let writer = encoder
            .finish()
            .map_err(|e| MailBackupError::archive_io_at("Failed to finish gzip stream", partial, e))?;
        let file = writer.into_inner().map_err(|e| {
            MailBackupError::archive_io_at("Failed to flush", partial, e.into_error())
        })?;
        file.sync_all()
            .map_err(|e| MailBackupError::archive_io_at("Failed to sync", partial, e))?;

        Ok(())
    }

    /// Read an archive end to end without unpacking it
    ///
    /// Every entry header and payload is read, then the rest of the gzip
    /// stream so its trailer checksum gets checked. The archive must be
    /// non-empty and all entries must live under one top-level member.
    pub fn inspect(&self, archive_path: &Path) -> MailBackupResult<ArchiveSummary> {
        let mut archive = open_archive(archive_path)?;

        let mut root_name: Option<String> = None;
        let mut entries = 0;
        let mut total_bytes = 0;

        let iter = archive.entries().map_err(|e| corrupt(archive_path, e))?;
        for entry in iter {
            let mut entry = entry.map_err(|e| corrupt(archive_path, e))?;
            let entry_path = entry.path().map_err(|e| corrupt(archive_path, e))?.into_owned();

            let first = match entry_path.components().next() {
                Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
                _ => {
                    return Err(MailBackupError::corrupt_archive(format!(
                        "{}: entry '{}' is not a relative path",
                        archive_path.display(),
                        entry_path.display()
                    )))
                }
            };
            match &root_name {
                None => root_name = Some(first),
                Some(root) if *root != first => {
                    return Err(MailBackupError::corrupt_archive(format!(
                        "{}: entries under both '{}' and '{}'",
                        archive_path.display(),
                        root,
                        first
                    )))
                }
                Some(_) => {}
            }

            total_bytes += io::copy(&mut entry, &mut io::sink())
                .map_err(|e| corrupt(archive_path, e))?;
            entries += 1;
        }

        let mut decoder = archive.into_inner();
        io::copy(&mut decoder, &mut io::sink()).map_err(|e| corrupt(archive_path, e))?;

        let root_name = root_name.ok_or_else(|| {
            MailBackupError::corrupt_archive(format!("{}: archive is empty", archive_path.display()))
        })?;

        Ok(ArchiveSummary {
            root_name,
            entries,
            total_bytes,
        })
    }

    /// Inspect an archive and require its top-level member to be `expected_root`
    pub fn verify(&self, archive_path: &Path, expected_root: &str) -> MailBackupResult<ArchiveSummary> {
        let summary = self.inspect(archive_path)?;
        if summary.root_name != expected_root {
            return Err(MailBackupError::corrupt_archive(format!(
                "{}: expected top-level '{}', found '{}'",
                archive_path.display(),
                expected_root,
                summary.root_name
            )));
        }
        Ok(summary)
    }

    /// Unpack an archive under `dest_parent`
    ///
    /// The archive is inspected first, so a corrupt archive fails before
    /// anything is written.
    pub fn extract(&self, archive_path: &Path, dest_parent: &Path) -> MailBackupResult<ArchiveSummary> {
        let summary = self.inspect(archive_path)?;

        fs::create_dir_all(dest_parent)
            .map_err(|e| MailBackupError::archive_io_at("Failed to create", dest_parent, e))?;

        let mut archive = open_archive(archive_path)?;
        archive.set_preserve_permissions(true);
        archive.set_preserve_mtime(true);
        archive
            .unpack(dest_parent)
            .map_err(|e| MailBackupError::archive_io_at("Failed to unpack into", dest_parent, e))?;

        debug!(
            "Extracted {} entries from {} into {}",
            summary.entries,
            archive_path.display(),
            dest_parent.display()
        );
        Ok(summary)
    }
}

/// Make the finished `partial` visible as `dest`
///
/// A hard link fails if `dest` already exists, unlike a rename.
fn publish(partial: &Path, dest: &Path) -> MailBackupResult<()> {
    fs::hard_link(partial, dest).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => MailBackupError::DestinationConflict(dest.to_path_buf()),
        _ => MailBackupError::archive_io_at("Failed to move archive into place at", dest, e),
    })
}

/// `{dest}.partial`
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    dest.with_file_name(name)
}

fn open_archive(archive_path: &Path) -> MailBackupResult<Archive<GzDecoder<BufReader<File>>>> {
    if !archive_path.is_file() {
        return Err(MailBackupError::archive_missing(archive_path));
    }
    let file = File::open(archive_path)
        .map_err(|e| MailBackupError::archive_io_at("Failed to open", archive_path, e))?;
    Ok(Archive::new(GzDecoder::new(BufReader::new(file))))
}

fn corrupt(archive_path: &Path, err: io::Error) -> MailBackupError {
    MailBackupError::corrupt_archive(format!("{}: {}", archive_path.display(), err))
}
