//! Custom error types for mailbackup
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// What went wrong inside the archive layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveErrorKind {
    /// Reading the source tree or writing the archive failed
    IoFailure,
    /// The archive is malformed, truncated, or not laid out as expected
    CorruptArchive,
}

impl std::fmt::Display for ArchiveErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoFailure => write!(f, "I/O failure"),
            Self::CorruptArchive => write!(f, "corrupt archive"),
        }
    }
}

/// The main error type for mailbackup operations
#[derive(Error, Debug)]
pub enum MailBackupError {
    /// Bad user input (age value, archive name, flag combination)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A domain or user name that would escape its parent directory
    #[error("Invalid path component: {0}")]
    InvalidPath(String),

    /// A mailbox, archive, or root directory does not exist
    #[error("{what} not found: {}", .path.display())]
    SourceMissing { what: &'static str, path: PathBuf },

    /// Target exists and may not be replaced: a restore destination whose
    /// overwrite was declined, or an archive file already on disk
    #[error("Destination already exists: {}", .0.display())]
    DestinationConflict(PathBuf),

    /// Archive creation, inspection or extraction failed
    #[error("Archive error ({kind}): {message}")]
    Archive {
        kind: ArchiveErrorKind,
        message: String,
    },

    /// The operating system refused access
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Other file I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The user (or a prompt) cancelled the operation
    #[error("Aborted: {0}")]
    Aborted(String),
}

impl MailBackupError {
    /// Create a "source missing" error for a mailbox directory
    pub fn mailbox_missing(path: impl Into<PathBuf>) -> Self {
        Self::SourceMissing {
            what: "Mailbox",
            path: path.into(),
        }
    }

    /// Create a "source missing" error for an archive file
    pub fn archive_missing(path: impl Into<PathBuf>) -> Self {
        Self::SourceMissing {
            what: "Archive",
            path: path.into(),
        }
    }

    /// Create a "source missing" error for a root directory
    pub fn root_missing(path: impl Into<PathBuf>) -> Self {
        Self::SourceMissing {
            what: "Directory",
            path: path.into(),
        }
    }

    pub fn corrupt_archive(message: impl Into<String>) -> Self {
        Self::Archive {
            kind: ArchiveErrorKind::CorruptArchive,
            message: message.into(),
        }
    }

    /// Wrap an I/O error raised while operating on `path`
    ///
    /// Permission problems keep their own variant; everything else becomes
    /// `Io` with the path and action in the message.
    pub fn io_at(action: &str, path: &Path, err: io::Error) -> Self {
        let message = format!("{} {}: {}", action, path.display(), err);
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(message),
            _ => Self::Io(message),
        }
    }

    /// Same as [`io_at`](Self::io_at), but non-permission failures are
    /// reported as archive I/O failures.
    pub fn archive_io_at(action: &str, path: &Path, err: io::Error) -> Self {
        let message = format!("{} {}: {}", action, path.display(), err);
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(message),
            _ => Self::Archive {
                kind: ArchiveErrorKind::IoFailure,
                message,
            },
        }
    }

    /// Check if this is a "source missing" error
    pub fn is_source_missing(&self) -> bool {
        matches!(self, Self::SourceMissing { .. })
    }

    /// Check if this archive error has the given kind
    pub fn is_archive(&self, expected: ArchiveErrorKind) -> bool {
        matches!(self, Self::Archive { kind, .. } if *kind == expected)
    }

    /// Process exit status for this error, following `sysexits.h`
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::InvalidPath(_) => EX_USAGE,
            Self::Archive {
                kind: ArchiveErrorKind::CorruptArchive,
                ..
            } => EX_DATAERR,
            Self::SourceMissing { .. } => EX_NOINPUT,
            Self::DestinationConflict(_) => EX_CANTCREAT,
            Self::Archive {
                kind: ArchiveErrorKind::IoFailure,
                ..
            }
            | Self::Io(_) => EX_IOERR,
            Self::Aborted(_) => EX_TEMPFAIL,
            Self::PermissionDenied(_) => EX_NOPERM,
            Self::Config(_) => EX_CONFIG,
        }
    }
}

// Exit statuses from sysexits.h
pub const EX_USAGE: i32 = 64;
pub const EX_DATAERR: i32 = 65;
pub const EX_NOINPUT: i32 = 66;
pub const EX_CANTCREAT: i32 = 73;
pub const EX_IOERR: i32 = 74;
pub const EX_TEMPFAIL: i32 = 75;
pub const EX_NOPERM: i32 = 77;
pub const EX_CONFIG: i32 = 78;

impl From<io::Error> for MailBackupError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Result type alias for mailbackup operations
pub type MailBackupResult<T> = Result<T, MailBackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MailBackupError::InvalidArgument("age must be a whole number".into());
        assert_eq!(
            err.to_string(),
            "Invalid argument: age must be a whole number"
        );
    }

    #[test]
    fn test_source_missing_error() {
        let err = MailBackupError::archive_missing("/backup/mail/x.tar.gz");
        assert_eq!(err.to_string(), "Archive not found: /backup/mail/x.tar.gz");
        assert!(err.is_source_missing());
        assert_eq!(err.exit_code(), EX_NOINPUT);
    }

    #[test]
    fn test_archive_error_kinds() {
        let err = MailBackupError::corrupt_archive("truncated gzip stream");
        assert!(err.is_archive(ArchiveErrorKind::CorruptArchive));
        assert!(!err.is_archive(ArchiveErrorKind::IoFailure));
        assert_eq!(
            err.to_string(),
            "Archive error (corrupt archive): truncated gzip stream"
        );
        assert_eq!(err.exit_code(), EX_DATAERR);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: MailBackupError = io_err.into();
        assert!(matches!(err, MailBackupError::Io(_)));

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err: MailBackupError = io_err.into();
        assert!(matches!(err, MailBackupError::PermissionDenied(_)));
        assert_eq!(err.exit_code(), EX_NOPERM);
    }

    #[test]
    fn test_archive_io_at_keeps_permission_denied() {
        let path = Path::new("/backup/mail/2024-01-01");
        let err = MailBackupError::archive_io_at(
            "Failed to create",
            path,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, MailBackupError::PermissionDenied(_)));

        let err = MailBackupError::archive_io_at(
            "Failed to create",
            path,
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(err.is_archive(ArchiveErrorKind::IoFailure));
        assert!(err.to_string().contains("/backup/mail/2024-01-01"));
    }
}
