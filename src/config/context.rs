//! Per-run context
//!
//! Everything that is fixed for the lifetime of one invocation: the roots, the
//! moment the run started (which names every archive and the log file), and
//! whether the run is a dry run.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::paths::MailPaths;

/// Format of the batch timestamp embedded in archive and log file names
pub const BATCH_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Format of the dated directory under the backup root
pub const RUN_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct RunContext {
    pub paths: MailPaths,
    pub started_at: DateTime<Local>,
    pub dry_run: bool,
}

impl RunContext {
    /// Start a run now
    pub fn new(paths: MailPaths, dry_run: bool) -> Self {
        Self::started_at(paths, Local::now(), dry_run)
    }

    /// Start a run at a fixed instant (useful for testing)
    pub fn started_at(paths: MailPaths, started_at: DateTime<Local>, dry_run: bool) -> Self {
        Self {
            paths,
            started_at,
            dry_run,
        }
    }

    /// The timestamp shared by every archive this run creates
    pub fn batch_timestamp(&self) -> String {
        self.started_at.format(BATCH_TIMESTAMP_FORMAT).to_string()
    }

    /// `{backup_root}/{YYYY-MM-DD}` for this run
    pub fn run_backup_dir(&self) -> PathBuf {
        self.paths
            .backup_root()
            .join(self.started_at.format(RUN_DATE_FORMAT).to_string())
    }

    /// `{log_dir}/mailbackup_{timestamp}.log` for this run
    pub fn log_file(&self) -> PathBuf {
        self.paths
            .log_dir()
            .join(format!("mailbackup_{}.log", self.batch_timestamp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_context() -> RunContext {
        let paths = MailPaths::with_roots("/var/mail/vhosts", "/backup/mail", "/var/log/mailbackup");
        let started_at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RunContext::started_at(paths, started_at, false)
    }

    #[test]
    fn test_batch_timestamp() {
        assert_eq!(fixed_context().batch_timestamp(), "2024-01-01_00-00-00");
    }

    #[test]
    fn test_run_backup_dir() {
        assert_eq!(
            fixed_context().run_backup_dir(),
            PathBuf::from("/backup/mail/2024-01-01")
        );
    }

    #[test]
    fn test_log_file() {
        assert_eq!(
            fixed_context().log_file(),
            PathBuf::from("/var/log/mailbackup/mailbackup_2024-01-01_00-00-00.log")
        );
    }
}
