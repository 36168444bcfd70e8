//! Settings file for mailbackup
//!
//! An optional JSON file (default `/etc/mailbackup/config.json`) that can pin
//! the roots, the default minimum mailbox age, the gzip level and the log level.
//! A missing file means built-in defaults.

use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

use crate::error::MailBackupError;

pub const DEFAULT_CONFIG_FILE: &str = "/etc/mailbackup/config.json";

/// User settings for mailbackup
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Minimum mailbox age (days) offered as the default at the age prompt
    #[serde(default = "default_min_age_days")]
    pub default_min_age_days: u32,

    /// Log level for console and file output (`error` .. `trace`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// gzip level for new archives (0-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    #[serde(default)]
    pub mail_root: Option<PathBuf>,

    #[serde(default)]
    pub backup_root: Option<PathBuf>,

    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_min_age_days() -> u32 {
    90
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_compression_level() -> u32 {
    6
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_min_age_days: default_min_age_days(),
            log_level: default_log_level(),
            compression_level: default_compression_level(),
            mail_root: None,
            backup_root: None,
            log_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self, MailBackupError> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MailBackupError::Config(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            MailBackupError::Config(format!(
                "Failed to parse settings file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// `compression_level`, rejected if outside 0-9
    pub fn compression(&self) -> Result<u32, MailBackupError> {
        if self.compression_level > 9 {
            return Err(MailBackupError::Config(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        Ok(self.compression_level)
    }

    /// Parse `log_level` into a filter
    pub fn level_filter(&self) -> Result<LevelFilter, MailBackupError> {
        self.log_level.parse().map_err(|_| {
            MailBackupError::Config(format!("Unknown log level '{}'", self.log_level))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_min_age_days, 90);
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::Info);
        assert!(settings.mail_root.is_none());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(&temp_dir.path().join("none.json")).unwrap();
        assert_eq!(settings.default_min_age_days, 90);
    }

    #[test]
    fn test_load_full_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "default_min_age_days": 30,
                "log_level": "debug",
                "compression_level": 9,
                "backup_root": "/srv/backup"
            }"#,
        )
        .unwrap();

        let loaded = Settings::load_or_default(&path).unwrap();
        assert_eq!(loaded.default_min_age_days, 30);
        assert_eq!(loaded.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(loaded.compression().unwrap(), 9);
        assert_eq!(loaded.backup_root, Some(PathBuf::from("/srv/backup")));
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "mail_root": "/srv/vmail" }"#).unwrap();

        let loaded = Settings::load_or_default(&path).unwrap();
        assert_eq!(loaded.default_min_age_days, 90);
        assert_eq!(loaded.mail_root, Some(PathBuf::from("/srv/vmail")));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_or_default(&path).unwrap_err();
        assert!(matches!(err, MailBackupError::Config(_)));
    }

    #[test]
    fn test_compression_range() {
        assert_eq!(Settings::default().compression().unwrap(), 6);
        let settings = Settings {
            compression_level: 12,
            ..Settings::default()
        };
        assert!(matches!(
            settings.compression().unwrap_err(),
            MailBackupError::Config(_)
        ));
    }

    #[test]
    fn test_bad_log_level() {
        let settings = Settings {
            log_level: "loud".into(),
            ..Settings::default()
        };
        assert!(settings.level_filter().is_err());
    }
}
