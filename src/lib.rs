//! mailbackup - archive, restore and search mail server mailboxes
//!
//! Works on a virtual-mailbox tree laid out as `{mail_root}/{domain}/{user}`.
//! Old mailboxes are packed into `.tar.gz` archives under a dated directory
//! of the backup root and removed once the archive has been verified.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Roots, settings file and the per-run context
//! - `error`: Custom error types and exit codes
//! - `mailbox`: Mailbox identities, path resolution and directory scanning
//! - `backup`: Archiving, retention, the backup workflow, restore and search
//! - `prompt`: Operator choices, interactive or preset
//! - `display`: Terminal output formatting
//! - `cli`: Command handlers
//! - `logging`: Console and per-run log file setup
//!
//! # Example
//!
//! ```rust,ignore
//! use mailbackup::config::{MailPaths, PathOverrides, RunContext, Settings};
//!
//! let settings = Settings::load_or_default(config_file)?;
//! let paths = MailPaths::resolve(PathOverrides::default(), &settings);
//! let ctx = RunContext::new(paths, false);
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod mailbox;
pub mod prompt;

pub use error::{MailBackupError, MailBackupResult};
