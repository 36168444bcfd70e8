//! Mailbox backup, restore and search
//!
//! # Architecture
//!
//! - `ArchiveManager`: writes, verifies and extracts `.tar.gz` archives
//! - `BackupWorkflow`: archives old mailboxes and removes them once verified
//! - `RestoreWorkflow`: puts an archived mailbox back under the mail root
//! - `search_archives`: finds archives by file name
//!
//! # Layout
//!
//! Each run writes into a dated directory under the backup root:
//!
//! ```text
//! /backup/mail/2024-03-01/example.com_alice_2024-03-01_02-00-00.tar.gz
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use mailbackup::backup::BackupWorkflow;
//! use mailbackup::config::RunContext;
//! use mailbackup::prompt::PresetSelection;
//!
//! let ctx = RunContext::new(paths, false);
//! let report = BackupWorkflow::new(&ctx, 90)
//!     .run(&mut PresetSelection::everything())?;
//! println!("{}", report.summary());
//! ```

pub mod archive;
pub mod restore;
pub mod retention;
pub mod search;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testutil;

pub use archive::{ArchiveManager, ArchiveSummary};
pub use restore::{RestoreOutcome, RestoreWorkflow};
pub use retention::{age_in_days, is_eligible_for_deletion, parse_min_age};
pub use search::search_archives;
pub use workflow::{BackupReport, BackupWorkflow, MailboxReport, Outcome, Stage};
