//! Mailboxes on disk
//!
//! - `resolver`: mailbox identity, directory and archive name resolution
//! - `scan`: domain and mailbox discovery under the mail root

pub mod resolver;
pub mod scan;

pub use resolver::{ArchiveName, MailboxId, PathResolver, ARCHIVE_EXTENSION};
pub use scan::{list_domains, list_mailboxes, Mailbox};
