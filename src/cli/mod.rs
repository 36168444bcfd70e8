//! CLI command handlers
//!
//! Bridges the parsed command line with the backup, restore and search
//! workflows and prints their results.

pub mod backup;
pub mod restore;
pub mod search;

pub use backup::{handle_backup, BackupOptions};
pub use restore::handle_restore;
pub use search::handle_search;
