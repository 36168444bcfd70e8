//! Display formatting for terminal output
//!
//! Run summaries are rendered as tables; search results as plain paths.

pub mod report;

pub use report::{format_backup_report, format_restore_outcome, format_search_results, format_size};
