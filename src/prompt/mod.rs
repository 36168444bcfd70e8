//! Operator choices
//!
//! The backup and restore workflows never talk to the terminal directly.
//! They ask a [`SelectionProvider`] which domains to process, how old a
//! mailbox must be, and whether to go ahead with destructive steps.
//!
//! - [`TerminalPrompt`]: asks on stdin/stdout
//! - [`PresetSelection`]: answers from command-line flags (batch mode, tests)

pub mod preset;
pub mod terminal;

pub use preset::PresetSelection;
pub use terminal::TerminalPrompt;

use crate::error::MailBackupResult;

pub trait SelectionProvider {
    /// Pick the domains to process out of `available` (sorted)
    fn select_domains(&mut self, available: &[String]) -> MailBackupResult<Vec<String>>;

    /// Minimum mailbox age in days; `default` is what a blank answer means
    fn prompt_min_age(&mut self, default: u32) -> MailBackupResult<u32>;

    /// Yes/no question before a destructive step
    fn confirm(&mut self, message: &str) -> MailBackupResult<bool>;
}
