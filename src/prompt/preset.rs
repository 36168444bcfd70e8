//! Non-interactive answers

use log::info;

use super::SelectionProvider;
use crate::error::MailBackupResult;

/// Answers fixed up front, e.g. from `--batch --domain ... --min-age ...`
#[derive(Debug, Clone, Default)]
pub struct PresetSelection {
    /// Domains to process; `None` selects every available domain
    pub domains: Option<Vec<String>>,
    /// Minimum age; `None` takes the default offered by the workflow
    pub min_age_days: Option<u32>,
    /// Answer to every confirmation
    pub assume_yes: bool,
    /// Confirmation messages that were asked, in order
    pub asked: Vec<String>,
}

impl PresetSelection {
    /// Select every domain and confirm everything
    pub fn everything() -> Self {
        Self {
            assume_yes: true,
            ..Self::default()
        }
    }

    pub fn with_domains(mut self, domains: Vec<String>) -> Self {
        self.domains = Some(domains);
        self
    }

    pub fn with_min_age(mut self, days: u32) -> Self {
        self.min_age_days = Some(days);
        self
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }
}

impl SelectionProvider for PresetSelection {
    fn select_domains(&mut self, available: &[String]) -> MailBackupResult<Vec<String>> {
        Ok(self.domains.clone().unwrap_or_else(|| available.to_vec()))
    }

    fn prompt_min_age(&mut self, default: u32) -> MailBackupResult<u32> {
        Ok(self.min_age_days.unwrap_or(default))
    }

    fn confirm(&mut self, message: &str) -> MailBackupResult<bool> {
        info!(
            "{} -> {}",
            message,
            if self.assume_yes { "yes" } else { "no" }
        );
        self.asked.push(message.to_string());
        Ok(self.assume_yes)
    }
}
