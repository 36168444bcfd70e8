//! Restore command

use std::path::Path;

use crate::backup::{RestoreOutcome, RestoreWorkflow};
use crate::config::RunContext;
use crate::display::format_restore_outcome;
use crate::error::MailBackupResult;
use crate::prompt::{PresetSelection, SelectionProvider, TerminalPrompt};

/// Restore one archive and print where it went
///
/// `force` answers the overwrite question with yes. In batch mode nothing is
/// asked, so an existing mailbox is only replaced with `force`.
pub fn handle_restore(
    ctx: &RunContext,
    archive: &Path,
    force: bool,
    batch: bool,
) -> MailBackupResult<RestoreOutcome> {
    let mut provider: Box<dyn SelectionProvider> = if batch {
        Box::new(PresetSelection::default().with_assume_yes(force))
    } else {
        Box::new(TerminalPrompt::stdio(force))
    };

    let outcome = RestoreWorkflow::new(ctx).restore(archive, provider.as_mut())?;
    print!("{}", format_restore_outcome(&outcome));
    Ok(outcome)
}
