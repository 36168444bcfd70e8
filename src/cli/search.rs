//! Search command

use std::path::PathBuf;

use log::info;

use crate::backup::search_archives;
use crate::config::RunContext;
use crate::display::format_search_results;
use crate::error::MailBackupResult;

/// Print every archive whose name contains `term`
pub fn handle_search(ctx: &RunContext, term: &str) -> MailBackupResult<Vec<PathBuf>> {
    let found: Vec<PathBuf> = search_archives(ctx.paths.backup_root(), term)?.collect();
    info!(
        "Search for '{}' under {}: {} archive(s)",
        term,
        ctx.paths.backup_root().display(),
        found.len()
    );
    println!("{}", format_search_results(term, &found));
    Ok(found)
}
