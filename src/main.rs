use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};

use mailbackup::cli::{handle_backup, handle_restore, handle_search, BackupOptions};
use mailbackup::config::settings::DEFAULT_CONFIG_FILE;
use mailbackup::config::{MailPaths, PathOverrides, RunContext, Settings};
use mailbackup::MailBackupError;

#[derive(Parser)]
#[command(
    name = "mailbackup",
    author = "Kaylee Beyene",
    version,
    about = "Archive, restore and search mail server mailboxes",
    long_about = "mailbackup packs old mailboxes under the virtual mail root into \
                  dated .tar.gz archives and removes them once the archive has been \
                  verified. Archives can be searched by name and restored in place."
)]
struct Cli {
    /// Log what would happen without writing archives or deleting mailboxes
    #[arg(long)]
    dry_run: bool,

    /// Restore the mailbox contained in this archive
    #[arg(long, value_name = "ARCHIVE", conflicts_with = "search")]
    restore: Option<PathBuf>,

    /// Print archives whose file name contains TERM
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    /// Don't prompt; select domains and age from flags
    #[arg(long)]
    batch: bool,

    /// Domain to process in batch mode (repeatable, default all)
    #[arg(long = "domain", value_name = "NAME", requires = "batch")]
    domains: Vec<String>,

    /// Minimum mailbox age in days for batch mode
    #[arg(long, value_name = "DAYS", requires = "batch")]
    min_age: Option<u32>,

    /// Answer yes to the backup confirmation
    #[arg(short, long)]
    yes: bool,

    /// Replace an existing mailbox when restoring
    #[arg(short, long, requires = "restore")]
    force: bool,

    /// Root of the per-domain mailbox directories
    #[arg(long, env = "MAILBACKUP_MAIL_ROOT", value_name = "DIR")]
    mail_root: Option<PathBuf>,

    /// Where dated archive directories are written
    #[arg(long, env = "MAILBACKUP_BACKUP_ROOT", value_name = "DIR")]
    backup_root: Option<PathBuf>,

    /// Where the per-run log file is written
    #[arg(long, env = "MAILBACKUP_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Settings file
    #[arg(
        long,
        env = "MAILBACKUP_CONFIG",
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            let code = err
                .downcast_ref::<MailBackupError>()
                .map(MailBackupError::exit_code)
                .unwrap_or(1);
            if log::max_level() == LevelFilter::Off {
                eprintln!("Error: {:#}", err);
            } else {
                error!("{:#}", err);
            }
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load_or_default(&cli.config)?;
    let level = settings.level_filter()?;

    let overrides = PathOverrides {
        mail_root: cli.mail_root,
        backup_root: cli.backup_root,
        log_dir: cli.log_dir,
    };
    let ctx = RunContext::new(MailPaths::resolve(overrides, &settings), cli.dry_run);

    let log_file = mailbackup::logging::init(&ctx, level)?;
    if let Some(log_file) = log_file {
        info!("Log file: {}", log_file.display());
    }
    if ctx.dry_run {
        info!("[DRY RUN] No archives will be written and nothing will be deleted");
    }

    if let Some(archive) = cli.restore {
        handle_restore(&ctx, &archive, cli.force, cli.batch)
            .with_context(|| format!("Restore of {} failed", archive.display()))?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(term) = cli.search {
        handle_search(&ctx, &term)?;
        return Ok(ExitCode::SUCCESS);
    }

    let opts = BackupOptions {
        batch: cli.batch,
        domains: cli.domains,
        min_age_days: cli.min_age,
        assume_yes: cli.yes,
    };
    let report = handle_backup(&ctx, &settings, &opts)?;

    if report.has_failures() {
        error!("{} mailbox(es) failed, see above", report.failed());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
