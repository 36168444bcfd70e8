//! Log setup
//!
//! Every run logs to the console (stderr) and to its own file under the log
//! directory. If the log file can't be opened the run continues with console
//! output only.

use std::fs;
use std::path::PathBuf;

use log::{warn, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;

use crate::config::RunContext;
use crate::error::{MailBackupError, MailBackupResult};

/// Line layout shared by console and file output
pub const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";

/// A log4rs configuration plus what became of the file appender
pub struct LogSetup {
    pub config: Config,
    /// The run's log file, unless it couldn't be opened
    pub log_file: Option<PathBuf>,
    /// Why the file appender was left out
    pub problem: Option<String>,
}

/// Build the log4rs configuration for a run
pub fn build_config(ctx: &RunContext, level: LevelFilter) -> MailBackupResult<LogSetup> {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut builder = Config::builder().appender(
        Appender::builder()
            .filter(Box::new(ThresholdFilter::new(level)))
            .build("console", Box::new(console)),
    );
    let mut root = Root::builder().appender("console");

    let log_file = ctx.log_file();
    let file = fs::create_dir_all(ctx.paths.log_dir()).and_then(|_| {
        FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .append(true)
            .build(&log_file)
    });

    let (log_file, problem) = match file {
        Ok(file) => {
            builder = builder.appender(Appender::builder().build("file", Box::new(file)));
            root = root.appender("file");
            (Some(log_file), None)
        }
        Err(e) => (
            None,
            Some(format!(
                "Cannot write log file {}: {}; logging to console only",
                log_file.display(),
                e
            )),
        ),
    };

    let config = builder
        .build(root.build(level))
        .map_err(|e| MailBackupError::Config(format!("Invalid log configuration: {}", e)))?;

    Ok(LogSetup {
        config,
        log_file,
        problem,
    })
}

/// Install the global logger for this run
pub fn init(ctx: &RunContext, level: LevelFilter) -> MailBackupResult<Option<PathBuf>> {
    let setup = build_config(ctx, level)?;
    log4rs::init_config(setup.config)
        .map_err(|e| MailBackupError::Config(format!("Failed to install logger: {}", e)))?;

    if let Some(problem) = setup.problem {
        warn!("{}", problem);
    }
    Ok(setup.log_file)
}
