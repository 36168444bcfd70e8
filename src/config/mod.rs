//! Configuration module for mailbackup
//!
//! This module provides configuration management including:
//! - Root directory resolution (flags, environment, settings file, defaults)
//! - The optional JSON settings file
//! - The per-run context shared by every workflow

pub mod context;
pub mod paths;
pub mod settings;

pub use context::RunContext;
pub use paths::{MailPaths, PathOverrides};
pub use settings::Settings;
