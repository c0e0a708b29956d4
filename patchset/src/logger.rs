//! Logging module.
//!
//! Command line tools print their results on `stdout`, so log lines go to
//! `stderr`.
use std::io;
use std::io::Write;

use chrono::prelude::*;
use colored::*;
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// A logger that logs to `stderr`.
pub struct StderrLogger {
    level: Level,
}

impl StderrLogger {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    fn format(&self, record: &Record, time: DateTime<Local>) -> String {
        format!(
            "{} {:<5} {:<8} {}",
            time.format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = self.format(record, Local::now());
        let message = match record.level() {
            Level::Error => message.red(),
            Level::Warn => message.yellow(),
            _ => message.dimmed(),
        };
        writeln!(&mut io::stderr(), "{message}").ok();
    }

    fn flush(&self) {}
}

/// Set a logger.
pub fn set(logger: impl Log + 'static, level: Level) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level.to_level_filter());

    Ok(())
}

/// Get the level set by the environment variable `RUST_LOG`, if
/// present.
pub fn env_level() -> Option<Level> {
    let level = std::env::var("RUST_LOG").ok()?;
    level.parse().ok()
}
