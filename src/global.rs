//! Process-wide default logger
//!
//! A convenience for applications that do not want to pass a [`Logger`]
//! around. The instance is created on first use, writing to stdout, and is
//! replaced as a whole when the destination changes; the previous instance is
//! closed (and drained) before the new one is installed. Concurrent
//! replacement is last-writer-wins.
//!
//! ```no_run
//! use rust_async_logger::global;
//!
//! global::set_log_file(Some("/var/log/app.log".as_ref())).unwrap();
//! global::info("service started");
//! rust_async_logger::warn!("disk {}% full", 91);
//! global::close().unwrap();
//! ```

use crate::core::{CallSite, LevelMask, LogLevel, Logger, LoggerConfig, Result};
#[cfg(feature = "file")]
use crate::core::OutputTarget;
use parking_lot::RwLock;
use std::fmt;
#[cfg(feature = "file")]
use std::path::Path;
use std::sync::Arc;

static DEFAULT_LOGGER: RwLock<Option<Arc<Logger>>> = parking_lot::const_rwlock(None);

fn stdout_logger(level: LevelMask) -> Result<Logger> {
    Logger::builder().level(level).build()
}

/// The current default logger, starting a stdout logger on first use
///
/// # Errors
///
/// Returns error only if the first-use logger cannot start its thread
pub fn default_logger() -> Result<Arc<Logger>> {
    if let Some(logger) = DEFAULT_LOGGER.read().as_ref() {
        return Ok(Arc::clone(logger));
    }

    let mut slot = DEFAULT_LOGGER.write();
    if let Some(logger) = slot.as_ref() {
        return Ok(Arc::clone(logger));
    }
    let logger = Arc::new(stdout_logger(LevelMask::ALL)?);
    *slot = Some(Arc::clone(&logger));
    Ok(logger)
}

fn close_replaced(previous: Option<Arc<Logger>>) {
    if let Some(previous) = previous {
        if let Err(e) = previous.close() {
            eprintln!("[LOGGER ERROR] Failed to close replaced default logger: {}", e);
        }
    }
}

/// Install `logger` as the default, closing the previous one first
pub fn set_default(logger: Logger) {
    let mut slot = DEFAULT_LOGGER.write();
    close_replaced(slot.take());
    *slot = Some(Arc::new(logger));
}

/// Route the default logger to a daily-rotated file, or to stdout for `None`.
///
/// The enabled levels carry over to the new instance.
///
/// # Errors
///
/// Returns the file handler's error. The default logger then writes to
/// stdout instead, so the process is never left without one.
#[cfg(feature = "file")]
pub fn set_log_file(path: Option<&Path>) -> Result<()> {
    let target = match path {
        Some(path) => OutputTarget::daily_file(path),
        None => OutputTarget::Stdout,
    };

    replace_default(|level| {
        let opened = target
            .open()
            .and_then(|handler| Logger::builder().boxed_handler(handler).level(level).build());
        match opened {
            Ok(logger) => Ok((logger, Ok(()))),
            Err(e) => {
                eprintln!("[LOGGER ERROR] Cannot open log file, falling back to stdout: {}", e);
                Ok((stdout_logger(level)?, Err(e)))
            }
        }
    })
}

/// Install the logger `build` makes from the current level mask.
///
/// The previous default is closed only once its replacement is running; if
/// `build` fails, it stays installed. On success the second element of the
/// built pair is returned.
fn replace_default<F>(build: F) -> Result<()>
where
    F: FnOnce(LevelMask) -> Result<(Logger, Result<()>)>,
{
    let mut slot = DEFAULT_LOGGER.write();
    let level = slot.as_ref().map_or(LevelMask::ALL, |l| l.level());
    let (logger, outcome) = build(level)?;

    close_replaced(slot.take());
    *slot = Some(Arc::new(logger));
    outcome
}

/// Replace the default logger with one built from `config`
///
/// # Errors
///
/// Returns error if the configuration is invalid or its output cannot be
/// opened; the current default stays in place in that case.
pub fn configure(config: &LoggerConfig) -> Result<()> {
    replace_default(|_| Ok((config.build()?, Ok(()))))
}

pub fn set_level(level: impl Into<LevelMask>) {
    if let Ok(logger) = default_logger() {
        logger.set_level(level);
    }
}

pub fn level() -> LevelMask {
    default_logger().map_or(LevelMask::NONE, |l| l.level())
}

/// Drain and close the default logger; later records are dropped
///
/// # Errors
///
/// Returns the handler's close error
pub fn close() -> Result<()> {
    let current = DEFAULT_LOGGER.read().as_ref().map(Arc::clone);
    match current {
        Some(logger) => logger.close(),
        None => Ok(()),
    }
}

pub fn log_at(level: LogLevel, call_site: CallSite, message: impl fmt::Display) {
    if let Ok(logger) = default_logger() {
        logger.log_at(level, call_site, message);
    }
}

#[track_caller]
pub fn debug(message: impl fmt::Display) {
    log_at(LogLevel::Debug, CallSite::caller(), message);
}

#[track_caller]
pub fn info(message: impl fmt::Display) {
    log_at(LogLevel::Info, CallSite::caller(), message);
}

#[track_caller]
pub fn warn(message: impl fmt::Display) {
    log_at(LogLevel::Warn, CallSite::caller(), message);
}

#[track_caller]
pub fn error(message: impl fmt::Display) {
    log_at(LogLevel::Error, CallSite::caller(), message);
}

pub fn debug_line_at(call_site: CallSite, message: impl fmt::Display) {
    if let Ok(logger) = default_logger() {
        logger.debug_line_at(call_site, message);
    }
}

#[track_caller]
pub fn debug_line(message: impl fmt::Display) {
    debug_line_at(CallSite::caller(), message);
}
