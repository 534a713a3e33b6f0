/// Forge - process-wide services shared by every render_forge object
///
/// Holds the global logger and decides what happens when a precondition
/// fails. The logger is stored in a `OnceLock<RwLock<..>>` so it can be
/// replaced at runtime from any thread.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Entry point for logging and precondition handling
///
/// # Example
///
/// ```no_run
/// use render_forge::forge::{Forge, log::{Logger, LogEntry}};
///
/// struct QuietLogger;
/// impl Logger for QuietLogger {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// Forge::set_logger(QuietLogger);
/// // ... build and create render passes ...
/// Forge::reset_logger();
/// ```
pub struct Forge;

impl Forge {
    /// Replace the current logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Log a message without file:line information
    ///
    /// Used by `forge_trace!`, `forge_debug!`, `forge_info!` and `forge_warn!`.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log a message with file:line information
    ///
    /// Used by `forge_error!`, `forge_err!` and `forge_assert!`.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }

    /// Whether failed preconditions return early instead of panicking
    pub const fn is_graceful_assert() -> bool {
        cfg!(feature = "graceful-assert")
    }

    /// Report a failed precondition
    ///
    /// Always logs the message as an error. Panics unless render_forge was
    /// built with the `graceful-assert` feature, in which case the caller is
    /// expected to return early.
    pub fn precondition_failed(source: &str, message: String, file: &'static str, line: u32) {
        Self::log_detailed(LogSeverity::Error, source, message.clone(), file, line);
        if !Self::is_graceful_assert() {
            panic!("{}", message);
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
