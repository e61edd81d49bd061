//! # The logging facility.
//!
//! [`Console`] exposes the conventional `log` / `warn` / `error` entry points.
//! Each one is an [`EntryPoint`] whose function can be replaced at runtime,
//! which is what the patcher does while subscribers are registered.
//!
//! The process-wide instance is reachable through [`console()`] and the
//! `console_log!`, `console_warn!`, `console_error!` macros. Its default sinks
//! print an inspected rendering of the arguments: `log` to stdout, `warn` and
//! `error` to stderr.
//!
//! ## Example
//! ```rust
//! use logpeek::{console_log, console_warn, Value};
//!
//! console_log!("server ready on port", 8080);
//! console_warn!("Deprecated", Value::object([("a", 1)]));
//! ```

use std::io::Write;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

use super::entry::{Call, EntryFn, EntryPoint};
use crate::record::Level;
use crate::value::{format_args, Value};

static GLOBAL: OnceLock<Arc<Console>> = OnceLock::new();

/// Returns the process-wide console.
pub fn console() -> &'static Arc<Console> {
    GLOBAL.get_or_init(|| Arc::new(Console::new()))
}

/// Logging facility with three swappable entry points.
#[derive(Debug)]
pub struct Console {
    log: EntryPoint,
    warn: EntryPoint,
    error: EntryPoint,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Creates a console printing to stdout (`log`) and stderr (`warn`, `error`).
    pub fn new() -> Self {
        Self::with_sinks(stdout_sink(), stderr_sink(), stderr_sink())
    }

    /// Creates a console with the given initial functions.
    pub fn with_sinks(log: EntryFn, warn: EntryFn, error: EntryFn) -> Self {
        Self {
            log: EntryPoint::new(log),
            warn: EntryPoint::new(warn),
            error: EntryPoint::new(error),
        }
    }

    /// Entry point for `level`.
    pub fn entry(&self, level: Level) -> &EntryPoint {
        match level {
            Level::Log => &self.log,
            Level::Warn => &self.warn,
            Level::Error => &self.error,
        }
    }

    /// Informational output.
    #[track_caller]
    pub fn log(&self, args: &[Value]) {
        self.call(Level::Log, args, Location::caller());
    }

    /// Warning output.
    #[track_caller]
    pub fn warn(&self, args: &[Value]) {
        self.call(Level::Warn, args, Location::caller());
    }

    /// Error output.
    #[track_caller]
    pub fn error(&self, args: &[Value]) {
        self.call(Level::Error, args, Location::caller());
    }

    /// Invokes the function installed for `level`.
    pub fn call(&self, level: Level, args: &[Value], location: &'static Location<'static>) {
        self.entry(level).invoke(&Call { args, location });
    }
}

/// Sink printing one line per call to stdout.
pub fn stdout_sink() -> EntryFn {
    Arc::new(|call: &Call<'_>| {
        let line = format_args(call.args);
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    })
}

/// Sink printing one line per call to stderr.
pub fn stderr_sink() -> EntryFn {
    Arc::new(|call: &Call<'_>| {
        let line = format_args(call.args);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    })
}

/// Calls `log` on the process-wide console.
#[macro_export]
macro_rules! console_log {
    ($($arg:expr),* $(,)?) => {
        $crate::console().log(&[$($crate::Value::from($arg)),*])
    };
}

/// Calls `warn` on the process-wide console.
#[macro_export]
macro_rules! console_warn {
    ($($arg:expr),* $(,)?) => {
        $crate::console().warn(&[$($crate::Value::from($arg)),*])
    };
}

/// Calls `error` on the process-wide console.
#[macro_export]
macro_rules! console_error {
    ($($arg:expr),* $(,)?) => {
        $crate::console().error(&[$($crate::Value::from($arg)),*])
    };
}
