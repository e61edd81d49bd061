//! # Branded terminal logger.
//!
//! [`StyledLogger`] prefixes every call with a colored badge, an optional
//! level tag and the local wall-clock time, then forwards the arguments to a
//! [`Console`]. The prefix is plain ANSI styling, which is exactly what the
//! sanitizer strips when the call is captured:
//!
//! ```text
//! terminal: ␛[44m␛[37m app ␛[0m ␛[33m[WARN]␛[0m ␛[2m14:03:22␛[0m disk almost full
//! record:   "app [WARN] 14:03:22", "disk almost full"
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use super::console::Console;
use crate::value::Value;

const RESET: &str = "\x1b[0m";
const BRIGHT: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const WHITE: &str = "\x1b[37m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const BG_BLUE: &str = "\x1b[44m";
const BG_YELLOW: &str = "\x1b[43m";
const BG_RED: &str = "\x1b[41m";

/// Logger writing a styled prefix ahead of the arguments.
#[derive(Debug, Clone)]
pub struct StyledLogger {
    console: Arc<Console>,
    name: Cow<'static, str>,
}

impl StyledLogger {
    /// Creates a logger named `name` writing to `console`.
    pub fn new(console: Arc<Console>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            console,
            name: name.into(),
        }
    }

    /// Badge-only prefix, written to `log`.
    #[track_caller]
    pub fn log(&self, args: &[Value]) {
        let prefix = format!("{BG_BLUE}{WHITE} {} {RESET} {DIM}{}{RESET}", self.name, now());
        self.console.log(&with_prefix(prefix, args));
    }

    /// Informational prefix, written to `log`.
    #[track_caller]
    pub fn info(&self, args: &[Value]) {
        let prefix = format!(
            "{MAGENTA}{BRIGHT}{}{RESET} {CYAN}[INFO]{RESET} {DIM}{}{RESET}",
            self.name,
            now()
        );
        self.console.log(&with_prefix(prefix, args));
    }

    /// Warning prefix, written to `warn`.
    #[track_caller]
    pub fn warn(&self, args: &[Value]) {
        let prefix = format!(
            "{BG_YELLOW}{WHITE} {} {RESET} {YELLOW}[WARN]{RESET} {DIM}{}{RESET}",
            self.name,
            now()
        );
        self.console.warn(&with_prefix(prefix, args));
    }

    /// Error prefix, written to `error`.
    #[track_caller]
    pub fn error(&self, args: &[Value]) {
        let prefix = format!(
            "{BG_RED}{WHITE} {} {RESET} {RED}[ERROR]{RESET} {DIM}{}{RESET}",
            self.name,
            now()
        );
        self.console.error(&with_prefix(prefix, args));
    }
}

fn now() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn with_prefix(prefix: String, args: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(args.len() + 1);
    out.push(Value::String(prefix));
    out.extend(args.iter().cloned());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::entry::{Call, EntryFn};
    use crate::sanitize::sanitize;
    use parking_lot::Mutex;

    #[test]
    fn prefix_is_styled_and_sanitizes_to_plain_text() {
        let seen: Arc<Mutex<Vec<Vec<Value>>>> = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let sink: EntryFn = Arc::new(move |call: &Call<'_>| s.lock().push(call.args.to_vec()));
        let console = Arc::new(Console::with_sinks(Arc::clone(&sink), Arc::clone(&sink), sink));

        StyledLogger::new(console, "app").warn(&[Value::from("disk almost full")]);

        let calls = seen.lock();
        let prefix = calls[0][0].as_str().unwrap();
        assert!(prefix.contains("\x1b[43m"));
        let clean = sanitize(prefix);
        assert!(clean.starts_with("app [WARN] "), "{clean}");
        assert_eq!(calls[0][1].as_str(), Some("disk almost full"));
    }
}
