//! Capture-time call stacks for error records.
//!
//! The first line is always the call site (taken from `#[track_caller]`), so
//! a stack is never empty even when backtraces are unsupported or symbols are
//! stripped. It is followed by at most `frames` backtrace frames, skipping the
//! leading frames that belong to the backtrace machinery or to this crate.
//!
//! ```text
//! Error
//!     at src/main.rs:12:5
//!     at app::load_config (./src/config.rs:40:9)
//!     at app::main (./src/main.rs:12:5)
//! ```

use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::LazyLock;

use regex::Regex;

static FRAME_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+:\s+(.+)$").expect("valid frame pattern"));
static FRAME_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*at\s+(.+)$").expect("valid location pattern"));

/// Symbol prefixes skipped at the top of a backtrace.
const INTERNAL_PREFIXES: [&str; 7] = [
    "std::backtrace",
    "backtrace::",
    "logpeek::",
    "<logpeek::",
    "<alloc::",
    "core::ops::function",
    "<core::",
];

/// Builds the stack string for a capture at `location`.
pub(crate) fn capture(location: &Location<'_>, frames: usize) -> String {
    let mut out = format!(
        "Error\n    at {}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    );
    if frames == 0 {
        return out;
    }
    let trace = Backtrace::force_capture().to_string();
    for frame in parse_frames(&trace)
        .into_iter()
        .skip_while(|f| is_internal(&f.symbol))
        .take(frames)
    {
        out.push_str("\n    at ");
        out.push_str(&frame.symbol);
        if let Some(loc) = frame.location {
            out.push_str(" (");
            out.push_str(&loc);
            out.push(')');
        }
    }
    out
}

#[derive(Debug, PartialEq)]
struct Frame {
    symbol: String,
    location: Option<String>,
}

fn is_internal(symbol: &str) -> bool {
    INTERNAL_PREFIXES.iter().any(|p| symbol.starts_with(p))
}

fn parse_frames(trace: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in trace.lines() {
        if let Some(caps) = FRAME_HEADER.captures(line) {
            frames.push(Frame {
                symbol: caps[1].trim().to_string(),
                location: None,
            });
        } else if let Some(caps) = FRAME_LOCATION.captures(line) {
            if let Some(last) = frames.last_mut() {
                if last.location.is_none() {
                    last.location = Some(caps[1].trim().to_string());
                }
            }
        }
    }
    frames
}
