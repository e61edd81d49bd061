use std::fmt;

use serde::Serialize;

/// Entry point a record was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Informational output (`log`).
    Log,
    /// Warnings (`warn`).
    Warn,
    /// Errors (`error`); records at this level carry a stack.
    Error,
}

impl Level {
    /// All levels, in severity order.
    pub const ALL: [Level; 3] = [Level::Log, Level::Warn, Level::Error];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Log => "log",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Index into per-level tables (`0..3`).
    pub(crate) fn index(self) -> usize {
        match self {
            Level::Log => 0,
            Level::Warn => 1,
            Level::Error => 2,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
