//! Captured records: level, record payload and stack capture.
//!
//! ## Contents
//! - [`Level`] which entry point produced the record
//! - [`LogRecord`], [`RecordId`] the immutable capture result
//! - [`Recorder`] serializes arguments and attaches stacks
//! - [`StackPolicy`] stack override for direct emission

mod level;
#[allow(clippy::module_inception)]
mod record;
mod stack;

pub use level::Level;
pub use record::{LogRecord, RecordId, Recorder};

/// Whether a directly emitted record carries a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackPolicy {
    /// Stack only for [`Level::Error`].
    #[default]
    Auto,
    /// Always attach a stack.
    Always,
    /// Never attach a stack.
    Never,
}

impl StackPolicy {
    /// Resolves the policy for `level`.
    pub fn wants_stack(self, level: Level) -> bool {
        match self {
            StackPolicy::Auto => level == Level::Error,
            StackPolicy::Always => true,
            StackPolicy::Never => false,
        }
    }
}
