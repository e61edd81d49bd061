//! # Capture configuration.
//!
//! Provides [`Config`], the settings shared by the serializer, the stack
//! capture and the dispatch worker of a [`ConsoleProxy`](crate::ConsoleProxy).
//!
//! ## Sentinel values
//! - `max_items = 0` / `max_keys = 0` → clamped to 1 (a container always shows
//!   at least its first entry)
//! - `stack_frames = 0` → the stack only carries the call site

use std::borrow::Cow;

/// Configuration for the capture pipeline.
///
/// ## Field semantics
/// - `max_depth`: deepest nesting level serialized before `"[Max Depth Reached]"`
/// - `max_items`: sequence elements kept (the rest is dropped silently)
/// - `max_keys`: mapping keys kept (the rest is summarized in a `"..."` entry)
/// - `stack_frames`: backtrace frames kept after the call site on error records
/// - `dispatch_thread`: name of the worker thread delivering records
#[derive(Clone, Debug)]
pub struct Config {
    /// Deepest nesting level that is still serialized.
    ///
    /// Depth starts at `0` for a top-level container; a value reached at
    /// `depth > max_depth` is replaced by the depth sentinel.
    pub max_depth: usize,

    /// Number of sequence elements kept.
    pub max_items: usize,

    /// Number of own keys kept per mapping.
    pub max_keys: usize,

    /// Number of backtrace frames kept after the call-site line.
    pub stack_frames: usize,

    /// Name given to the dispatch worker thread.
    pub dispatch_thread: Cow<'static, str>,
}

impl Config {
    /// Returns the sequence limit clamped to a minimum of 1.
    #[inline]
    pub fn max_items_clamped(&self) -> usize {
        self.max_items.max(1)
    }

    /// Returns the mapping limit clamped to a minimum of 1.
    #[inline]
    pub fn max_keys_clamped(&self) -> usize {
        self.max_keys.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_depth = 3`
    /// - `max_items = 10`
    /// - `max_keys = 10`
    /// - `stack_frames = 8`
    /// - `dispatch_thread = "logpeek-dispatch"`
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_items: 10,
            max_keys: 10,
            stack_frames: 8,
            dispatch_thread: Cow::Borrowed("logpeek-dispatch"),
        }
    }
}
