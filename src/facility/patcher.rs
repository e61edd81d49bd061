//! # Facility patcher.
//!
//! Installs capturing wrappers over the three entry points of a [`Console`]
//! and puts the original functions back on teardown.
//!
//! ## Lifecycle
//! ```text
//!            patch(capture)                    restore()
//! Uninitialized ──────────────► Patched ─────────────────► Uninitialized
//!      ▲  restore() = no-op        │ patch() = no-op
//!      └───────────────────────────┘
//! ```
//!
//! ## Rules
//! - Originals are captured once, in [`Patcher::new`], and are both the
//!   function every wrapper delegates to and the restore target of every
//!   teardown. If something else replaces an entry point while patched (or
//!   between cycles), a later restore puts the construction-time function back.
//! - Wrappers call the original first, then the capture hook. A panicking
//!   hook loses its record; the caller never sees the panic.
//! - Each entry point is replaced by one whole-function swap.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;

use super::console::Console;
use super::entry::{Call, EntryFn};
use crate::error::CaptureError;
use crate::record::Level;

/// Hook invoked by the wrappers after the original sink.
pub(crate) type CaptureFn = Arc<dyn Fn(Level, &Call<'_>) + Send + Sync>;

/// Patch state of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    /// Original entry points installed.
    Uninitialized,
    /// Capturing wrappers installed.
    Patched,
}

impl PatchState {
    fn as_str(self) -> &'static str {
        match self {
            PatchState::Uninitialized => "uninitialized",
            PatchState::Patched => "patched",
        }
    }
}

impl fmt::Display for PatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reversible wrapper installer for one [`Console`].
pub(crate) struct Patcher {
    console: Arc<Console>,
    originals: [EntryFn; 3],
    state: Mutex<PatchState>,
}

impl Patcher {
    /// Captures the functions currently installed on `console` as originals.
    pub(crate) fn new(console: Arc<Console>) -> Self {
        let originals = Level::ALL.map(|level| console.entry(level).load());
        Self {
            console,
            originals,
            state: Mutex::new(PatchState::Uninitialized),
        }
    }

    /// Construction-time function for `level`.
    pub(crate) fn original(&self, level: Level) -> &EntryFn {
        &self.originals[level.index()]
    }

    pub(crate) fn state(&self) -> PatchState {
        *self.state.lock()
    }

    /// Installs wrappers routing every call through `capture`.
    pub(crate) fn patch(&self, capture: CaptureFn) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if *state == PatchState::Patched {
            return Err(CaptureError::PatchState {
                operation: "patch",
                state: state.as_str(),
            });
        }
        for level in Level::ALL {
            let original = Arc::clone(self.original(level));
            let capture = Arc::clone(&capture);
            let wrapper: EntryFn = Arc::new(move |call: &Call<'_>| {
                original(call);
                let captured = panic::catch_unwind(AssertUnwindSafe(|| capture(level, call)));
                if captured.is_err() {
                    tracing::warn!(%level, "capture hook panicked; record dropped");
                }
            });
            self.console.entry(level).swap(wrapper);
        }
        *state = PatchState::Patched;
        Ok(())
    }

    /// Puts the construction-time functions back.
    pub(crate) fn restore(&self) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if *state == PatchState::Uninitialized {
            return Err(CaptureError::PatchState {
                operation: "restore",
                state: state.as_str(),
            });
        }
        for level in Level::ALL {
            self.console
                .entry(level)
                .swap(Arc::clone(self.original(level)));
        }
        *state = PatchState::Uninitialized;
        Ok(())
    }
}
