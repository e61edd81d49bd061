//! The logging facility and its reversible patching.
//!
//! ## Contents
//! - [`Console`], [`console()`] the facility and its process-wide instance
//! - [`EntryPoint`], [`EntryFn`], [`Call`] swappable per-level functions
//! - `Patcher` installs and removes capturing wrappers ([`PatchState`])
//! - [`StyledLogger`] branded prefixes written through a console

mod console;
mod entry;
pub(crate) mod patcher;
mod styled;

pub use console::{console, stderr_sink, stdout_sink, Console};
pub use entry::{Call, EntryFn, EntryPoint};
pub use patcher::PatchState;
pub use styled::StyledLogger;
