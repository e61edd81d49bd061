//! # Built-in subscribers
//!
//! Small, self-contained implementations for hosts and demos.
//!
//! - [`RecordBuffer`]: bounded in-memory history with per-level counts.
//! - [`TracingWriter`]: re-emits records as `tracing` events (demo/bridge).

mod buffer;
#[cfg(feature = "logging")]
mod tracing_writer;

pub use buffer::{LevelCounts, RecordBuffer};
#[cfg(feature = "logging")]
pub use tracing_writer::TracingWriter;
