//! # logpeek
//!
//! **logpeek** captures calls made to a process-wide logging facility and
//! fans them out to subscribers as immutable, bounded, JSON-safe records,
//! while the facility keeps printing exactly what it printed before.
//!
//! It is meant as the capture layer for in-app log viewers, devtools panels
//! and analytics hooks: anything that wants to *observe* console output
//! without owning it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller ──► console.log / warn / error (EntryPoint, swappable Arc<dyn Fn>)
//!                  │
//!                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Patcher wrapper (installed while ≥ 1 subscriber is active)       │
//! │  1. original sink (output unchanged, exactly once)                │
//! │  2. capture hook                                                  │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼  (calling thread, synchronous)
//!                 Recorder ──► Serializer ──► sanitize
//!                  │  id + timestamp + level + SafeValue args
//!                  │  + stack (error level only)
//!                  ▼
//!        DispatchQueue (unbounded FIFO) ──► worker thread
//!                                   ┌─────────┼─────────┐
//!                                   ▼         ▼         ▼
//!                              sub1.on   sub2.on   subN.on
//!                              _record() _record() _record()
//! ```
//!
//! ### Lifecycle
//! ```text
//! ConsoleProxy::new(console)        originals captured
//!   init(sub1)  ── Uninitialized ──► Patched
//!   init(sub2)  ── Patched (one more subscriber)
//!   d1.dispose()── Patched
//!   d2.dispose()── Patched ──► Uninitialized (originals restored)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                       |
//! |-------------------|----------------------------------------------------------|------------------------------------------|
//! | **Facility**      | Console with three swappable entry points.               | [`Console`], [`EntryPoint`], [`Call`]    |
//! | **Capture**       | Reversible patching and subscriber fan-out.              | [`ConsoleProxy`], [`Disposer`]           |
//! | **Records**       | Immutable capture result with optional stack.            | [`LogRecord`], [`Level`], [`Recorder`]   |
//! | **Serialization** | Bounded, cycle-safe cloning of arbitrary arguments.      | [`Serializer`], [`SafeValue`], [`Value`] |
//! | **Subscriber API**| Consume records (buffers, tracing, custom).              | [`Subscribe`], [`SubscriberFn`]          |
//! | **Configuration** | Truncation limits, stack depth, worker name.             | [`Config`]                               |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`TracingWriter`] subscriber _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use logpeek::{console_warn, ConsoleProxy, LogRecord, SubscriberFn, Value};
//!
//! let proxy = ConsoleProxy::global();
//! let disposer = proxy.init(SubscriberFn::arc("printer", |rec: &LogRecord| {
//!     println!("captured [{}] {}", rec.level, rec.message());
//! }));
//!
//! console_warn!("Deprecated", Value::object([("a", 1)]));
//! proxy.flush_blocking();
//!
//! disposer.dispose();
//! ```

mod config;
mod dispatch;
mod error;
mod facility;
mod proxy;
mod record;
mod sanitize;
mod serialize;
mod subscribers;
mod value;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{CaptureError, PropertyError};
pub use facility::{
    console, stderr_sink, stdout_sink, Call, Console, EntryFn, EntryPoint, PatchState,
    StyledLogger,
};
pub use proxy::{emit, init, ConsoleProxy, Disposer};
pub use record::{Level, LogRecord, RecordId, Recorder, StackPolicy};
pub use sanitize::{sanitize, BANNER_GLYPHS};
pub use serialize::Serializer;
pub use subscribers::{LevelCounts, RecordBuffer, Subscribe, SubscriberFn};
pub use value::{
    format_args, inspect, omitted_summary, Array, HostObject, Object, SafeValue, Value,
    CIRCULAR_REFERENCE, ERROR_ACCESSING_PROPERTY, MAX_DEPTH_REACHED, OMITTED_KEY,
};

// Optional: expose a built-in subscriber forwarding records to `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::TracingWriter;
