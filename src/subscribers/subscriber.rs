//! # Record subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for consumers of captured
//! records (panels, analytics, bridges into other logging stacks).
//!
//! ## Architecture
//! ```text
//! facility call ──► capture ──► DispatchQueue ──► worker ──► subscriber.on_record()
//!                                                       └─► panic caught → reported
//! ```
//!
//! ## Rules
//! - Records arrive after the facility call has returned, never inline.
//! - Records are delivered in capture order.
//! - A panicking subscriber is reported through the original error sink and
//!   does not affect other subscribers or later records.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use logpeek::{Level, LogRecord, Subscribe};
//!
//! struct ErrorCounter(std::sync::atomic::AtomicUsize);
//!
//! #[async_trait]
//! impl Subscribe for ErrorCounter {
//!     async fn on_record(&self, record: &LogRecord) {
//!         if record.level == Level::Error {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &str { "error-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::record::LogRecord;

/// Consumer of captured records.
///
/// ### Implementation requirements
/// - Do not block the worker for long; every subscriber shares it.
/// - Handle errors internally; panics are caught but reported as failures.
/// - Logging through the patched facility from here is allowed and produces
///   a new record.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one record.
    async fn on_record(&self, record: &LogRecord);

    /// Name used in failure reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
