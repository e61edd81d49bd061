//! # Record subscribers.
//!
//! This module provides the [`Subscribe`] trait, the closure adapter
//! [`SubscriberFn`], the identity-keyed registry of active subscribers and the
//! built-in implementations.
//!
//! ## Architecture
//! ```text
//! ConsoleProxy::init(sub) ──► SubscriberRegistry ──► snapshot at capture time
//!                                                         │
//!                                                         ▼
//!                                           Subscribe::on_record(&LogRecord)
//!                                                         │
//!                                      ┌──────────────────┼──────────────┐
//!                                      ▼                  ▼              ▼
//!                                 RecordBuffer      TracingWriter      Custom
//! ```

mod embedded;
pub(crate) mod registry;
mod subscriber;
mod subscriber_fn;

pub use embedded::{LevelCounts, RecordBuffer};
#[cfg(feature = "logging")]
pub use embedded::TracingWriter;
pub use subscriber::Subscribe;
pub use subscriber_fn::SubscriberFn;
