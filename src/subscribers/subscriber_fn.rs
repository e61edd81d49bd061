//! # Closure-backed subscriber (`SubscriberFn`)
//!
//! [`SubscriberFn`] wraps a synchronous `Fn(&LogRecord)` callback. Build it
//! with [`SubscriberFn::arc`] and keep the returned `Arc`: registration is keyed
//! by that handle, so registering the same `Arc` twice is a no-op.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use logpeek::{LogRecord, Subscribe, SubscriberFn};
//!
//! let sub: Arc<dyn Subscribe> = SubscriberFn::arc("printer", |rec: &LogRecord| {
//!     println!("[{}] {}", rec.level, rec.message());
//! });
//! assert_eq!(sub.name(), "printer");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;

use crate::record::LogRecord;
use crate::subscribers::Subscribe;

/// Function-backed subscriber.
#[derive(Debug)]
pub struct SubscriberFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SubscriberFn<F> {
    /// Creates a new function-backed subscriber.
    ///
    /// Prefer [`SubscriberFn::arc`] when you immediately register it.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F> Subscribe for SubscriberFn<F>
where
    F: Fn(&LogRecord) + Send + Sync + 'static,
{
    async fn on_record(&self, record: &LogRecord) {
        (self.f)(record);
    }

    fn name(&self) -> &str {
        &self.name
    }
}
