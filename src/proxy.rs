//! # Console proxy.
//!
//! [`ConsoleProxy`] ties the pieces together for one [`Console`]: it owns the
//! patcher, the subscriber registry, the recorder and the dispatch queue, and
//! hands out a [`Disposer`] per registration.
//!
//! ## Architecture
//! ```text
//! console.warn(args)
//!   └─► wrapper ──► original sink (output unchanged)
//!              └─► capture ──► Recorder::record_at ──► DispatchQueue::schedule
//!                                                            │ (worker thread)
//!                                                            ▼
//!                                             every subscriber in the snapshot
//! ```
//!
//! ## Lifecycle
//! - The first [`ConsoleProxy::init`] patches the console.
//! - Later calls only add subscribers; one patched facility serves them all.
//! - Disposing the last subscriber restores the original entry points.
//! - [`ConsoleProxy::emit`] builds a record without touching the console.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use logpeek::{Console, ConsoleProxy, RecordBuffer, Value};
//!
//! let console = Arc::new(Console::new());
//! let proxy = ConsoleProxy::new(Arc::clone(&console));
//! let buffer = Arc::new(RecordBuffer::default());
//!
//! let disposer = proxy.init(buffer.clone());
//! console.warn(&[Value::from("Deprecated")]);
//! proxy.flush_blocking();
//! assert_eq!(buffer.len(), 1);
//!
//! disposer.dispose();
//! ```

use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;

use crate::config::Config;
use crate::dispatch::DispatchQueue;
use crate::facility::patcher::{CaptureFn, Patcher};
use crate::facility::{console, Call, Console, PatchState};
use crate::record::{Level, Recorder, StackPolicy};
use crate::subscribers::registry::SubscriberRegistry;
use crate::subscribers::Subscribe;
use crate::value::Value;

static GLOBAL_PROXY: OnceLock<ConsoleProxy> = OnceLock::new();

/// Registers `subscriber` on the process-wide proxy.
///
/// Shorthand for `ConsoleProxy::global().init(subscriber)`.
pub fn init(subscriber: Arc<dyn Subscribe>) -> Disposer {
    ConsoleProxy::global().init(subscriber)
}

/// Emits a record through the process-wide proxy without console output.
#[track_caller]
pub fn emit(level: Level, args: &[Value]) {
    ConsoleProxy::global().emit(level, args);
}

struct ProxyInner {
    recorder: Recorder,
    registry: Mutex<SubscriberRegistry>,
    queue: DispatchQueue,
    patcher: Patcher,
}

impl ProxyInner {
    fn capture(
        &self,
        level: Level,
        args: &[Value],
        location: &Location<'_>,
        policy: StackPolicy,
    ) {
        let subscribers = self.registry.lock().snapshot();
        if subscribers.is_empty() {
            return;
        }
        let record = self
            .recorder
            .record_at(level, args, policy.wants_stack(level), location);
        self.queue.schedule(Arc::new(record), subscribers);
    }

    fn release(&self, subscriber: &Arc<dyn Subscribe>) {
        let mut registry = self.registry.lock();
        if !registry.unregister(subscriber) {
            return;
        }
        let remaining = registry.len();
        let restored = (remaining == 0).then(|| self.patcher.restore());
        drop(registry);

        tracing::debug!(subscriber = subscriber.name(), remaining, "subscriber disposed");
        match restored {
            Some(Ok(())) => tracing::debug!("console entry points restored"),
            Some(Err(e)) => tracing::debug!(error = %e, label = e.as_label(), "restore skipped"),
            None => {}
        }
    }
}

impl Drop for ProxyInner {
    fn drop(&mut self) {
        if self.patcher.state() == PatchState::Patched {
            let _ = self.patcher.restore();
        }
    }
}

/// Capture service bound to one [`Console`].
///
/// Cloning is cheap and yields a handle to the same service.
#[derive(Clone)]
pub struct ConsoleProxy {
    inner: Arc<ProxyInner>,
}

impl fmt::Debug for ConsoleProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleProxy")
            .field("state", &self.state())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl ConsoleProxy {
    /// Creates a proxy for `console` with [`Config::default`].
    ///
    /// The functions installed on `console` right now become the originals:
    /// wrappers delegate to them and every teardown puts them back.
    pub fn new(console: Arc<Console>) -> Self {
        Self::with_config(console, Config::default())
    }

    /// Creates a proxy for `console` with explicit limits.
    pub fn with_config(console: Arc<Console>, cfg: Config) -> Self {
        let patcher = Patcher::new(console);
        let report = Arc::clone(patcher.original(Level::Error));
        Self {
            inner: Arc::new(ProxyInner {
                recorder: Recorder::new(&cfg),
                registry: Mutex::new(SubscriberRegistry::default()),
                queue: DispatchQueue::new(&cfg, report),
                patcher,
            }),
        }
    }

    /// Proxy over the process-wide [`console()`].
    pub fn global() -> &'static ConsoleProxy {
        GLOBAL_PROXY.get_or_init(|| ConsoleProxy::new(Arc::clone(console())))
    }

    /// Registers `subscriber` and patches the console if needed.
    ///
    /// Registering a handle that is already active changes nothing but still
    /// returns a working disposer.
    pub fn init(&self, subscriber: Arc<dyn Subscribe>) -> Disposer {
        let mut registry = self.inner.registry.lock();
        let added = registry.register(Arc::clone(&subscriber));
        let total = registry.len();
        let patched = (self.inner.patcher.state() == PatchState::Uninitialized)
            .then(|| self.inner.patcher.patch(self.capture_hook()));
        drop(registry);

        // Logged unlocked: a tracing layer may write back into the console.
        if added {
            tracing::debug!(subscriber = subscriber.name(), total, "subscriber registered");
        }
        match patched {
            Some(Ok(())) => tracing::debug!("console entry points patched"),
            Some(Err(e)) => tracing::debug!(error = %e, label = e.as_label(), "patch skipped"),
            None => {}
        }

        Disposer {
            inner: Arc::downgrade(&self.inner),
            subscriber: Mutex::new(Some(subscriber)),
        }
    }

    /// Builds and dispatches a record without calling the console.
    ///
    /// Only [`Level::Error`] records carry a stack.
    #[track_caller]
    pub fn emit(&self, level: Level, args: &[Value]) {
        self.emit_with(level, args, StackPolicy::Auto);
    }

    /// Like [`emit`](Self::emit) with an explicit stack policy.
    #[track_caller]
    pub fn emit_with(&self, level: Level, args: &[Value], policy: StackPolicy) {
        self.inner.capture(level, args, Location::caller(), policy);
    }

    /// Waits until every record captured before this call has been delivered.
    pub async fn flush(&self) {
        let _ = self.inner.queue.flush().await;
    }

    /// Blocking variant of [`flush`](Self::flush).
    ///
    /// # Panics
    /// Panics when called from within an async execution context.
    pub fn flush_blocking(&self) {
        let _ = self.inner.queue.flush().blocking_recv();
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.registry.lock().len()
    }

    /// Current patch state of the console.
    pub fn state(&self) -> PatchState {
        self.inner.patcher.state()
    }

    fn capture_hook(&self) -> CaptureFn {
        let weak = Arc::downgrade(&self.inner);
        Arc::new(move |level: Level, call: &Call<'_>| {
            if let Some(inner) = weak.upgrade() {
                inner.capture(level, call.args, call.location, StackPolicy::Auto);
            }
        })
    }
}

/// Handle reversing exactly one [`ConsoleProxy::init`].
///
/// Dropping it does nothing; call [`dispose`](Disposer::dispose).
#[must_use = "the subscriber stays registered until `dispose` is called"]
pub struct Disposer {
    inner: Weak<ProxyInner>,
    subscriber: Mutex<Option<Arc<dyn Subscribe>>>,
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl Disposer {
    /// Unregisters the subscriber; restores the console if none remain.
    ///
    /// A record captured before this call may still be delivered to it.
    /// Calling it again is a no-op.
    pub fn dispose(&self) {
        let Some(subscriber) = self.subscriber.lock().take() else {
            return;
        };
        if let Some(inner) = self.inner.upgrade() {
            inner.release(&subscriber);
        }
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.subscriber.lock().is_none()
    }
}
