//! # Deferred record delivery.
//!
//! Provides [`DispatchQueue`]: hands captured records to subscribers after the
//! facility call has returned, never inline with it.
//!
//! ## Architecture
//! ```text
//! capture (caller thread)                 worker thread (current-thread runtime)
//!   schedule(record, snapshot) ──► [unbounded FIFO] ──► for sub in snapshot:
//!   flush()                    ──►   Flush(barrier)        sub.on_record(&record)
//!                                                           └─► panic → report
//! ```
//!
//! ## Rules
//! - **FIFO**: records are delivered in capture order; a flush barrier
//!   resolves once everything queued before it was delivered.
//! - **Snapshot**: each record goes to the subscribers registered when it was
//!   captured, even if one of them has been disposed since.
//! - **Isolation**: a panicking subscriber is reported through the original
//!   error sink (never the patched one) and the remaining subscribers still run.
//! - **Lazy start**: the worker thread starts on first use and exits when the
//!   queue is dropped.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a subscriber panics while holding a lock.

use std::any::Any;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::config::Config;
use crate::error::CaptureError;
use crate::facility::{Call, EntryFn};
use crate::record::LogRecord;
use crate::subscribers::Subscribe;
use crate::value::Value;

/// One record and the subscribers it is addressed to.
struct Delivery {
    record: Arc<LogRecord>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

enum Job {
    Deliver(Delivery),
    Flush(oneshot::Sender<()>),
}

/// Worker state waiting for its thread.
struct Worker {
    rx: mpsc::UnboundedReceiver<Job>,
    report: EntryFn,
}

/// FIFO queue of pending deliveries served by one worker thread.
pub(crate) struct DispatchQueue {
    tx: mpsc::UnboundedSender<Job>,
    idle: Mutex<Option<Worker>>,
    thread_name: String,
}

impl DispatchQueue {
    /// Creates the queue; failures are reported through `report`.
    pub(crate) fn new(cfg: &Config, report: EntryFn) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            idle: Mutex::new(Some(Worker { rx, report })),
            thread_name: cfg.dispatch_thread.to_string(),
        }
    }

    /// Queues `record` for every subscriber in `subscribers`.
    pub(crate) fn schedule(&self, record: Arc<LogRecord>, subscribers: Vec<Arc<dyn Subscribe>>) {
        if subscribers.is_empty() {
            return;
        }
        self.ensure_started();
        let job = Job::Deliver(Delivery {
            record,
            subscribers,
        });
        if self.tx.send(job).is_err() {
            let err = CaptureError::DispatchUnavailable {
                reason: "worker stopped".into(),
            };
            tracing::warn!(error = %err, label = err.as_label(), "record dropped");
        }
    }

    /// Returns a receiver that completes once every earlier job was handled.
    ///
    /// If the worker is unavailable the receiver completes with an error
    /// immediately; callers treat both outcomes as "nothing left to deliver".
    pub(crate) fn flush(&self) -> oneshot::Receiver<()> {
        self.ensure_started();
        let (done, wait) = oneshot::channel();
        let _ = self.tx.send(Job::Flush(done));
        wait
    }

    fn ensure_started(&self) {
        let Some(worker) = self.idle.lock().take() else {
            return;
        };
        let spawned = std::thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || worker.run());
        if let Err(e) = spawned {
            let err = CaptureError::DispatchUnavailable {
                reason: e.to_string(),
            };
            tracing::error!(error = %err, label = err.as_label(), "dispatch worker not started");
        }
    }
}

impl Worker {
    fn run(self) {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                let err = CaptureError::DispatchUnavailable {
                    reason: e.to_string(),
                };
                tracing::error!(error = %err, label = err.as_label(), "dispatch runtime not built");
                return;
            }
        };
        rt.block_on(self.drain());
    }

    async fn drain(mut self) {
        while let Some(job) = self.rx.recv().await {
            match job {
                Job::Deliver(delivery) => self.deliver(delivery).await,
                Job::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
    }

    async fn deliver(&self, delivery: Delivery) {
        let record = delivery.record.as_ref();
        for sub in &delivery.subscribers {
            let fut = sub.on_record(record);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                let err = CaptureError::SubscriberPanicked {
                    subscriber: sub.name().to_string(),
                    info: panic_message(&*panic_err),
                };
                tracing::warn!(error = %err, label = err.as_label(), record = %record.id, "subscriber failed");
                self.report_failure(&err);
            }
        }
    }

    fn report_failure(&self, err: &CaptureError) {
        let args = [
            Value::from("logpeek subscriber error:"),
            Value::from(err.to_string()),
        ];
        (self.report)(&Call::here(&args));
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Level, Recorder};
    use crate::subscribers::SubscriberFn;
    use crate::value::format_args;

    fn reporting() -> (EntryFn, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let l = Arc::clone(&lines);
        let f: EntryFn = Arc::new(move |call: &Call<'_>| l.lock().push(format_args(call.args)));
        (f, lines)
    }

    fn record(msg: &str) -> Arc<LogRecord> {
        Arc::new(Recorder::default().record(Level::Log, &[Value::from(msg)], false))
    }

    #[tokio::test]
    async fn delivers_in_fifo_order() {
        let (report, _) = reporting();
        let queue = DispatchQueue::new(&Config::default(), report);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let sub: Arc<dyn Subscribe> =
            SubscriberFn::arc("order", move |r: &LogRecord| s.lock().push(r.message()));

        for msg in ["1", "2", "3"] {
            queue.schedule(record(msg), vec![Arc::clone(&sub)]);
        }
        queue.flush().await.unwrap();

        assert_eq!(*seen.lock(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn panicking_subscriber_is_isolated_and_reported() {
        let (report, reported) = reporting();
        let queue = DispatchQueue::new(&Config::default(), report);
        let hits = Arc::new(Mutex::new(0usize));
        let h = Arc::clone(&hits);
        let bad: Arc<dyn Subscribe> = SubscriberFn::arc("bad", |_: &LogRecord| panic!("boom"));
        let good: Arc<dyn Subscribe> = SubscriberFn::arc("good", move |_: &LogRecord| *h.lock() += 1);

        queue.schedule(record("a"), vec![Arc::clone(&bad), Arc::clone(&good)]);
        queue.schedule(record("b"), vec![bad, good]);
        queue.flush().await.unwrap();

        assert_eq!(*hits.lock(), 2);
        let reported = reported.lock();
        assert_eq!(reported.len(), 2);
        assert!(reported[0].contains("subscriber bad panicked: boom"), "{}", reported[0]);
    }

    #[tokio::test]
    async fn empty_snapshot_does_not_start_worker() {
        let (report, _) = reporting();
        let queue = DispatchQueue::new(&Config::default(), report);
        queue.schedule(record("x"), Vec::new());
        assert!(queue.idle.lock().is_some());
    }

    #[test]
    fn panic_payloads_are_rendered() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic");
    }
}
