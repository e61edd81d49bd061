//! # Captured log records.
//!
//! A [`LogRecord`] is built synchronously at the instant of the facility call
//! and is immutable afterwards; subscribers receive it behind an `Arc`.
//!
//! ## Ordering guarantees
//! Every record gets a process-wide unique, monotonically increasing
//! [`RecordId`]. Use it to restore capture order if records are re-sorted.

use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::level::Level;
use super::stack;
use crate::config::Config;
use crate::serialize::Serializer;
use crate::value::{SafeValue, Value};

/// Global sequence counter for record ids.
static RECORD_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique identifier of one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        Self(RECORD_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rec-{}", self.0)
    }
}

/// Structured result of one capture.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// Unique id.
    pub id: RecordId,
    /// Wall-clock capture time.
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: SystemTime,
    /// Entry point the record came from.
    pub level: Level,
    /// One bounded value per call argument, in order.
    pub args: Vec<SafeValue>,
    /// Call stack; set for error records (or on explicit request).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl LogRecord {
    /// Joins the arguments for single-line display: strings as is, other
    /// values as compact JSON.
    ///
    /// # Example
    /// ```
    /// use logpeek::{Level, Recorder, Value};
    ///
    /// let rec = Recorder::default().record(
    ///     Level::Warn,
    ///     &[Value::from("Deprecated"), Value::object([("a", 1)])],
    ///     false,
    /// );
    /// assert_eq!(rec.message(), r#"Deprecated {"a":1}"#);
    /// ```
    pub fn message(&self) -> String {
        self.args
            .iter()
            .map(|a| match a {
                SafeValue::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> u128 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
    }
}

fn serialize_millis<S: serde::Serializer>(ts: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
    let millis = ts
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    s.serialize_u64(millis)
}

/// Builds records: serializes arguments and captures stacks.
#[derive(Clone, Debug)]
pub struct Recorder {
    serializer: Serializer,
    stack_frames: usize,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Recorder {
    /// Creates a recorder using the limits of `cfg`.
    pub fn new(cfg: &Config) -> Self {
        Self {
            serializer: Serializer::new(cfg),
            stack_frames: cfg.stack_frames,
        }
    }

    /// Builds a record for a call made at the caller's location.
    #[track_caller]
    pub fn record(&self, level: Level, args: &[Value], with_stack: bool) -> LogRecord {
        self.record_at(level, args, with_stack, Location::caller())
    }

    /// Builds a record for a call made at `location`.
    pub fn record_at(
        &self,
        level: Level,
        args: &[Value],
        with_stack: bool,
        location: &Location<'_>,
    ) -> LogRecord {
        LogRecord {
            id: RecordId::next(),
            timestamp: SystemTime::now(),
            level,
            args: self.serializer.serialize_args(args),
            stack: with_stack.then(|| stack::capture(location, self.stack_frames)),
        }
    }
}
