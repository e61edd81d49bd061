//! # TracingWriter: console-to-tracing bridge
//!
//! A minimal subscriber that re-emits captured records as `tracing` events
//! under the `logpeek::console` target, so console output lands in whatever
//! `tracing` subscriber the host installed.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO logpeek::console: server ready on port 8080 id=rec-0
//! WARN logpeek::console: Deprecated {"a":1} id=rec-1
//! ERROR logpeek::console: Failed to synchronize data id=rec-2 stack="Error\n    at src/main.rs:9:5"
//! ```

use async_trait::async_trait;

use crate::record::{Level, LogRecord};
use crate::subscribers::Subscribe;

/// Record forwarding subscriber.
#[derive(Default)]
pub struct TracingWriter;

impl TracingWriter {
    /// Construct a new [`TracingWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for TracingWriter {
    async fn on_record(&self, r: &LogRecord) {
        let message = r.message();
        match r.level {
            Level::Log => {
                tracing::info!(target: "logpeek::console", id = %r.id, "{message}");
            }
            Level::Warn => {
                tracing::warn!(target: "logpeek::console", id = %r.id, "{message}");
            }
            Level::Error => {
                tracing::error!(
                    target: "logpeek::console",
                    id = %r.id,
                    stack = r.stack.as_deref().unwrap_or_default(),
                    "{message}"
                );
            }
        }
    }

    fn name(&self) -> &str {
        "TracingWriter"
    }
}
