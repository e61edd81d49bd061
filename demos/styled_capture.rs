//! # Styled capture example
//!
//! Shows how captured records look once the styling is stripped.
//!
//! Shows how to:
//! - Write through a [`StyledLogger`] (ANSI badge, level tag, local time).
//! - Keep a bounded history with a [`RecordBuffer`] subscriber.
//! - Attach a custom [`Subscribe`] implementation next to it.
//!
//! ## Flow
//! ```text
//! StyledLogger::warn() ──► console.warn (patched)
//!     ├─► original sink: styled line on stderr
//!     └─► capture ──► LogRecord (sanitized args) ──► worker
//!                                                     ├─► RecordBuffer
//!                                                     └─► JsonPrinter
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example styled_capture
//! ```

use std::sync::Arc;

use logpeek::{
    console, ConsoleProxy, Level, LogRecord, RecordBuffer, StyledLogger, Subscribe, Value,
};

/// Prints every record as one JSON line.
struct JsonPrinter;

#[async_trait::async_trait]
impl Subscribe for JsonPrinter {
    async fn on_record(&self, record: &LogRecord) {
        match serde_json::to_string(record) {
            Ok(line) => println!("[json] {line}"),
            Err(e) => println!("[json] unserializable record {}: {e}", record.id),
        }
    }

    fn name(&self) -> &str {
        "json-printer"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let proxy = ConsoleProxy::global();
    let buffer = Arc::new(RecordBuffer::new(100));

    let buffered = proxy.init(buffer.clone());
    let printed = proxy.init(Arc::new(JsonPrinter));

    let logger = StyledLogger::new(Arc::clone(console()), "demo");
    logger.info(&[Value::from("server ready on port"), Value::from(8080)]);
    logger.warn(&[
        Value::from("Deprecated"),
        Value::object([("option", "legacy_mode"), ("since", "0.3")]),
    ]);
    logger.error(&[Value::from("\x1b[31mFailed to synchronize data\x1b[0m")]);

    proxy.flush().await;

    let counts = buffer.counts();
    println!();
    println!("Captured:");
    println!(" ├─► log:   {}", counts.log);
    println!(" ├─► warn:  {}", counts.warn);
    println!(" └─► error: {}", counts.error);

    for record in buffer.by_level(Level::Error) {
        println!();
        println!("{}: {}", record.id, record.message());
        if let Some(stack) = &record.stack {
            println!("{stack}");
        }
    }

    printed.dispose();
    buffered.dispose();
    println!();
    println!("console restored: {}", proxy.state());
}
