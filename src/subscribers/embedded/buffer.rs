//! # RecordBuffer: bounded in-memory history
//!
//! Keeps the most recent records for a presentation layer. When full, the
//! oldest record is evicted. Nothing is persisted.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::record::{Level, LogRecord};
use crate::subscribers::Subscribe;

/// Per-level record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    /// Records captured from `log`.
    pub log: usize,
    /// Records captured from `warn`.
    pub warn: usize,
    /// Records captured from `error`.
    pub error: usize,
}

impl LevelCounts {
    /// Sum over all levels.
    pub fn total(&self) -> usize {
        self.log + self.warn + self.error
    }
}

/// Bounded ring of captured records.
pub struct RecordBuffer {
    capacity: usize,
    records: Mutex<VecDeque<Arc<LogRecord>>>,
}

impl Default for RecordBuffer {
    /// Keeps the last 1000 records.
    fn default() -> Self {
        Self::new(1000)
    }
}

impl RecordBuffer {
    /// Creates a buffer keeping at most `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> Vec<Arc<LogRecord>> {
        self.records.lock().iter().cloned().collect()
    }

    /// Retained records at `level`, oldest first.
    pub fn by_level(&self, level: Level) -> Vec<Arc<LogRecord>> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    /// Counts of retained records per level.
    pub fn counts(&self) -> LevelCounts {
        let mut counts = LevelCounts::default();
        for r in self.records.lock().iter() {
            match r.level {
                Level::Log => counts.log += 1,
                Level::Warn => counts.warn += 1,
                Level::Error => counts.error += 1,
            }
        }
        counts
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// True if no record is retained.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Drops every retained record.
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn push(&self, record: LogRecord) {
        let mut records = self.records.lock();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(Arc::new(record));
    }
}

#[async_trait]
impl Subscribe for RecordBuffer {
    async fn on_record(&self, record: &LogRecord) {
        self.push(record.clone());
    }

    fn name(&self) -> &str {
        "RecordBuffer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Recorder;
    use crate::value::Value;

    #[test]
    fn evicts_oldest_when_full() {
        let buf = RecordBuffer::new(2);
        let rec = Recorder::default();
        for msg in ["a", "b", "c"] {
            buf.push(rec.record(Level::Log, &[Value::from(msg)], false));
        }
        let kept: Vec<_> = buf.records().iter().map(|r| r.message()).collect();
        assert_eq!(kept, vec!["b", "c"]);
    }

    #[test]
    fn counts_by_level() {
        let buf = RecordBuffer::default();
        let rec = Recorder::default();
        buf.push(rec.record(Level::Log, &[], false));
        buf.push(rec.record(Level::Error, &[], true));
        buf.push(rec.record(Level::Error, &[], true));
        assert_eq!(
            buf.counts(),
            LevelCounts {
                log: 1,
                warn: 0,
                error: 2
            }
        );
        assert_eq!(buf.by_level(Level::Error).len(), 2);
        buf.clear();
        assert!(buf.is_empty());
    }
}
