//! Deferred delivery of captured records.
//!
//! Capture happens on the calling thread; delivery happens later on a
//! dedicated worker, so a subscriber never runs inside the facility call that
//! produced its record.

mod queue;

pub(crate) use queue::DispatchQueue;
