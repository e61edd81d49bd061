//! Error types used by the capture pipeline.
//!
//! None of these ever reach a caller of the logging facility. They exist so
//! that degraded paths (fallback serialization, isolated subscriber panics,
//! ignored lifecycle transitions) can be logged and reported uniformly.
//!
//! - [`CaptureError`]: failures inside the capture/dispatch pipeline.
//! - [`PropertyError`]: a [`HostObject`](crate::HostObject) refused to list
//!   its keys or to produce a property value.

use thiserror::Error;

/// # Errors raised by a host object during inspection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("property {key:?} is not readable: {reason}")]
pub struct PropertyError {
    /// Key that was being read (empty when listing keys failed).
    pub key: String,
    /// Human-readable reason supplied by the host object.
    pub reason: String,
}

impl PropertyError {
    /// Creates a new property error.
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// # Errors produced by the capture pipeline.
///
/// Every variant is handled where it occurs: serialization degrades to a
/// textual fallback, subscriber failures are isolated, lifecycle mismatches
/// are ignored.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CaptureError {
    /// An argument could not be cloned faithfully.
    #[error("cannot serialize {type_name} value: {reason}")]
    Serialization {
        /// Dynamic type of the offending value.
        type_name: String,
        /// Underlying failure.
        reason: String,
    },

    /// A host object failed while being inspected.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// A subscriber panicked while handling a record.
    #[error("subscriber {subscriber} panicked: {info}")]
    SubscriberPanicked {
        /// Subscriber name.
        subscriber: String,
        /// Panic payload rendered as text.
        info: String,
    },

    /// A lifecycle transition was requested in a state that does not allow it.
    #[error("ignored {operation}: facility is {state}")]
    PatchState {
        /// Requested operation (`patch` or `restore`).
        operation: &'static str,
        /// State the patcher was in.
        state: &'static str,
    },

    /// The dispatch worker could not be started or has stopped.
    #[error("dispatch worker unavailable: {reason}")]
    DispatchUnavailable {
        /// Underlying failure.
        reason: String,
    },
}

impl CaptureError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use logpeek::CaptureError;
    ///
    /// let err = CaptureError::SubscriberPanicked {
    ///     subscriber: "panel".into(),
    ///     info: "boom".into(),
    /// };
    /// assert_eq!(err.as_label(), "subscriber_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CaptureError::Serialization { .. } => "serialization_failed",
            CaptureError::Property(_) => "property_unreadable",
            CaptureError::SubscriberPanicked { .. } => "subscriber_panicked",
            CaptureError::PatchState { .. } => "patch_state",
            CaptureError::DispatchUnavailable { .. } => "dispatch_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CaptureError::Serialization { type_name, reason } => {
                format!("serialization of {type_name} failed: {reason}")
            }
            CaptureError::Property(e) => format!("property {:?}: {}", e.key, e.reason),
            CaptureError::SubscriberPanicked { subscriber, info } => {
                format!("subscriber {subscriber}: {info}")
            }
            CaptureError::PatchState { operation, state } => {
                format!("{operation} while {state}")
            }
            CaptureError::DispatchUnavailable { reason } => format!("dispatch: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_error_converts_into_capture_error() {
        let err: CaptureError = PropertyError::new("token", "getter threw").into();
        assert_eq!(err.as_label(), "property_unreadable");
        assert_eq!(err.to_string(), "property \"token\" is not readable: getter threw");
    }

    #[test]
    fn patch_state_message_names_operation() {
        let err = CaptureError::PatchState {
            operation: "restore",
            state: "uninitialized",
        };
        assert_eq!(err.as_message(), "restore while uninitialized");
        assert_eq!(err.to_string(), "ignored restore: facility is uninitialized");
    }
}
