//! Error types produced by the broadcaster and by subscriber code.
//!
//! - [`HandlerFault`] is one failure raised while delivering an event to one subscriber.
//! - [`PublishError`] is what [`Broadcaster::publish`](crate::Broadcaster::publish) reports to its caller.
//!
//! Both provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Failures raised by the fault sink itself never show up here: they are logged and discarded.

use std::sync::Arc;

use thiserror::Error;

use crate::subscribers::SubscriberId;

/// Error type returned by subscriber handlers and fault sinks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # What went wrong inside a subscriber.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FaultKind {
    /// The handler returned an error.
    #[error("failed: {0}")]
    Failed(#[source] BoxError),

    /// The handler or its filter panicked (only produced when panics are caught).
    #[error("panicked: {0}")]
    Panicked(String),
}

/// # A fault raised while delivering one event to one subscriber.
///
/// Faults are shared as `Arc<HandlerFault>`: the same value is handed to the fault sink
/// and returned to the publisher.
#[derive(Error, Debug)]
#[error("subscriber {subscriber} ({name}) {kind}")]
pub struct HandlerFault {
    /// Subscriber that raised the fault.
    pub subscriber: SubscriberId,
    /// Handler name as reported by [`Handler::name`](crate::Handler::name).
    pub name: String,
    /// The underlying failure.
    #[source]
    pub kind: FaultKind,
}

impl HandlerFault {
    pub(crate) fn new(subscriber: SubscriberId, name: impl Into<String>, kind: FaultKind) -> Self {
        Self {
            subscriber,
            name: name.into(),
            kind,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self.kind {
            FaultKind::Failed(_) => "handler_failed",
            FaultKind::Panicked(_) => "handler_panicked",
        }
    }

    /// True if the fault comes from a caught panic rather than a returned error.
    pub fn is_panic(&self) -> bool {
        matches!(self.kind, FaultKind::Panicked(_))
    }
}

/// # Outcome of a failed publish.
///
/// Which variant a caller can observe depends on the configured
/// [`FaultPolicy`](crate::FaultPolicy):
/// - `Swallow` never reports handler faults (only [`PublishError::Cancelled`]).
/// - `ThrowFirst` reports [`PublishError::Handler`] with the first fault.
/// - `ThrowAggregate` reports [`PublishError::Aggregate`] once every subscriber was attempted.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum PublishError {
    /// First handler fault; delivery stopped at the failing subscriber.
    #[error("subscriber fault: {0}")]
    Handler(#[source] Arc<HandlerFault>),

    /// Every handler fault of the call, in delivery order. Never empty when produced by a publish.
    #[error("{} subscriber fault(s)", .0.len())]
    Aggregate(Vec<Arc<HandlerFault>>),

    /// Cancellation was observed before every subscriber was reached.
    #[error("publish cancelled after {delivered} deliveries")]
    Cancelled {
        /// Number of handlers invoked before cancellation was observed.
        delivered: usize,
        /// Faults recorded before cancellation (`ThrowAggregate` only).
        faults: Vec<Arc<HandlerFault>>,
    },
}

impl PublishError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fanout::PublishError;
    ///
    /// let err = PublishError::Cancelled { delivered: 0, faults: Vec::new() };
    /// assert_eq!(err.as_label(), "publish_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PublishError::Handler(_) => "publish_handler_fault",
            PublishError::Aggregate(_) => "publish_aggregate_fault",
            PublishError::Cancelled { .. } => "publish_cancelled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PublishError::Handler(fault) => format!("fault: {fault}"),
            PublishError::Aggregate(faults) => {
                let parts: Vec<String> = faults.iter().map(|f| f.to_string()).collect();
                format!("faults: [{}]", parts.join("; "))
            }
            PublishError::Cancelled { delivered, faults } => {
                format!("cancelled: delivered={delivered} faults={}", faults.len())
            }
        }
    }

    /// True if the publish stopped on cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PublishError::Cancelled { .. })
    }

    /// All handler faults carried by this error, in delivery order.
    pub fn faults(&self) -> &[Arc<HandlerFault>] {
        match self {
            PublishError::Handler(fault) => std::slice::from_ref(fault),
            PublishError::Aggregate(faults) => faults,
            PublishError::Cancelled { faults, .. } => faults,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(id: u64, msg: &str) -> Arc<HandlerFault> {
        Arc::new(HandlerFault::new(
            SubscriberId::from_raw(id),
            "test",
            FaultKind::Failed(msg.into()),
        ))
    }

    #[test]
    fn test_labels() {
        let f = fault(1, "boom");
        assert_eq!(f.as_label(), "handler_failed");
        assert!(!f.is_panic());
        assert_eq!(PublishError::Handler(f.clone()).as_label(), "publish_handler_fault");
        assert_eq!(PublishError::Aggregate(vec![f]).as_label(), "publish_aggregate_fault");
    }

    #[test]
    fn test_faults_accessor_keeps_order() {
        let err = PublishError::Aggregate(vec![fault(1, "a"), fault(2, "b")]);
        let ids: Vec<u64> = err.faults().iter().map(|f| f.subscriber.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_display_includes_source() {
        let f = fault(7, "disk full");
        let text = PublishError::Handler(f).to_string();
        assert!(text.contains("disk full"), "{text}");
        assert!(text.contains('7'), "{text}");
    }

    #[test]
    fn test_empty_aggregate_formats() {
        let err = PublishError::Aggregate(Vec::new());
        assert_eq!(err.to_string(), "0 subscriber fault(s)");
        assert_eq!(err.as_message(), "faults: []");
        assert!(err.faults().is_empty());
    }

    #[test]
    fn test_panic_fault() {
        let f = HandlerFault::new(
            SubscriberId::from_raw(3),
            "p",
            FaultKind::Panicked("oops".into()),
        );
        assert!(f.is_panic());
        assert_eq!(f.as_label(), "handler_panicked");
    }
}
