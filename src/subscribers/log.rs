//! # LogSink: fault sink that writes through `tracing`
//!
//! A minimal [`FaultSink`] that records every handler fault as an `ERROR` event.
//! Use it for tests, demos, or as a baseline when the `Swallow` policy hides faults
//! from publishers.
//!
//! ## Example output (with `tracing-subscriber`'s fmt layer)
//! ```text
//! ERROR fanout::subscribers::log: subscriber fault subscriber=#3 name="audit" label="handler_failed" event=OrderPlaced { id: 7 } error=failed: connection refused
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::error;

use crate::error::{BoxError, HandlerFault};
use crate::subscribers::FaultSink;

/// Fault sink that logs faults.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    /// Construct a new [`LogSink`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<E> FaultSink<E> for LogSink
where
    E: Debug + Send + Sync + 'static,
{
    async fn on_fault(&self, fault: &HandlerFault, event: &E) -> Result<(), BoxError> {
        error!(
            subscriber = %fault.subscriber,
            name = %fault.name,
            label = fault.as_label(),
            event = ?event,
            error = %fault.kind,
            "subscriber fault"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "LogSink"
    }
}
