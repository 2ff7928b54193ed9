//! # Deliver one event to one snapshot of subscribers.
//!
//! Executes the delivery loop of a single publish: snapshot, filter, handle, apply
//! the fault policy, observe cancellation.
//!
//! ## Flow
//! ```text
//! cancelled? ──yes──► Err(Cancelled)
//!     │no
//! snapshot = store.snapshot()
//! for entry in snapshot:
//!   ├─ cancelled?               ─► Err(Cancelled)   (remaining entries never invoked)
//!   ├─ filter(event) == false   ─► next
//!   ├─ handler(event)
//!   │     ├─ Ok                 ─► next
//!   │     └─ Err / panic        ─► sink(fault, event)   (sink failures discarded)
//!   │                               ├─ Swallow        ─► next
//!   │                               ├─ ThrowFirst     ─► Err(Handler(fault))
//!   │                               └─ ThrowAggregate ─► record, next
//! └─ end: recorded faults? ─► Err(Aggregate(faults)) : Ok(())
//! ```
//!
//! ## Rules
//! - Exactly one snapshot per call; subscribers added or removed during the loop do not
//!   change who receives this event.
//! - Cancellation is checked before each entry; a handler already running is never
//!   interrupted by it.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    core::broadcaster::Shared,
    error::{HandlerFault, PublishError},
    policies::FaultPolicy,
    subscribers::{guarded, FaultSink},
};

/// Delivers `event` to every matching subscriber of one snapshot.
pub(crate) async fn deliver<E>(
    shared: &Shared<E>,
    event: &E,
    cancel: Option<&CancellationToken>,
) -> Result<(), PublishError>
where
    E: Send + Sync + 'static,
{
    let is_cancelled = || cancel.is_some_and(CancellationToken::is_cancelled);

    if is_cancelled() {
        debug!("publish cancelled before delivery");
        return Err(PublishError::Cancelled {
            delivered: 0,
            faults: Vec::new(),
        });
    }

    let policy = shared.cfg.policy;
    let catch_panics = shared.cfg.catch_panics;
    let snapshot = shared.store.snapshot();
    trace!(subscribers = snapshot.len(), policy = policy.as_label(), "publishing event");

    let mut faults: Vec<Arc<HandlerFault>> = Vec::new();
    let mut delivered = 0usize;

    for (idx, entry) in snapshot.iter().enumerate() {
        if is_cancelled() {
            debug!(delivered, skipped = snapshot.len() - idx, "publish cancelled mid-delivery");
            return Err(PublishError::Cancelled { delivered, faults });
        }

        let outcome = match entry.accepts(event, catch_panics).await {
            Ok(false) => continue,
            Ok(true) => {
                delivered += 1;
                entry.deliver(event, catch_panics).await
            }
            Err(fault) => Err(fault),
        };

        let Err(fault) = outcome else {
            continue;
        };
        let fault = Arc::new(fault);
        debug!(
            subscriber = %fault.subscriber,
            name = %fault.name,
            label = fault.as_label(),
            error = %fault.kind,
            "subscriber fault"
        );

        if let Some(sink) = shared.sink.as_deref() {
            notify_sink(sink, &fault, event).await;
        }

        match policy {
            FaultPolicy::Swallow => {}
            FaultPolicy::ThrowFirst => return Err(PublishError::Handler(fault)),
            FaultPolicy::ThrowAggregate => faults.push(fault),
        }
    }

    if faults.is_empty() {
        Ok(())
    } else {
        Err(PublishError::Aggregate(faults))
    }
}

/// Hands a fault to the sink; whatever the sink does is contained here.
async fn notify_sink<E>(sink: &dyn FaultSink<E>, fault: &HandlerFault, event: &E)
where
    E: Send + Sync + 'static,
{
    match guarded(sink.on_fault(fault, event), true).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!(sink = sink.name(), subscriber = %fault.subscriber, error = %err, "fault sink failed; discarded");
        }
        Err(msg) => {
            warn!(sink = sink.name(), subscriber = %fault.subscriber, panic = %msg, "fault sink panicked; discarded");
        }
    }
}
