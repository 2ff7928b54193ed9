//! # Subscriber traits.
//!
//! Provides the extension points a subscription is made of:
//! - [`Handler`] receives the event (required),
//! - [`Filter`] decides whether the handler sees it (optional),
//! - [`FaultSink`] observes handler faults (optional, one per broadcaster).
//!
//! ## Architecture
//! ```text
//! publish(&E) ──► snapshot ──► for each entry:
//!                                 filter.matches(&E)? ──► handler.handle(&E)
//!                                                               │ Err / panic
//!                                                               ▼
//!                                                    sink.on_fault(&fault, &E)
//! ```
//!
//! ## Rules
//! - Handlers run sequentially, in subscription order, in the publisher's task.
//! - A slow handler delays every subscriber after it in the same publish.
//! - Use async I/O; avoid blocking the executor.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use fanout::{BoxError, Handler};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Handler<String> for Audit {
//!     async fn handle(&self, event: &String) -> Result<(), BoxError> {
//!         if event.is_empty() {
//!             return Err("empty event".into());
//!         }
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str { "audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::error::{BoxError, HandlerFault};

/// Delivery function of a subscription.
///
/// Returning `Err` raises a handler fault, which is then treated according to the
/// broadcaster's [`FaultPolicy`](crate::FaultPolicy).
#[async_trait]
pub trait Handler<E>: Send + Sync + 'static
where
    E: Send + Sync + 'static,
{
    /// Processes a single event.
    async fn handle(&self, event: &E) -> Result<(), BoxError>;

    /// Returns the handler name used in logs and faults.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Per-subscription predicate; `false` skips the handler for this event.
#[async_trait]
pub trait Filter<E>: Send + Sync + 'static
where
    E: Send + Sync + 'static,
{
    /// Returns `true` if the event should be delivered.
    async fn matches(&self, event: &E) -> bool;
}

/// Observer of handler faults.
///
/// Called once per fault, before the fault policy is applied. Whatever the sink
/// does (return `Err`, panic) never changes the outcome of the publish.
#[async_trait]
pub trait FaultSink<E>: Send + Sync + 'static
where
    E: Send + Sync + 'static,
{
    /// Receives a fault together with the event that caused it.
    async fn on_fault(&self, fault: &HandlerFault, event: &E) -> Result<(), BoxError>;

    /// Returns the sink name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
