//! # fanout
//!
//! **fanout** is a lock-free, asynchronous publish/subscribe broadcaster for Rust.
//!
//! Many producers publish typed events to a changing set of subscribers. Each
//! subscriber has an optional filter and an async handler; handler faults are
//! swallowed, fail fast, or are aggregated according to a fault policy fixed at
//! build time. Publishing can be cancelled between subscribers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   subscribe(filter, handler)          Subscription::unsubscribe / drop
//!            │                                      │
//!            ▼                                      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  SubscriptionStore                                                │
//! │  ArcSwap<Vec<Arc<SubscriberEntry>>>                               │
//! │  - add:    load ─► copy + push   ─► compare_and_swap (retry)      │
//! │  - remove: load ─► copy - id     ─► compare_and_swap (retry)      │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 │ snapshot (one per publish)
//!                                 ▼
//!   publish(&event, cancel?) ─► for entry in snapshot (in order):
//!                                 ├─ cancelled?      ─► stop, Err(Cancelled)
//!                                 ├─ filter(event)?  ─► skip on false
//!                                 ├─ handler(event)
//!                                 └─ on fault: sink(fault, event), then
//!                                      Swallow | ThrowFirst | ThrowAggregate
//! ```
//!
//! ### Guarantees
//! - One snapshot per publish: subscribers added mid-publish miss the in-flight event,
//!   subscribers removed mid-publish still get it.
//! - Delivery order within a publish equals subscription order.
//! - `ThrowAggregate` invokes every reachable subscriber before reporting.
//! - Disposing a [`Subscription`] removes its entry at most once; ids are never reused.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                              |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------------|
//! | **Engine**        | Subscribe, unsubscribe, publish with cancellation.           | [`Broadcaster`], [`Subscription`]               |
//! | **Subscribers**   | Async handlers/filters, closures, synchronous adapters.      | [`Handler`], [`Filter`], [`HandlerFn`], [`SyncHandler`] |
//! | **Policies**      | What a handler fault does to the publish.                    | [`FaultPolicy`]                                 |
//! | **Errors**        | Typed faults and publish outcomes.                           | [`HandlerFault`], [`PublishError`]              |
//! | **Configuration** | Build-time settings.                                         | [`Config`], [`BroadcasterBuilder`]              |
//!
//! ## Optional features
//! - `logging`: exports a [`FaultSink`] writing faults through `tracing` (`LogSink`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use fanout::{Broadcaster, CancellationToken, PublishError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = Broadcaster::<u32>::builder()
//!         .use_throw_aggregate_policy()
//!         .with_sync_fault_sink(|fault, ev| eprintln!("event {ev}: {fault}"))
//!         .build();
//!
//!     let seen = Arc::new(AtomicUsize::new(0));
//!     let counter = Arc::clone(&seen);
//!     let _even = bus.subscribe_sync_filtered(
//!         "even",
//!         |n: &u32| n % 2 == 0,
//!         move |_| {
//!             counter.fetch_add(1, Ordering::SeqCst);
//!             Ok(())
//!         },
//!     );
//!     let _picky = bus.subscribe_sync("picky", |n: &u32| {
//!         if *n == 3 { Err("three".into()) } else { Ok(()) }
//!     });
//!
//!     bus.publish(&2).await.unwrap();
//!     let err = bus.publish(&3).await.unwrap_err();
//!     assert_eq!(err.faults().len(), 1);
//!     assert_eq!(seen.load(Ordering::SeqCst), 1);
//!
//!     let cancel = CancellationToken::new();
//!     cancel.cancel();
//!     let err = bus.publish_with_cancel(&4, &cancel).await.unwrap_err();
//!     assert!(matches!(err, PublishError::Cancelled { delivered: 0, .. }));
//! }
//! ```
mod core;
mod error;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Broadcaster, BroadcasterBuilder, Config};
pub use error::{BoxError, FaultKind, HandlerFault, PublishError};
pub use policies::FaultPolicy;
pub use subscribers::{
    FaultSink, Filter, FilterFn, Handler, HandlerFn, SubscriberId, Subscription, SyncFaultSink,
    SyncFilter, SyncHandler,
};
pub use tokio_util::sync::CancellationToken;

// Optional: expose a ready-made logging fault sink.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogSink;
