//! # Subscribers: traits, adapters, storage and handles.
//!
//! This module provides the [`Handler`], [`Filter`] and [`FaultSink`] traits, the
//! function-backed and synchronous adapters implementing them, the lock-free store
//! holding registered subscribers, and the [`Subscription`] handle returned to callers.
//!
//! ## Architecture
//! ```text
//! Broadcaster::subscribe(filter, handler)
//!      │
//!      ├──► SubscriberEntry { id, filter, handler }   (immutable)
//!      │         │
//!      │         ▼
//!      │    SubscriptionStore ── ArcSwap<Vec<Arc<SubscriberEntry>>> (copy-on-write, CAS)
//!      │
//!      └──► Subscription { id, Weak<owner> }  ── unsubscribe/drop ──► store.remove(id)
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use fanout::{BoxError, Filter, Handler};
//! use async_trait::async_trait;
//!
//! struct OnlyErrors;
//!
//! #[async_trait]
//! impl Filter<String> for OnlyErrors {
//!     async fn matches(&self, event: &String) -> bool {
//!         event.starts_with("error:")
//!     }
//! }
//!
//! struct Pager;
//!
//! #[async_trait]
//! impl Handler<String> for Pager {
//!     async fn handle(&self, event: &String) -> Result<(), BoxError> {
//!         // page someone
//!         let _ = event;
//!         Ok(())
//!     }
//! }
//! ```

mod entry;
mod handler_fn;
#[cfg(feature = "logging")]
mod log;
mod store;
mod subscriber;
mod subscription;
mod sync;

pub(crate) use entry::{guarded, SubscriberEntry};
pub(crate) use store::SubscriptionStore;
pub(crate) use subscription::Unsubscribe;

pub use entry::SubscriberId;
pub use handler_fn::{FilterFn, HandlerFn};
#[cfg(feature = "logging")]
pub use log::LogSink;
pub use subscriber::{FaultSink, Filter, Handler};
pub use subscription::Subscription;
pub use sync::{SyncFaultSink, SyncFilter, SyncHandler};
