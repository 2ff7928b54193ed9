//! # Subscriber entry: one immutable row of the subscription store.
//!
//! An entry is created by `subscribe`, never mutated, and shared read-only between the
//! store and every in-flight publish whose snapshot captured it.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::{FaultKind, HandlerFault};
use crate::subscribers::{Filter, Handler};

/// Identity of a subscription.
///
/// Unique and monotonically increasing per broadcaster; never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Wraps a raw id value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable subscription record: identity, optional filter, delivery function.
pub(crate) struct SubscriberEntry<E>
where
    E: Send + Sync + 'static,
{
    id: SubscriberId,
    filter: Option<Arc<dyn Filter<E>>>,
    handler: Arc<dyn Handler<E>>,
}

impl<E> SubscriberEntry<E>
where
    E: Send + Sync + 'static,
{
    pub(crate) fn new(
        id: SubscriberId,
        filter: Option<Arc<dyn Filter<E>>>,
        handler: Arc<dyn Handler<E>>,
    ) -> Self {
        Self { id, filter, handler }
    }

    #[inline]
    pub(crate) fn id(&self) -> SubscriberId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        self.handler.name()
    }

    /// Evaluates the filter; an absent filter accepts everything.
    ///
    /// A panicking filter is reported as a fault when `catch_panics` is set.
    pub(crate) async fn accepts(&self, event: &E, catch_panics: bool) -> Result<bool, HandlerFault> {
        let Some(filter) = &self.filter else {
            return Ok(true);
        };
        guarded(filter.matches(event), catch_panics)
            .await
            .map_err(|msg| self.fault(FaultKind::Panicked(msg)))
    }

    /// Invokes the handler, turning `Err` and caught panics into a [`HandlerFault`].
    pub(crate) async fn deliver(&self, event: &E, catch_panics: bool) -> Result<(), HandlerFault> {
        match guarded(self.handler.handle(event), catch_panics).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(self.fault(FaultKind::Failed(err))),
            Err(msg) => Err(self.fault(FaultKind::Panicked(msg))),
        }
    }

    fn fault(&self, kind: FaultKind) -> HandlerFault {
        HandlerFault::new(self.id, self.name(), kind)
    }
}

impl<E> fmt::Debug for SubscriberEntry<E>
where
    E: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberEntry")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Awaits `fut`, catching a panic into its message when `catch` is set.
pub(crate) async fn guarded<F>(fut: F, catch: bool) -> Result<F::Output, String>
where
    F: Future,
{
    if catch {
        AssertUnwindSafe(fut).catch_unwind().await.map_err(panic_message)
    } else {
        Ok(fut.await)
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::subscribers::{SyncFilter, SyncHandler};

    fn entry<F>(handler: F) -> SubscriberEntry<u32>
    where
        F: Fn(&u32) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        SubscriberEntry::new(
            SubscriberId::from_raw(1),
            None,
            Arc::new(SyncHandler::new("h", handler)),
        )
    }

    #[tokio::test]
    async fn test_missing_filter_accepts() {
        let e = entry(|_| Ok(()));
        assert!(e.accepts(&1, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_filter_rejects() {
        let e = SubscriberEntry::new(
            SubscriberId::from_raw(2),
            Some(Arc::new(SyncFilter::new(|n: &u32| *n > 10)) as Arc<dyn Filter<u32>>),
            Arc::new(SyncHandler::new("h", |_: &u32| -> Result<(), BoxError> { Ok(()) }))
                as Arc<dyn Handler<u32>>,
        );
        assert!(!e.accepts(&3, true).await.unwrap());
        assert!(e.accepts(&11, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_error_becomes_fault() {
        let e = entry(|_| Err("nope".into()));
        let fault = e.deliver(&1, true).await.unwrap_err();
        assert_eq!(fault.subscriber, SubscriberId::from_raw(1));
        assert_eq!(fault.name, "h");
        assert!(matches!(fault.kind, FaultKind::Failed(_)));
    }

    #[tokio::test]
    async fn test_panic_becomes_fault() {
        let e = entry(|_| panic!("kaboom"));
        let fault = e.deliver(&1, true).await.unwrap_err();
        match fault.kind {
            FaultKind::Panicked(msg) => assert_eq!(msg, "kaboom"),
            other => panic!("unexpected fault kind: {other:?}"),
        }
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SubscriberId::from_raw(42).to_string(), "#42");
    }
}
