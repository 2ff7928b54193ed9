//! # Adapters for synchronous subscriber functions.
//!
//! Single-threaded, synchronous event code usually comes as three plain function shapes:
//! a predicate `Fn(&E) -> bool`, a handler `Fn(&E) -> Result<(), BoxError>` and an error
//! sink `Fn(&HandlerFault, &E)`. The wrappers here turn each of them into the async
//! [`Filter`], [`Handler`] and [`FaultSink`] traits. The returned futures are ready
//! on first poll: the function runs to completion inside `poll`.
//!
//! See [`Broadcaster::subscribe_sync`](crate::Broadcaster::subscribe_sync) and
//! [`BroadcasterBuilder::with_sync_fault_sink`](crate::BroadcasterBuilder::with_sync_fault_sink).

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;

use crate::error::{BoxError, HandlerFault};
use crate::subscribers::{FaultSink, Filter, Handler};

/// Synchronous predicate exposed as a [`Filter`].
pub struct SyncFilter<F>(F);

impl<F> SyncFilter<F> {
    /// Wraps a synchronous predicate.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for SyncFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncFilter").finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, F> Filter<E> for SyncFilter<F>
where
    E: Send + Sync + 'static,
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    async fn matches(&self, event: &E) -> bool {
        (self.0)(event)
    }
}

/// Synchronous delivery function exposed as a [`Handler`].
pub struct SyncHandler<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncHandler<F> {
    /// Wraps a synchronous handler under the given name.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> fmt::Debug for SyncHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, F> Handler<E> for SyncHandler<F>
where
    E: Send + Sync + 'static,
    F: Fn(&E) -> Result<(), BoxError> + Send + Sync + 'static,
{
    async fn handle(&self, event: &E) -> Result<(), BoxError> {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Synchronous error sink exposed as a [`FaultSink`].
pub struct SyncFaultSink<F>(F);

impl<F> SyncFaultSink<F> {
    /// Wraps a synchronous error sink.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for SyncFaultSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncFaultSink")
            .field("name", &"sync_fault_sink")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<E, F> FaultSink<E> for SyncFaultSink<F>
where
    E: Send + Sync + 'static,
    F: Fn(&HandlerFault, &E) + Send + Sync + 'static,
{
    async fn on_fault(&self, fault: &HandlerFault, event: &E) -> Result<(), BoxError> {
        (self.0)(fault, event);
        Ok(())
    }

    fn name(&self) -> &str {
        "sync_fault_sink"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_sync_adapters_resolve_immediately() {
        let filter = SyncFilter::new(|n: &u8| *n % 2 == 0);
        assert_eq!(filter.matches(&4).now_or_never(), Some(true));
        assert_eq!(filter.matches(&3).now_or_never(), Some(false));

        let handler = SyncHandler::new("odd_fails", |n: &u8| -> Result<(), BoxError> {
            if *n % 2 == 1 {
                Err("odd".into())
            } else {
                Ok(())
            }
        });
        assert!(matches!(handler.handle(&2).now_or_never(), Some(Ok(()))));
        assert!(matches!(handler.handle(&1).now_or_never(), Some(Err(_))));
    }

    #[test]
    fn test_debug_shows_name() {
        let handler = SyncHandler::new("audit", |_: &u8| -> Result<(), BoxError> { Ok(()) });
        assert_eq!(format!("{handler:?}"), r#"SyncHandler { name: "audit", .. }"#);
        let filter = SyncFilter::new(|_: &u8| true);
        assert_eq!(format!("{filter:?}"), "SyncFilter { .. }");
        let sink = SyncFaultSink::new(|_: &HandlerFault, _: &u8| {});
        assert!(format!("{sink:?}").contains("sync_fault_sink"));
    }
}
