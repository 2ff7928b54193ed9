//! # Broadcaster: the publish/subscribe engine.
//!
//! [`Broadcaster`] owns a lock-free subscriber list and delivers each published event to
//! every subscriber present when the publish started.
//!
//! ## What it guarantees
//! - Within one publish, subscribers are invoked sequentially in subscription order.
//! - A subscriber added during a publish does not receive that event; one removed
//!   during a publish still does if the snapshot already held it.
//! - Handler faults follow the configured [`FaultPolicy`].
//!
//! ## What it does **not** guarantee
//! - No ordering between concurrent publishes.
//! - No queueing, persistence or back-pressure: `publish` delivers inline.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    core::{publisher, BroadcasterBuilder, Config},
    error::{BoxError, PublishError},
    policies::FaultPolicy,
    subscribers::{
        FaultSink, Filter, Handler, HandlerFn, SubscriberEntry, SubscriberId, Subscription,
        SubscriptionStore, SyncFilter, SyncHandler, Unsubscribe,
    },
};

/// State shared by all clones of a broadcaster and referenced weakly by subscriptions.
pub(crate) struct Shared<E>
where
    E: Send + Sync + 'static,
{
    pub(crate) cfg: Config,
    pub(crate) store: SubscriptionStore<E>,
    pub(crate) sink: Option<Arc<dyn FaultSink<E>>>,
    /// Number of ids handed out so far.
    issued: AtomicU64,
}

impl<E> Shared<E>
where
    E: Send + Sync + 'static,
{
    /// Allocates the next id: `first_id + issued`, never wrapping.
    fn next_id(&self) -> SubscriberId {
        let raw = self
            .issued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .ok()
            .and_then(|n| self.cfg.first_id.checked_add(n));
        match raw {
            Some(raw) => SubscriberId::from_raw(raw),
            None => panic!(
                "subscriber id space exhausted (first_id = {})",
                self.cfg.first_id
            ),
        }
    }
}

impl<E> Unsubscribe for Shared<E>
where
    E: Send + Sync + 'static,
{
    fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.store.remove(id);
        debug!(subscriber = %id, removed, "unsubscribed");
        removed
    }
}

/// Lock-free asynchronous publish/subscribe engine.
///
/// Cloning is cheap and yields a handle to the same subscriber list.
///
/// ## Example
/// ```rust
/// use fanout::{Broadcaster, BoxError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bus: Broadcaster<String> = Broadcaster::builder().use_throw_first_policy().build();
///
/// let sub = bus.subscribe_fn("printer", |ev: String| async move {
///     println!("got {ev}");
///     Ok::<_, BoxError>(())
/// });
///
/// bus.publish(&"hello".to_string()).await?;
/// assert_eq!(bus.subscriber_count(), 1);
///
/// sub.unsubscribe();
/// assert_eq!(bus.subscriber_count(), 0);
/// # Ok(())
/// # }
/// ```
pub struct Broadcaster<E>
where
    E: Send + Sync + 'static,
{
    shared: Arc<Shared<E>>,
}

impl<E> Broadcaster<E>
where
    E: Send + Sync + 'static,
{
    /// Returns a builder starting from [`Config::default`].
    pub fn builder() -> BroadcasterBuilder<E> {
        BroadcasterBuilder::default()
    }

    /// Creates a broadcaster with the default configuration and no fault sink.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub(crate) fn from_parts(cfg: Config, sink: Option<Arc<dyn FaultSink<E>>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                cfg,
                store: SubscriptionStore::new(),
                sink,
                issued: AtomicU64::new(0),
            }),
        }
    }

    /// Registers a subscriber.
    ///
    /// `filter = None` delivers every event. The subscriber receives events published
    /// after this call returns.
    ///
    /// # Panics
    /// Panics if the id counter would pass `u64::MAX`. Ids are never reused, so the
    /// counter cannot wrap; only a [`Config::first_id`] close to `u64::MAX` gets there.
    pub fn subscribe(
        &self,
        filter: Option<Arc<dyn Filter<E>>>,
        handler: Arc<dyn Handler<E>>,
    ) -> Subscription {
        let id = self.shared.next_id();
        debug!(subscriber = %id, name = handler.name(), filtered = filter.is_some(), "subscribed");

        self.shared
            .store
            .add(Arc::new(SubscriberEntry::new(id, filter, handler)));

        let owner: Weak<dyn Unsubscribe> = Arc::downgrade(&self.shared) as Weak<dyn Unsubscribe>;
        Subscription::new(id, owner)
    }

    /// Registers an async closure as an unfiltered subscriber.
    ///
    /// The closure receives an owned clone of each event.
    pub fn subscribe_fn<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F) -> Subscription
    where
        E: Clone,
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.subscribe(None, HandlerFn::arc(name, f))
    }

    /// Registers a synchronous handler; it runs to completion inside the publish.
    pub fn subscribe_sync<H>(&self, name: impl Into<Cow<'static, str>>, handler: H) -> Subscription
    where
        H: Fn(&E) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.subscribe(None, Arc::new(SyncHandler::new(name, handler)))
    }

    /// Registers a synchronous predicate/handler pair.
    pub fn subscribe_sync_filtered<P, H>(
        &self,
        name: impl Into<Cow<'static, str>>,
        filter: P,
        handler: H,
    ) -> Subscription
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
        H: Fn(&E) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let filter: Arc<dyn Filter<E>> = Arc::new(SyncFilter::new(filter));
        self.subscribe(Some(filter), Arc::new(SyncHandler::new(name, handler)))
    }

    /// Publishes `event` to every matching subscriber.
    ///
    /// See [`PublishError`] for the possible failures under each [`FaultPolicy`].
    pub async fn publish(&self, event: &E) -> Result<(), PublishError> {
        publisher::deliver(&self.shared, event, None).await
    }

    /// Publishes `event`, stopping before the next subscriber once `cancel` fires.
    ///
    /// If `cancel` is already cancelled no subscriber is invoked.
    pub async fn publish_with_cancel(
        &self,
        event: &E,
        cancel: &CancellationToken,
    ) -> Result<(), PublishError> {
        publisher::deliver(&self.shared, event, Some(cancel)).await
    }

    /// Instantaneous number of subscribers (may be stale by the time it is read).
    pub fn subscriber_count(&self) -> usize {
        self.shared.store.len()
    }

    /// True if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscriber_count() == 0
    }

    /// Ids of the current subscribers, in delivery order.
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.shared.store.snapshot().iter().map(|e| e.id()).collect()
    }

    /// Fault policy fixed at build time.
    pub fn policy(&self) -> FaultPolicy {
        self.shared.cfg.policy
    }
}

impl<E> Clone for Broadcaster<E>
where
    E: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E> Default for Broadcaster<E>
where
    E: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Broadcaster<E>
where
    E: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("policy", &self.shared.cfg.policy)
            .field("subscribers", &self.subscriber_count())
            .field("fault_sink", &self.shared.sink.as_ref().map(|s| s.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let bus: Broadcaster<u8> = Broadcaster::new();
        let a = bus.subscribe_sync("a", |_| Ok(()));
        let a_id = a.id();
        drop(a);
        let b = bus.subscribe_sync("b", |_| Ok(()));
        assert!(b.id() > a_id);
        assert_eq!(bus.subscriber_ids(), vec![b.id()]);
    }

    #[test]
    fn test_stale_handle_does_not_remove_new_subscriber() {
        let bus: Broadcaster<u8> = Broadcaster::new();
        let a = bus.subscribe_sync("a", |_| Ok(()));
        assert!(a.unsubscribe());
        let b = bus.subscribe_sync("b", |_| Ok(()));
        assert!(!a.unsubscribe());
        drop(a);
        assert_eq!(bus.subscriber_ids(), vec![b.id()]);
    }

    #[test]
    fn test_last_id_is_handed_out_once() {
        let cfg = Config {
            first_id: u64::MAX,
            ..Config::default()
        };
        let bus: Broadcaster<u8> = BroadcasterBuilder::new(cfg).build();
        let last = bus.subscribe_sync("last", |_| Ok(()));
        assert_eq!(last.id().get(), u64::MAX);
    }

    #[test]
    #[should_panic(expected = "subscriber id space exhausted")]
    fn test_id_counter_never_wraps() {
        let cfg = Config {
            first_id: u64::MAX,
            ..Config::default()
        };
        let bus: Broadcaster<u8> = BroadcasterBuilder::new(cfg).build();
        let _last = bus.subscribe_sync("last", |_| Ok(()));
        let _wrapped = bus.subscribe_sync("wrapped", |_| Ok(()));
    }

    #[test]
    fn test_exhausted_counter_leaves_store_untouched() {
        let cfg = Config {
            first_id: u64::MAX,
            ..Config::default()
        };
        let bus: Broadcaster<u8> = BroadcasterBuilder::new(cfg).build();
        let last = bus.subscribe_sync("last", |_| Ok(()));
        let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            bus.subscribe_sync("wrapped", |_| Ok(())).detach();
        }));
        assert!(attempt.is_err());
        assert_eq!(bus.subscriber_ids(), vec![last.id()]);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus: Broadcaster<u8> = Broadcaster::new();
        let other = bus.clone();
        let _sub = other.subscribe_sync("a", |_| Ok(()));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_broadcaster() {
        let bus: Broadcaster<u8> = Broadcaster::new();
        let sub = bus.subscribe_sync("a", |_| Ok(()));
        drop(bus);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn test_debug_output() {
        let bus: Broadcaster<u8> = Broadcaster::builder().use_swallow_policy().build();
        let text = format!("{bus:?}");
        assert!(text.contains("Swallow"), "{text}");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus: Broadcaster<u8> = Broadcaster::new();
        assert!(bus.publish(&1).await.is_ok());
    }
}
