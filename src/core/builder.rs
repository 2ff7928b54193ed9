use std::sync::Arc;

use crate::{
    core::{Broadcaster, Config},
    error::HandlerFault,
    policies::FaultPolicy,
    subscribers::{FaultSink, SyncFaultSink},
};

/// Builder for constructing a [`Broadcaster`].
///
/// All choices are total: [`build`](Self::build) cannot fail.
pub struct BroadcasterBuilder<E>
where
    E: Send + Sync + 'static,
{
    cfg: Config,
    sink: Option<Arc<dyn FaultSink<E>>>,
}

impl<E> BroadcasterBuilder<E>
where
    E: Send + Sync + 'static,
{
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self { cfg, sink: None }
    }

    /// Sets the fault sink, invoked once per handler fault under every policy.
    ///
    /// Errors and panics raised by the sink are logged and discarded.
    pub fn with_fault_sink(mut self, sink: Arc<dyn FaultSink<E>>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets a synchronous function as the fault sink.
    pub fn with_sync_fault_sink<F>(self, f: F) -> Self
    where
        F: Fn(&HandlerFault, &E) + Send + Sync + 'static,
    {
        self.with_fault_sink(Arc::new(SyncFaultSink::new(f)))
    }

    /// Selects the fault policy by value.
    pub fn with_policy(mut self, policy: FaultPolicy) -> Self {
        self.cfg.policy = policy;
        self
    }

    /// Handler faults are hidden from publishers.
    pub fn use_swallow_policy(self) -> Self {
        self.with_policy(FaultPolicy::Swallow)
    }

    /// The first handler fault stops delivery and is returned.
    pub fn use_throw_first_policy(self) -> Self {
        self.with_policy(FaultPolicy::ThrowFirst)
    }

    /// Every subscriber runs; all faults are returned together (default).
    pub fn use_throw_aggregate_policy(self) -> Self {
        self.with_policy(FaultPolicy::ThrowAggregate)
    }

    /// Controls whether panics in filters and handlers are converted into faults.
    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.cfg.catch_panics = catch;
        self
    }

    /// Builds the broadcaster. Its subscriber list starts empty.
    pub fn build(self) -> Broadcaster<E> {
        Broadcaster::from_parts(self.cfg, self.sink)
    }
}

impl<E> Default for BroadcasterBuilder<E>
where
    E: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_aggregate() {
        let b: Broadcaster<u8> = BroadcasterBuilder::default().build();
        assert_eq!(b.policy(), FaultPolicy::ThrowAggregate);
        assert!(b.is_empty());
    }

    #[test]
    fn test_last_policy_wins() {
        let b: Broadcaster<u8> = BroadcasterBuilder::default()
            .use_swallow_policy()
            .use_throw_first_policy()
            .build();
        assert_eq!(b.policy(), FaultPolicy::ThrowFirst);
    }

    #[test]
    fn test_first_id_from_config() {
        let cfg = Config {
            first_id: 100,
            ..Config::default()
        };
        let b: Broadcaster<u8> = BroadcasterBuilder::new(cfg).build();
        let sub = b.subscribe_sync("noop", |_| Ok(()));
        assert_eq!(sub.id().get(), 100);
    }
}
