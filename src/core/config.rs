//! # Broadcaster configuration.
//!
//! Provides [`Config`], the settings a [`Broadcaster`](crate::Broadcaster) freezes at build time.
//!
//! Config is used in two ways:
//! 1. **Directly**: `BroadcasterBuilder::new(config)`
//! 2. **Via builder methods**: `Broadcaster::builder().use_throw_first_policy()`
//!
//! Every combination of values is valid; nothing is checked at build time.

use crate::policies::FaultPolicy;

/// Settings for a broadcaster instance.
///
/// ## Field semantics
/// - `policy`: what a publish does after a handler fault
/// - `catch_panics`: whether panicking filters/handlers become faults (`true`) or unwind into the publisher (`false`)
/// - `first_id`: raw value of the first [`SubscriberId`](crate::SubscriberId) handed out
#[derive(Clone, Debug)]
pub struct Config {
    /// Fault policy applied by every publish.
    pub policy: FaultPolicy,

    /// Convert panics in filters and handlers into [`HandlerFault`](crate::HandlerFault)s.
    ///
    /// Panics raised by the fault sink are always caught and discarded.
    pub catch_panics: bool,

    /// Base value of the subscriber id counter.
    ///
    /// Ids run from `first_id` up to `u64::MAX` and never wrap: subscribing once the
    /// range is used up panics.
    pub first_id: u64,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `policy = FaultPolicy::ThrowAggregate`
    /// - `catch_panics = true`
    /// - `first_id = 1`
    fn default() -> Self {
        Self {
            policy: FaultPolicy::default(),
            catch_panics: true,
            first_id: 1,
        }
    }
}
