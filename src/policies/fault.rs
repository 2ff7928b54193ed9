//! # Fault policies for the delivery loop.
//!
//! [`FaultPolicy`] decides what a publish does after a subscriber's handler fails.
//!
//! - [`FaultPolicy::Swallow`] the fault is dropped, delivery continues, publish succeeds.
//! - [`FaultPolicy::ThrowFirst`] delivery stops at the failing subscriber; the fault is returned.
//! - [`FaultPolicy::ThrowAggregate`] delivery continues; all faults are returned together (default).
//!
//! ## Choosing the right policy
//! ```text
//! Fire-and-forget notifications  → Swallow         (pair it with a fault sink)
//! Pipelines where a failure
//! invalidates later steps        → ThrowFirst
//! "Everyone must get a chance"   → ThrowAggregate
//! ```
//!
//! The fault sink (if configured) is invoked for every fault under every policy.

/// Policy controlling how handler faults affect a publish call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Hide handler faults from the caller; every reachable subscriber is invoked.
    Swallow,
    /// Re-raise the first handler fault; later subscribers are skipped.
    ThrowFirst,
    /// Invoke every reachable subscriber, then report all faults at once (default).
    #[default]
    ThrowAggregate,
}

impl FaultPolicy {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FaultPolicy::Swallow => "swallow",
            FaultPolicy::ThrowFirst => "throw_first",
            FaultPolicy::ThrowAggregate => "throw_aggregate",
        }
    }

    /// True if a fault ends the delivery loop immediately.
    #[inline]
    pub fn stops_on_fault(&self) -> bool {
        matches!(self, FaultPolicy::ThrowFirst)
    }
}
