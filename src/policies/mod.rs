//! Fault handling policies.
//!
//! ## Contents
//! - [`FaultPolicy`] what a publish does after a handler fails (swallow / throw-first / aggregate)
//!
//! ## Quick wiring
//! ```text
//! Config { policy: FaultPolicy, .. }
//!      └─► core::publisher::deliver uses:
//!           - policy to continue, stop, or collect after each fault
//! ```

mod fault;

pub use fault::FaultPolicy;
