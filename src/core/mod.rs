//! Engine core: configuration, construction and the delivery loop.
//!
//! The public API from this module is [`Broadcaster`], its [`BroadcasterBuilder`]
//! and [`Config`].
//!
//! Internal modules:
//! - [`broadcaster`]: subscribe / unsubscribe / publish entry points;
//! - [`publisher`]: delivers one event to one snapshot, applying the fault policy;
//! - [`builder`]: assembles policy and fault sink into an immutable broadcaster;
//! - [`config`]: settings frozen at build time.

mod broadcaster;
mod builder;
mod config;
mod publisher;

pub use broadcaster::Broadcaster;
pub use builder::BroadcasterBuilder;
pub use config::Config;
