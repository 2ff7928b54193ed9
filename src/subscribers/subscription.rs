//! # Subscription: one-shot handle that removes its entry.
//!
//! A [`Subscription`] is returned by every `subscribe` call. Disposing it
//! (explicitly via [`Subscription::unsubscribe`] or implicitly on drop) removes the
//! subscriber from the broadcaster exactly once, no matter how many times or from how
//! many threads disposal is attempted.
//!
//! ## Rules
//! - The handle refers to its broadcaster weakly: it never keeps the broadcaster alive,
//!   and disposing after the broadcaster is gone is a no-op.
//! - Removal affects future publishes only; an in-flight publish whose snapshot already
//!   holds the entry still delivers to it.
//! - Ids are never reused, so a stale handle can never remove a later subscription.
//!
//! ## Lifecycle
//! ```text
//! subscribe() ──► active ──(unsubscribe | drop)──► disposed (terminal)
//!                   └──────(detach)──────────────► detached (entry kept, handle gone)
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;

use super::entry::SubscriberId;

/// Removal side of a broadcaster, as seen by a [`Subscription`].
pub(crate) trait Unsubscribe: Send + Sync {
    /// Removes the entry; `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriberId) -> bool;
}

/// Weak reference to the broadcaster a subscription belongs to.
struct Owner(Weak<dyn Unsubscribe>);

/// Handle to an active subscription.
///
/// Dropping the handle unsubscribes. Use [`Subscription::detach`] to keep the
/// subscriber registered for the lifetime of the broadcaster.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    id: SubscriberId,
    owner: ArcSwapOption<Owner>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, owner: Weak<dyn Unsubscribe>) -> Self {
        Self {
            id,
            owner: ArcSwapOption::new(Some(Arc::new(Owner(owner)))),
        }
    }

    /// Identity of the subscriber this handle controls.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// True until the first disposal (or detach).
    pub fn is_active(&self) -> bool {
        self.owner.load().is_some()
    }

    /// Removes the subscriber from its broadcaster.
    ///
    /// Returns `true` only for the call that actually removed the entry; every later
    /// or concurrent call returns `false`.
    pub fn unsubscribe(&self) -> bool {
        let Some(owner) = self.owner.swap(None) else {
            return false;
        };
        match owner.0.upgrade() {
            Some(owner) => owner.unsubscribe(self.id),
            None => false,
        }
    }

    /// Gives up the handle without unsubscribing.
    pub fn detach(self) {
        self.owner.store(None);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        removed: AtomicUsize,
    }

    impl Unsubscribe for Counting {
        fn unsubscribe(&self, _id: SubscriberId) -> bool {
            self.removed.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn handle(owner: &Arc<Counting>) -> Subscription {
        let weak: Weak<dyn Unsubscribe> = Arc::downgrade(owner) as Weak<dyn Unsubscribe>;
        Subscription::new(SubscriberId::from_raw(1), weak)
    }

    #[test]
    fn test_unsubscribe_fires_once() {
        let owner = Arc::new(Counting::default());
        let sub = handle(&owner);
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert!(!sub.is_active());
        drop(sub);
        assert_eq!(owner.removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disposal_releases_owner_reference() {
        let owner = Arc::new(Counting::default());
        let sub = handle(&owner);
        assert_eq!(Arc::weak_count(&owner), 1);
        assert!(sub.unsubscribe());
        assert_eq!(Arc::weak_count(&owner), 0);
        assert!(!sub.is_active());
    }

    #[test]
    fn test_detach_releases_owner_reference() {
        let owner = Arc::new(Counting::default());
        let sub = handle(&owner);
        sub.detach();
        assert_eq!(Arc::weak_count(&owner), 0);
        assert_eq!(owner.removed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let owner = Arc::new(Counting::default());
        drop(handle(&owner));
        assert_eq!(owner.removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_detach_keeps_entry() {
        let owner = Arc::new(Counting::default());
        handle(&owner).detach();
        assert_eq!(owner.removed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_disposal_fires_once() {
        let owner = Arc::new(Counting::default());
        let sub = Arc::new(handle(&owner));
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let sub = Arc::clone(&sub);
                std::thread::spawn(move || sub.unsubscribe())
            })
            .collect();
        let wins = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(owner.removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dead_owner_is_noop() {
        let owner = Arc::new(Counting::default());
        let sub = handle(&owner);
        drop(owner);
        assert!(!sub.unsubscribe());
    }
}
