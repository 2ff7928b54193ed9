//! # SubscriptionStore: lock-free copy-on-write subscriber list
//!
//! [`SubscriptionStore`] keeps the current subscriber sequence behind a single atomically
//! swappable reference ([`ArcSwap`]). The sequence itself is never mutated: every change
//! builds a new `Vec` and installs it with a compare-and-swap against the reference it
//! was built from, retrying if another writer won the race.
//!
//! ## What it guarantees
//! - `snapshot()` observes one complete sequence that existed at some instant.
//! - `add` / `remove` are linearizable with respect to each other and to `snapshot`.
//! - Insertion order is preserved; ids are unique within the sequence.
//! - Readers never block writers and writers never block readers.
//!
//! ## Diagram
//! ```text
//!  writer A:  load ─► [e1,e2] ─► build [e1,e2,e3] ─► CAS(old=[e1,e2]) ✓
//!  writer B:  load ─► [e1,e2] ─► build [e2]       ─► CAS(old=[e1,e2]) ✗
//!                                                   └► reload [e1,e2,e3] ─► build [e2,e3] ─► CAS ✓
//!  publish:   load_full ─► Arc<[e1,e2]>  (kept alive for the whole delivery loop)
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::entry::{SubscriberEntry, SubscriberId};

/// Immutable sequence of entries shared between the store and in-flight publishes.
pub(crate) type Snapshot<E> = Arc<Vec<Arc<SubscriberEntry<E>>>>;

/// Lock-free subscriber list.
pub(crate) struct SubscriptionStore<E>
where
    E: Send + Sync + 'static,
{
    current: ArcSwap<Vec<Arc<SubscriberEntry<E>>>>,
}

impl<E> SubscriptionStore<E>
where
    E: Send + Sync + 'static,
{
    /// Creates an empty store.
    pub(crate) fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Appends `entry` at the end of the sequence.
    pub(crate) fn add(&self, entry: Arc<SubscriberEntry<E>>) {
        self.update(|cur| {
            let mut next = Vec::with_capacity(cur.len() + 1);
            next.extend(cur.iter().cloned());
            next.push(Arc::clone(&entry));
            Some(next)
        });
    }

    /// Removes the entry with `id`.
    ///
    /// Returns `false` (and leaves the store untouched) if the id is not present,
    /// which makes repeated removal a no-op.
    pub(crate) fn remove(&self, id: SubscriberId) -> bool {
        self.update(|cur| {
            if !cur.iter().any(|e| e.id() == id) {
                return None;
            }
            Some(cur.iter().filter(|e| e.id() != id).cloned().collect())
        })
    }

    /// Returns the current sequence; later mutations do not affect it.
    pub(crate) fn snapshot(&self) -> Snapshot<E> {
        self.current.load_full()
    }

    /// Number of entries in the current sequence.
    pub(crate) fn len(&self) -> usize {
        self.current.load().len()
    }

    /// Read / rebuild / compare-and-swap loop.
    ///
    /// `rebuild` returns `None` to abandon the update. Returns `true` if a new
    /// sequence was installed.
    fn update<F>(&self, mut rebuild: F) -> bool
    where
        F: FnMut(&[Arc<SubscriberEntry<E>>]) -> Option<Vec<Arc<SubscriberEntry<E>>>>,
    {
        let mut cur = self.current.load();
        loop {
            let Some(next) = rebuild(cur.as_slice()) else {
                return false;
            };
            let prev = self.current.compare_and_swap(&*cur, Arc::new(next));
            if Arc::ptr_eq(&*cur, &*prev) {
                return true;
            }
            cur = prev;
        }
    }
}
