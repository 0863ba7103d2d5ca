//! Invalidation fence for cache-aside populates.
//!
//! A read takes a [`FenceTicket`] before it queries the store. A write
//! advances the fence for every key it invalidates. A populate is only
//! allowed if none of its key's invalidations happened after the ticket was
//! taken, which keeps a slow reader from writing a stale record back into
//! the cache after a concurrent write deleted it.
//!
//! The per-key map is bounded. When a key is evicted its epoch is folded
//! into `floor`, so keys the fence no longer tracks are treated as if they
//! were invalidated at `floor`. That only ever rejects populates; it never
//! lets a stale one through.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use lru::LruCache;

/// Epoch observed by a read before it queried the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FenceTicket(u64);

#[derive(Debug)]
struct FenceState {
    epoch: u64,
    last_invalidated: LruCache<String, u64>,
    floor: u64,
}

#[derive(Debug)]
pub struct InvalidationFence {
    state: Mutex<FenceState>,
}

impl InvalidationFence {
    /// Creates a fence tracking at most `max_keys` recently invalidated keys.
    pub fn new(max_keys: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(FenceState {
                epoch: 0,
                last_invalidated: LruCache::new(max_keys),
                floor: 0,
            }),
        }
    }

    // The guarded section never panics, so a poisoned lock still holds
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, FenceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Takes a ticket. Must be called before the store is queried.
    pub fn ticket(&self) -> FenceTicket {
        FenceTicket(self.lock().epoch)
    }

    /// Records an invalidation of `keys`. Must be called after the store
    /// write and before the cache keys are deleted.
    pub fn advance(&self, keys: &[String]) {
        let mut state = self.lock();
        state.epoch += 1;
        let epoch = state.epoch;

        for key in keys {
            if let Some((evicted, last)) = state.last_invalidated.push(key.clone(), epoch) {
                if evicted != *key {
                    state.floor = state.floor.max(last);
                }
            }
        }
    }

    /// Returns true if `key` has not been invalidated since `ticket`.
    pub fn allows(&self, key: &str, ticket: FenceTicket) -> bool {
        let state = self.lock();
        let last = state
            .last_invalidated
            .peek(key)
            .copied()
            .unwrap_or(state.floor);
        last <= ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence(max_keys: usize) -> InvalidationFence {
        InvalidationFence::new(NonZeroUsize::new(max_keys).unwrap())
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_fresh_fence_allows_populate() {
        let fence = fence(8);
        let ticket = fence.ticket();
        assert!(fence.allows("users:1", ticket));
    }

    #[test]
    fn test_invalidation_after_ticket_blocks_populate() {
        let fence = fence(8);
        let ticket = fence.ticket();

        fence.advance(&keys(&["users:1", "users:all"]));

        assert!(!fence.allows("users:1", ticket));
        assert!(!fence.allows("users:all", ticket));
    }

    #[test]
    fn test_invalidation_before_ticket_allows_populate() {
        let fence = fence(8);
        fence.advance(&keys(&["users:1"]));

        let ticket = fence.ticket();

        assert!(fence.allows("users:1", ticket));
    }

    #[test]
    fn test_other_keys_unaffected() {
        let fence = fence(8);
        let ticket = fence.ticket();

        fence.advance(&keys(&["users:1"]));

        assert!(fence.allows("users:2", ticket));
        assert!(fence.allows("accounts:1", ticket));
    }

    #[test]
    fn test_evicted_keys_fall_back_to_floor() {
        let fence = fence(1);
        let ticket = fence.ticket();

        fence.advance(&keys(&["users:1"]));
        fence.advance(&keys(&["users:2"]));

        // users:1 was evicted; its invalidation must still block old tickets.
        assert!(!fence.allows("users:1", ticket));
        // A never-seen key is also conservatively blocked for old tickets.
        assert!(!fence.allows("users:3", ticket));

        let fresh = fence.ticket();
        assert!(fence.allows("users:1", fresh));
        assert!(fence.allows("users:3", fresh));
    }

    #[test]
    fn test_reinvalidating_a_key_does_not_raise_floor() {
        let fence = fence(2);
        fence.advance(&keys(&["users:1"]));
        let ticket = fence.ticket();

        fence.advance(&keys(&["users:1"]));

        assert!(fence.allows("users:2", ticket));
        assert!(!fence.allows("users:1", ticket));
    }
}
