//! Pending request tracking.
//!
//! Maps a request identity to its cancellation handle so a duplicate
//! in-flight request can be aborted when a newer one arrives under the same
//! identity. The tracker is an explicitly constructed component owned by the
//! client, never a module-level singleton, so tests construct isolated
//! instances.
//!
//! Invariant: at most one live entry per identity string. `track` enforces
//! it by cancelling whatever entry it replaces; completion uses an id guard
//! so a superseded request can never evict its successor's entry.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
struct PendingEntry {
    id: u64,
    token: CancellationToken,
}

/// Handle returned by [`PendingRequests::track`] for one registration.
///
/// Carries the cancellation token the dispatch path races against, plus the
/// registration id used to guard completion.
#[derive(Debug, Clone)]
pub struct Registration {
    id: u64,
    token: CancellationToken,
}

impl Registration {
    /// The cancellation token for this registration.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// True once this registration has been cancelled, either by a
    /// superseding duplicate or an explicit release.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Tracker for dispatched, not-yet-completed requests.
///
/// Shared mutable state scoped to the client's lifetime; not persisted.
#[derive(Debug, Default)]
pub struct PendingRequests {
    entries: DashMap<String, PendingEntry>,
    next_id: AtomicU64,
}

impl PendingRequests {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a request under `key`, cancelling and discarding any
    /// existing entry for the same identity first.
    ///
    /// The returned registration's token is freshly created here; the
    /// superseded request observes its own token cancelled before the new
    /// request's network phase begins.
    pub fn track(&self, key: &str) -> Registration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = self.entries.insert(
            key.to_string(),
            PendingEntry {
                id,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            debug!(key, "cancelling superseded in-flight request");
            previous.token.cancel();
        }
        Registration { id, token }
    }

    /// Cancels and removes the entry for `key`, if any. No-op otherwise.
    pub fn release(&self, key: &str) {
        if let Some((_, entry)) = self.entries.remove(key) {
            entry.token.cancel();
        }
    }

    /// Cancels and clears every tracked entry. Used for global teardown,
    /// e.g. navigating away from a screen.
    pub fn release_all(&self) {
        self.entries.retain(|_, entry| {
            entry.token.cancel();
            false
        });
    }

    /// Releases the entry for `key` only if it still belongs to
    /// `registration`.
    ///
    /// Called on every completion path. The id guard keeps a request that
    /// was superseded (and therefore no longer owns the entry) from
    /// cancelling its successor.
    pub(crate) fn complete(&self, key: &str, registration: &Registration) {
        if let Some((_, entry)) = self
            .entries
            .remove_if(key, |_, entry| entry.id == registration.id)
        {
            entry.token.cancel();
        }
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
