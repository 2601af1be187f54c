//! Client-side query cache with explicit invalidation.
//!
//! Each [`QueryKey`] owns a slot. A slot moves through
//! absent → in-flight → fresh → stale → in-flight ... as reads and
//! invalidations arrive. Reads of the same key are serialized so at most one
//! fetch per key is outstanding; other keys are unaffected.
//!
//! Invalidation never waits for an in-flight fetch. It bumps the slot's
//! generation, and a fetch that started under an older generation stores its
//! result as already stale.

use dashmap::DashMap;
use std::any::Any;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use ucat_core::QueryKey;
use ucat_core::config::CacheConfig;

/// Observable state of a cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryState {
    Absent,
    Fresh,
    Stale,
    InFlight,
}

type CachedValue = Arc<dyn Any + Send + Sync>;

struct Entry {
    value: CachedValue,
    /// Slot generation when the fetch that produced this value started.
    generation: u64,
    fetched_at: Instant,
}

#[derive(Default)]
struct Slot {
    generation: AtomicU64,
    in_flight: AtomicBool,
    fetch_lock: tokio::sync::Mutex<()>,
    entry: Mutex<Option<Entry>>,
}

impl Slot {
    fn entry(&self) -> MutexGuard<'_, Option<Entry>> {
        // Entry writes are single assignments, so a poisoned lock still holds
        // a consistent value.
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &Entry, stale_after: Option<Duration>) -> bool {
        entry.generation == self.generation.load(Ordering::Acquire)
            && stale_after.is_none_or(|max_age| entry.fetched_at.elapsed() < max_age)
    }

    fn fresh<T: Clone + 'static>(&self, stale_after: Option<Duration>) -> Option<T> {
        let guard = self.entry();
        let entry = guard.as_ref()?;
        if !self.is_fresh(entry, stale_after) {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    fn state(&self, stale_after: Option<Duration>) -> EntryState {
        if self.in_flight.load(Ordering::Acquire) {
            return EntryState::InFlight;
        }
        match self.entry().as_ref() {
            None => EntryState::Absent,
            Some(entry) if self.is_fresh(entry, stale_after) => EntryState::Fresh,
            Some(_) => EntryState::Stale,
        }
    }
}

/// Clears the in-flight flag when a fetch finishes or its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Keyed store of read results with staleness tracking.
pub struct QueryCache {
    slots: DashMap<QueryKey, Arc<Slot>>,
    stale_after: Option<Duration>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl QueryCache {
    /// Create a cache. With `stale_after` unset, entries stay fresh until
    /// invalidated.
    pub fn new(stale_after: Option<Duration>) -> Self {
        Self {
            slots: DashMap::new(),
            stale_after,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.stale_after())
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot> {
        self.slots.entry(key.clone()).or_default().value().clone()
    }

    /// Return the cached value for `key` if fresh, otherwise run `fetch` and
    /// cache its result.
    ///
    /// A failed fetch leaves the key absent and returns the error unchanged.
    pub async fn read<T, E, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(key);
        if let Some(value) = slot.fresh::<T>(self.stale_after) {
            tracing::trace!(key = %key, "query cache hit");
            return Ok(value);
        }

        let fetch_guard = slot.fetch_lock.lock().await;
        // Another reader may have filled the slot while we waited.
        if let Some(value) = slot.fresh::<T>(self.stale_after) {
            tracing::trace!(key = %key, "query cache hit after waiting for fetch");
            return Ok(value);
        }

        let generation = slot.generation.load(Ordering::Acquire);
        let in_flight = InFlight::start(&slot.in_flight);
        tracing::debug!(key = %key, "query cache miss, fetching");

        match fetch().await {
            Ok(value) => {
                *slot.entry() = Some(Entry {
                    value: Arc::new(value.clone()),
                    generation,
                    fetched_at: Instant::now(),
                });
                Ok(value)
            }
            Err(err) => {
                *slot.entry() = None;
                drop(in_flight);
                drop(fetch_guard);
                self.release(key, &slot);
                tracing::debug!(key = %key, "query fetch failed, entry dropped");
                Err(err)
            }
        }
    }

    /// Remove `key`'s slot if it holds no value and no other reader holds it.
    ///
    /// `slot()` clones under the shard lock, so the count seen here cannot
    /// race with a reader picking the slot up.
    fn release(&self, key: &QueryKey, slot: &Arc<Slot>) {
        self.slots.remove_if(key, |_, held| {
            Arc::ptr_eq(held, slot) && Arc::strong_count(held) == 2 && held.entry().is_none()
        });
    }

    /// Mark `key` stale so the next read refetches. No-op for unknown keys.
    pub fn invalidate(&self, key: &QueryKey) {
        match self.slots.get(key) {
            Some(slot) => {
                slot.generation.fetch_add(1, Ordering::AcqRel);
                tracing::debug!(key = %key, "query invalidated");
            }
            None => tracing::trace!(key = %key, "invalidate on absent query"),
        }
    }

    /// Current state of `key`.
    pub fn state(&self, key: &QueryKey) -> EntryState {
        self.slots
            .get(key)
            .map_or(EntryState::Absent, |slot| slot.state(self.stale_after))
    }

    /// Cached value for `key`, fresh or stale, without fetching.
    pub fn peek<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let slot = self.slots.get(key)?;
        let guard = slot.entry();
        guard.as_ref()?.value.downcast_ref::<T>().cloned()
    }

    /// Drop every entry.
    ///
    /// Slots with a fetch in flight stay in place with their generation
    /// bumped, so that fetch stores a stale result and later readers of the
    /// key still queue behind it instead of starting a parallel request.
    pub fn clear(&self) {
        self.slots.retain(|_, slot| {
            slot.generation.fetch_add(1, Ordering::AcqRel);
            *slot.entry() = None;
            Arc::strong_count(slot) > 1
        });
        tracing::debug!("query cache cleared");
    }
}
