//! Time-bound cache of custom-domain decisions.
//!
//! Keyed by hostname. Positive and negative decisions are cached the same
//! way so that repeated requests for an unregistered hostname cost at most
//! one store query per TTL window.
//!
//! Entries are never refreshed by the domain-management surface on their
//! own; a status change becomes visible after at most one TTL unless the
//! caller invalidates the hostname explicitly.

use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Longest TTL the cache honours.
pub const MAX_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Source of the current instant.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used by tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    allowed: bool,
    expires_at: Instant,
}

/// Concurrent hostname -> decision cache with lazy expiry.
///
/// With a zero TTL every entry expires the instant it is written, so every
/// read misses while the bookkeeping still runs. A `capacity` of zero leaves
/// the cache unbounded; otherwise adding a hostname to a full cache purges
/// expired entries and then evicts the oldest-written one.
pub struct DomainCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for DomainCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl DomainCache {
    /// Creates a cache driven by the system clock.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self::with_clock(ttl, capacity, Arc::new(SystemClock))
    }

    /// Creates a cache driven by the given clock.
    pub fn with_clock(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: ttl.min(MAX_TTL),
            capacity,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached decision for `hostname` if it has not expired.
    ///
    /// An expired entry is evicted on the way out.
    pub fn read(&self, hostname: &str) -> Option<bool> {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(hostname) {
            if now < entry.expires_at {
                return Some(entry.allowed);
            }
        }

        // Re-check under the shard lock: a concurrent write may have
        // refreshed the entry since the read above.
        self.entries
            .remove_if(hostname, |_, entry| now >= entry.expires_at);
        None
    }

    /// Stores a decision for `hostname`, replacing any previous one.
    pub fn write(&self, hostname: &str, allowed: bool) {
        let now = self.clock.now();

        if self.capacity > 0
            && self.entries.len() >= self.capacity
            && !self.entries.contains_key(hostname)
        {
            self.make_room(now);
        }

        self.entries.insert(
            hostname.to_string(),
            CacheEntry {
                allowed,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Drops the decision for `hostname`. Returns `true` if one was cached.
    pub fn invalidate(&self, hostname: &str) -> bool {
        self.entries.remove(hostname).is_some()
    }

    /// Drops every cached decision.
    pub fn clear(&self) {
        self.entries.clear();
    }

    fn make_room(&self, now: Instant) {
        self.entries.retain(|_, entry| now < entry.expires_at);
        if self.entries.len() < self.capacity {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());

        if let Some(hostname) = oldest {
            self.entries.remove(&hostname);
            tracing::debug!(hostname = %hostname, "Evicted custom domain cache entry at capacity");
        }
    }
}
