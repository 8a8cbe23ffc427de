//! Defines [`Cache`], a time-bounded in-memory store keyed by resource key,
//! and the [`Clock`] it reads timestamps from.
//!
//! An entry older than the TTL passed to [`Cache::get`] is treated as absent
//! but is not removed; the next [`Cache::put`] for the same key replaces it.
//! Nothing is ever evicted, so the cache grows with the number of distinct
//! keys.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// The default time-to-live for cached payloads (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Entry<T> {
    payload: T,
    fetched_at: DateTime<Utc>,
}

/// One entry per key, each stamped with the time it was stored.
pub struct Cache<T, C = SystemClock> {
    entries: HashMap<String, Entry<T>>,
    clock: C,
}

impl<T: Clone> Cache<T, SystemClock> {
    pub fn new() -> Self {
        Cache::with_clock(SystemClock)
    }
}

impl<T: Clone> Default for Cache<T, SystemClock> {
    fn default() -> Self {
        Cache::new()
    }
}

impl<T: Clone, C: Clock> Cache<T, C> {
    pub fn with_clock(clock: C) -> Self {
        Cache {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Returns a copy of the payload stored under `key` if it was stored less
    /// than `ttl` ago.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<T> {
        let entry = self.entries.get(key)?;
        match is_fresh(entry.fetched_at, self.clock.now(), ttl) {
            true => Some(entry.payload.clone()),
            false => None,
        }
    }

    /// Stores `payload` under `key` stamped with the current time, replacing
    /// whatever was there.
    pub fn put<K: Into<String>>(&mut self, key: K, payload: T) {
        self.entries.insert(
            key.into(),
            Entry {
                payload,
                fetched_at: self.clock.now(),
            },
        );
    }

    /// Drops the entry for `key`. Returns whether there was one.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// The number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match (now - fetched_at).to_std() {
        Ok(age) => age < ttl,
        // `now` is earlier than the stamp (the clock stepped backwards).
        Err(_) => ttl > Duration::default(),
    }
}
