use crate::error::PaginationError;
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

///
/// RankingCache
///
/// Time-boxed store for packed rankings. Values are opaque cursor tokens.
/// There is no single-flight guard: concurrent misses may each recompute
/// and store, and the last store wins.
///

pub trait RankingCache {
    /// Load a live value, or `None` when absent or expired.
    fn load(&self, key: &str) -> Result<Option<String>, PaginationError>;

    /// Store `value` for `ttl`.
    fn store(&self, key: &str, value: String, ttl: Duration) -> Result<(), PaginationError>;
}

impl<R: RankingCache + ?Sized> RankingCache for &R {
    fn load(&self, key: &str) -> Result<Option<String>, PaginationError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: String, ttl: Duration) -> Result<(), PaginationError> {
        (**self).store(key, value, ttl)
    }
}

///
/// MemoryRankingCache
///
/// In-process `RankingCache`. Expired entries are dropped on read.
///

#[derive(Debug, Default)]
pub struct MemoryRankingCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

#[derive(Debug)]
struct CacheEntry {
    value: String,
    // `None` when the ttl overflows the clock; such entries never expire.
    expires_at: Option<Instant>,
}

impl MemoryRankingCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop one entry, forcing the next first page to recompute.
    pub fn invalidate(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RankingCache for MemoryRankingCache {
    fn load(&self, key: &str) -> Result<Option<String>, PaginationError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.expires_at.is_none_or(|at| at > Instant::now()) => {
                Ok(Some(entry.value.clone()))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn store(&self, key: &str, value: String, ttl: Duration) -> Result<(), PaginationError> {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), CacheEntry { value, expires_at });

        Ok(())
    }
}
