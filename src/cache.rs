//! Memoizing cache for storage reads.
//!
//! [`Memo`] caches successful results per key with an optional time-to-live.
//! [`CachedSeriesStore`] applies it to every read of a [`SeriesStore`]. Cached
//! values are handed out as clones, so a consumer can never mutate what the
//! next reader sees.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use crate::config::CacheConfig;
use crate::matches::Match;
use crate::participant::ExternalParticipant;
use crate::storage::{
    EventMap, EventRecord, MatchRef, ParticipantRecord, SeriesDetail, SeriesId, SeriesRecord,
    SeriesStore, StorageError, TournamentRecord,
};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned cache lock: {context}"))
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Option<DateTime<Utc>>,
}

impl<V> Entry<V> {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Thread-safe memo table with per-insert expiry.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Memo<K, V> {
    /// Create an empty memo table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key` if it is still fresh, otherwise
    /// computes it with `fetch` and caches it for `ttl` (`None` = forever).
    ///
    /// Errors from `fetch` are returned as-is and never cached. The lock is
    /// not held while `fetch` runs.
    pub fn get_or_try_insert_with<F>(&self, key: &K, ttl: Option<Duration>, fetch: F) -> Result<V, StorageError>
    where
        F: FnOnce() -> Result<V, StorageError>,
    {
        if let Some(value) = self.lookup(key)? {
            return Ok(value);
        }
        let value = fetch()?;
        self.store(key, ttl, value.clone())?;
        Ok(value)
    }

    /// Like [`Memo::get_or_try_insert_with`] for lookups that may find
    /// nothing. A `None` from `fetch` is passed through and not cached.
    pub fn get_or_try_insert_some_with<F>(
        &self,
        key: &K,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<Option<V>, StorageError>
    where
        F: FnOnce() -> Result<Option<V>, StorageError>,
    {
        if let Some(value) = self.lookup(key)? {
            return Ok(Some(value));
        }
        let Some(value) = fetch()? else {
            return Ok(None);
        };
        self.store(key, ttl, value.clone())?;
        Ok(Some(value))
    }

    fn lookup(&self, key: &K) -> Result<Option<V>, StorageError> {
        let entries = self.entries.read().map_err(|_| lock_err("memo.get"))?;
        if let Some(entry) = entries.get(key) {
            if entry.is_fresh(Utc::now()) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(entry.value.clone()));
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    fn store(&self, key: &K, ttl: Option<Duration>, value: V) -> Result<(), StorageError> {
        let expires_at = match ttl {
            None => None,
            // An unrepresentable expiry is as good as none.
            Some(ttl) => Utc::now().checked_add_signed(ttl),
        };
        let mut entries = self.entries.write().map_err(|_| lock_err("memo.insert"))?;
        entries.insert(key.clone(), Entry { value, expires_at });
        Ok(())
    }

    /// Drop the entry for `key`, if any.
    pub fn invalidate(&self, key: &K) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| lock_err("memo.invalidate"))?;
        entries.remove(key);
        Ok(())
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| lock_err("memo.clear"))?;
        entries.clear();
        Ok(())
    }

    /// Number of entries, fresh or stale.
    pub fn len(&self) -> Result<usize, StorageError> {
        let entries = self.entries.read().map_err(|_| lock_err("memo.len"))?;
        Ok(entries.len())
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Lookups served from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that went to `fetch`.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// A [`SeriesStore`] wrapper that memoizes every read.
///
/// Per-series reads use `CacheConfig::series_ttl`; whole-listing reads use
/// `CacheConfig::events_ttl`.
#[derive(Debug)]
pub struct CachedSeriesStore<S> {
    inner: S,
    config: CacheConfig,
    series: Memo<SeriesId, SeriesDetail>,
    participants: Memo<SeriesId, Vec<ExternalParticipant>>,
    matches: Memo<SeriesId, Vec<Match>>,
    events: Memo<(), Vec<EventRecord>>,
    tournaments: Memo<(), Vec<TournamentRecord>>,
    all_series: Memo<(), Vec<SeriesRecord>>,
    all_participants: Memo<(), Vec<ParticipantRecord>>,
    match_refs: Memo<(), Vec<MatchRef>>,
    event_maps: Memo<(), Vec<EventMap>>,
}

impl<S: SeriesStore> CachedSeriesStore<S> {
    /// Wrap `inner` with the given cache lifetimes.
    #[must_use]
    pub fn new(inner: S, config: CacheConfig) -> Self {
        Self {
            inner,
            config,
            series: Memo::new(),
            participants: Memo::new(),
            matches: Memo::new(),
            events: Memo::new(),
            tournaments: Memo::new(),
            all_series: Memo::new(),
            all_participants: Memo::new(),
            match_refs: Memo::new(),
            event_maps: Memo::new(),
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Forget everything cached for one series.
    pub fn invalidate_series(&self, id: &SeriesId) -> Result<(), StorageError> {
        self.series.invalidate(id)?;
        self.participants.invalidate(id)?;
        self.matches.invalidate(id)?;
        log::debug!("invalidated cache for series {id}");
        Ok(())
    }

    /// Forget everything.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.series.clear()?;
        self.participants.clear()?;
        self.matches.clear()?;
        self.events.clear()?;
        self.tournaments.clear()?;
        self.all_series.clear()?;
        self.all_participants.clear()?;
        self.match_refs.clear()?;
        self.event_maps.clear()
    }

    /// Total (hits, misses) across all reads.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        let hits = self.series.hits()
            + self.participants.hits()
            + self.matches.hits()
            + self.events.hits()
            + self.tournaments.hits()
            + self.all_series.hits()
            + self.all_participants.hits()
            + self.match_refs.hits()
            + self.event_maps.hits();
        let misses = self.series.misses()
            + self.participants.misses()
            + self.matches.misses()
            + self.events.misses()
            + self.tournaments.misses()
            + self.all_series.misses()
            + self.all_participants.misses()
            + self.match_refs.misses()
            + self.event_maps.misses();
        (hits, misses)
    }
}

impl<S: SeriesStore> SeriesStore for CachedSeriesStore<S> {
    fn series(&self, id: &SeriesId) -> Result<Option<SeriesDetail>, StorageError> {
        self.series
            .get_or_try_insert_some_with(id, self.config.series_ttl(), || self.inner.series(id))
    }

    fn participants(&self, id: &SeriesId) -> Result<Vec<ExternalParticipant>, StorageError> {
        self.participants
            .get_or_try_insert_with(id, self.config.series_ttl(), || self.inner.participants(id))
    }

    fn matches(&self, id: &SeriesId) -> Result<Vec<Match>, StorageError> {
        self.matches
            .get_or_try_insert_with(id, self.config.series_ttl(), || self.inner.matches(id))
    }

    fn events(&self) -> Result<Vec<EventRecord>, StorageError> {
        self.events
            .get_or_try_insert_with(&(), self.config.events_ttl(), || self.inner.events())
    }

    fn tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError> {
        self.tournaments
            .get_or_try_insert_with(&(), self.config.events_ttl(), || self.inner.tournaments())
    }

    fn all_series(&self) -> Result<Vec<SeriesRecord>, StorageError> {
        self.all_series
            .get_or_try_insert_with(&(), self.config.events_ttl(), || self.inner.all_series())
    }

    fn all_participants(&self) -> Result<Vec<ParticipantRecord>, StorageError> {
        self.all_participants
            .get_or_try_insert_with(&(), self.config.events_ttl(), || self.inner.all_participants())
    }

    fn match_refs(&self) -> Result<Vec<MatchRef>, StorageError> {
        self.match_refs
            .get_or_try_insert_with(&(), self.config.events_ttl(), || self.inner.match_refs())
    }

    fn event_maps(&self) -> Result<Vec<EventMap>, StorageError> {
        self.event_maps
            .get_or_try_insert_with(&(), self.config.events_ttl(), || self.inner.event_maps())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::storage::InMemorySeriesStore;

    #[test]
    fn memo_without_ttl_fetches_once() {
        let memo: Memo<&str, u32> = Memo::new();
        let calls = Cell::new(0);
        let fetch = || {
            calls.set(calls.get() + 1);
            Ok(7)
        };

        assert_eq!(memo.get_or_try_insert_with(&"k", None, fetch).unwrap(), 7);
        assert_eq!(memo.get_or_try_insert_with(&"k", None, fetch).unwrap(), 7);
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.hits(), 1);
        assert_eq!(memo.misses(), 1);
    }

    #[test]
    fn memo_zero_ttl_always_refetches() {
        let memo: Memo<&str, u32> = Memo::new();
        let calls = Cell::new(0);
        for _ in 0..3 {
            memo.get_or_try_insert_with(&"k", Some(Duration::zero()), || {
                calls.set(calls.get() + 1);
                Ok(calls.get())
            })
            .unwrap();
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(memo.len().unwrap(), 1);
    }

    #[test]
    fn memo_does_not_cache_errors() {
        let memo: Memo<&str, u32> = Memo::new();
        let err = memo
            .get_or_try_insert_with(&"k", None, || Err(StorageError::ConnectionError("down".to_string())))
            .unwrap_err();
        assert_eq!(err, StorageError::ConnectionError("down".to_string()));
        assert!(memo.is_empty().unwrap());

        assert_eq!(memo.get_or_try_insert_with(&"k", None, || Ok(1)).unwrap(), 1);
    }

    #[test]
    fn memo_invalidate_forces_refetch() {
        let memo: Memo<&str, u32> = Memo::new();
        memo.get_or_try_insert_with(&"k", None, || Ok(1)).unwrap();
        memo.invalidate(&"k").unwrap();
        assert_eq!(memo.get_or_try_insert_with(&"k", None, || Ok(2)).unwrap(), 2);
    }

    #[test]
    fn cached_store_serves_stale_until_invalidated() {
        let store = CachedSeriesStore::new(InMemorySeriesStore::new(), CacheConfig::default());
        let id = SeriesId::new("s1");
        assert!(store.participants(&id).unwrap().is_empty());

        store
            .inner()
            .insert_participant(id.clone(), ExternalParticipant::new("X", 1, true))
            .unwrap();
        assert!(store.participants(&id).unwrap().is_empty());

        store.invalidate_series(&id).unwrap();
        assert_eq!(store.participants(&id).unwrap().len(), 1);
        assert_eq!(store.stats(), (1, 2));
    }

    #[test]
    fn memo_does_not_cache_absent_values() {
        let memo: Memo<&str, u32> = Memo::new();
        assert_eq!(memo.get_or_try_insert_some_with(&"k", None, || Ok(None)).unwrap(), None);
        assert!(memo.is_empty().unwrap());

        assert_eq!(memo.get_or_try_insert_some_with(&"k", None, || Ok(Some(4))).unwrap(), Some(4));
        assert_eq!(memo.get_or_try_insert_some_with(&"k", None, || Ok(Some(5))).unwrap(), Some(4));
        assert_eq!((memo.hits(), memo.misses()), (1, 2));
    }

    #[test]
    fn missing_series_is_found_once_inserted() {
        let store = CachedSeriesStore::new(InMemorySeriesStore::new(), CacheConfig::default());
        let id = SeriesId::new("s1");
        assert!(store.series(&id).unwrap().is_none());

        let inner = store.inner();
        inner
            .insert_event(EventRecord { id: "e".to_string(), name: "E".to_string() })
            .unwrap();
        inner
            .insert_tournament(TournamentRecord {
                id: "t".to_string(),
                event_id: "e".to_string(),
                name: "T".to_string(),
            })
            .unwrap();
        inner
            .insert_series(SeriesRecord {
                id: id.clone(),
                name: "S".to_string(),
                played: None,
                tournament_id: "t".to_string(),
            })
            .unwrap();

        let detail = store.series(&id).unwrap().unwrap();
        assert_eq!(detail.series.name, "S");
        assert_eq!(detail.event_name, "E");
        // The found row is cached from here on.
        assert!(store.series(&id).unwrap().is_some());
        assert_eq!(store.stats(), (1, 2));
    }

    #[test]
    fn cached_store_clear_resets_listings() {
        let store = CachedSeriesStore::new(InMemorySeriesStore::new(), CacheConfig::default());
        assert!(store.events().unwrap().is_empty());
        store
            .inner()
            .insert_event(EventRecord { id: "e".to_string(), name: "E".to_string() })
            .unwrap();
        assert!(store.events().unwrap().is_empty());
        store.clear().unwrap();
        assert_eq!(store.events().unwrap().len(), 1);
    }
}
