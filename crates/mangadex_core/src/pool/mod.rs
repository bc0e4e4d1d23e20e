//! Identity cache for canonical domain objects.
//!
//! # Responsibility
//! - Resolve transfer records to one canonical object per `(kind, id)`.
//! - Keep recently built objects alive for a bounded time.
//! - Register symmetric relation edges between objects seen together.
//!
//! # Invariants
//! - A warm key always resolves to the same allocation.
//! - Creation is single-flight per key: at most one object is built even
//!   when several callers resolve the same cold key concurrently.
//! - The owning tier uses absolute expiry; hits never extend an entry.
//! - Expired owning-tier entries are swept at most once per scan interval,
//!   driven by `resolve`, so keys never seen again still get released.
//! - Lock order is owning tier, then live tier. Factories never re-enter
//!   the pool, so creation may run under the owning tier's shard lock.
//!
//! # See also
//! - `crate::factory` for create/merge rules.
//! - `crate::model::graph` for the edge sets.

mod ingest;

use crate::clock::{Clock, SystemClock};
use crate::config::PoolConfig;
use crate::decode::{ApiError, DecodeError, DocumentError, TransferRecord};
use crate::factory::{ArgumentError, FactoryRegistry, ResourceFactory};
use crate::model::kind::ResourceKey;
use crate::model::resource::{DomainResource, Resource, WeakResource};
use crate::registry::{validate_registry, RegistrationError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info, trace};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub use ingest::{CollectionOutcome, FragmentFailure};

/// Pool operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    Decode(DecodeError),
    Api(ApiError),
    Argument(ArgumentError),
    Registration(RegistrationError),
    /// A bare relation stub named a key that is not cached.
    Miss(ResourceKey),
}

impl PoolError {
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss(_))
    }
}

impl Display for PoolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "decode failed: {err}"),
            Self::Api(err) => write!(f, "{err}"),
            Self::Argument(err) => write!(f, "factory rejected record: {err}"),
            Self::Registration(err) => write!(f, "registry error: {err}"),
            Self::Miss(key) => write!(f, "{key} is not cached and the record has no attributes"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Api(err) => Some(err),
            Self::Argument(err) => Some(err),
            Self::Registration(err) => Some(err),
            Self::Miss(_) => None,
        }
    }
}

impl From<DecodeError> for PoolError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<ApiError> for PoolError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<DocumentError> for PoolError {
    fn from(value: DocumentError) -> Self {
        match value {
            DocumentError::Decode(err) => Self::Decode(err),
            DocumentError::Api(err) => Self::Api(err),
        }
    }
}

impl From<ArgumentError> for PoolError {
    fn from(value: ArgumentError) -> Self {
        Self::Argument(value)
    }
}

impl From<RegistrationError> for PoolError {
    fn from(value: RegistrationError) -> Self {
        Self::Registration(value)
    }
}

pub type PoolResult<T> = Result<T, PoolError>;

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub live_hits: u64,
    pub cache_hits: u64,
    pub created: u64,
    pub merged: u64,
    pub misses: u64,
    pub evicted: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    live_hits: AtomicU64,
    cache_hits: AtomicU64,
    created: AtomicU64,
    merged: AtomicU64,
    misses: AtomicU64,
    evicted: AtomicU64,
}

impl PoolCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PoolStats {
        PoolStats {
            live_hits: self.live_hits.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            merged: self.merged.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug)]
struct OwnedEntry {
    resource: Resource,
    expires_at_ms: u64,
}

impl OwnedEntry {
    fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms <= now_ms
    }
}

/// Process-wide identity cache.
///
/// Two tiers back every key: a live table of `Weak` handles that finds
/// objects still held by callers, and an owning table of `Arc` handles that
/// keeps objects alive until their TTL elapses.
pub struct ResourcePool {
    live: DashMap<ResourceKey, WeakResource>,
    owned: DashMap<ResourceKey, OwnedEntry>,
    config: PoolConfig,
    ttl_ms: u64,
    scan_interval_ms: u64,
    last_sweep_ms: AtomicU64,
    clock: Arc<dyn Clock>,
    counters: PoolCounters,
}

impl std::fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePool")
            .field("config", &self.config)
            .field("live", &self.live.len())
            .field("owned", &self.owned.len())
            .finish()
    }
}

impl ResourcePool {
    /// Builds a pool on the system clock.
    ///
    /// # Errors
    /// - `Registration` when the relation tables are inconsistent.
    pub fn new(config: PoolConfig) -> PoolResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Builds a pool on an injected clock.
    pub fn with_clock(config: PoolConfig, clock: Arc<dyn Clock>) -> PoolResult<Self> {
        validate_registry()?;
        let ttl_ms = config.effective_ttl_ms();
        let scan_interval_ms = config.scan_interval_ms();
        info!(
            "event=pool_init module=pool status=ok caching_enabled={} ttl_ms={} scan_interval_ms={}",
            config.caching_enabled, ttl_ms, scan_interval_ms
        );
        Ok(Self {
            live: DashMap::new(),
            owned: DashMap::new(),
            config,
            ttl_ms,
            scan_interval_ms,
            last_sweep_ms: AtomicU64::new(clock.now_ms()),
            clock,
            counters: PoolCounters::default(),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Lifetime applied to new owning-tier entries.
    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Resolves `record` to its canonical object.
    ///
    /// Looks the key up in the live tier, then the owning tier, and builds
    /// the object only when both miss. The record is then merged into the
    /// object and every relation stub is resolved the same way; each
    /// resolved stub is linked to the object in both directions.
    ///
    /// # Errors
    /// - `Miss` when the key is cold and the record has no attributes.
    /// - `Argument` when a factory rejects the record.
    ///
    /// A `Miss` on a nested stub is not an error; the stub id stays recorded
    /// in the owner's relation-id sets.
    pub fn resolve(&self, record: &TransferRecord) -> PoolResult<Resource> {
        self.sweep_if_due();
        let factory = FactoryRegistry::get(record.kind);
        let key = record.key();

        let resource = match self.warm(&key) {
            Some(resource) => resource,
            None => self.create_single_flight(record, factory)?,
        };

        factory.merge(&resource, record)?;
        PoolCounters::bump(&self.counters.merged);
        trace!(
            "event=resource_merge module=pool status=ok kind={} relations={}",
            key.kind,
            record.relations.len()
        );

        for child in record.relations.iter().chain(record.embedded.iter()) {
            match self.resolve(child) {
                Ok(related) => self.link(&resource, &related),
                Err(PoolError::Miss(_)) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(resource)
    }

    /// Warm-path lookup without creation.
    pub fn lookup_resource(&self, key: &ResourceKey) -> Option<Resource> {
        let found = self.warm(key);
        if found.is_none() {
            PoolCounters::bump(&self.counters.misses);
        }
        found
    }

    /// Typed warm-path lookup.
    pub fn lookup<T: DomainResource>(&self, id: Uuid) -> Option<Arc<T>> {
        self.lookup_resource(&ResourceKey::new(T::KIND, id))
            .and_then(|resource| T::from_resource(&resource))
    }

    /// Whether `key` is currently reachable on the warm path.
    pub fn contains(&self, key: &ResourceKey) -> bool {
        let now_ms = self.clock.now_ms();
        self.live_upgrade(key).is_some()
            || self
                .owned
                .get(key)
                .is_some_and(|entry| !entry.is_expired(now_ms))
    }

    /// Registers a symmetric edge between two objects.
    pub fn link(&self, left: &Resource, right: &Resource) {
        if left.key() == right.key() {
            return;
        }
        left.relations().register(right);
        right.relations().register(left);
    }

    /// Drops expired owning-tier entries and dead live-tier handles.
    ///
    /// Returns the number of owning-tier entries removed.
    pub fn purge_expired(&self) -> usize {
        let now_ms = self.clock.now_ms();
        self.last_sweep_ms.store(now_ms, Ordering::Relaxed);
        let before_owned = self.owned.len();
        self.owned.retain(|_, entry| !entry.is_expired(now_ms));
        let removed = before_owned.saturating_sub(self.owned.len());

        let before_live = self.live.len();
        self.live.retain(|_, handle| handle.is_alive());
        let pruned = before_live.saturating_sub(self.live.len());

        self.counters
            .evicted
            .fetch_add(removed as u64, Ordering::Relaxed);
        debug!(
            "event=pool_purge module=pool status=ok evicted={} live_pruned={} owned_remaining={}",
            removed,
            pruned,
            self.owned.len()
        );
        removed
    }

    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    /// Number of live-tier handles whose object is still alive.
    pub fn len_live(&self) -> usize {
        self.live.iter().filter(|entry| entry.value().is_alive()).count()
    }

    /// Number of owning-tier entries, including expired ones not yet swept.
    pub fn len_owned(&self) -> usize {
        self.owned.len()
    }

    /// Steps 1 and 2 of resolution: live tier, then owning tier.
    fn warm(&self, key: &ResourceKey) -> Option<Resource> {
        let now_ms = self.clock.now_ms();
        self.expire_key(key, now_ms);

        if let Some(resource) = self.live_upgrade(key) {
            PoolCounters::bump(&self.counters.live_hits);
            return Some(resource);
        }

        let cached = self
            .owned
            .get(key)
            .filter(|entry| !entry.is_expired(now_ms))
            .map(|entry| entry.resource.clone())?;
        self.live.insert(*key, cached.downgrade());
        PoolCounters::bump(&self.counters.cache_hits);
        Some(cached)
    }

    /// Runs `purge_expired` once the scan interval has elapsed. Only the
    /// caller that claims the interval sweeps.
    fn sweep_if_due(&self) {
        let now_ms = self.clock.now_ms();
        let last_ms = self.last_sweep_ms.load(Ordering::Relaxed);
        if now_ms.saturating_sub(last_ms) < self.scan_interval_ms {
            return;
        }
        if self
            .last_sweep_ms
            .compare_exchange(last_ms, now_ms, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.purge_expired();
        }
    }

    fn live_upgrade(&self, key: &ResourceKey) -> Option<Resource> {
        let upgraded = self.live.get(key).and_then(|handle| handle.upgrade());
        if upgraded.is_none() {
            self.live.remove_if(key, |_, handle| !handle.is_alive());
        }
        upgraded
    }

    fn expire_key(&self, key: &ResourceKey, now_ms: u64) {
        if self
            .owned
            .remove_if(key, |_, entry| entry.is_expired(now_ms))
            .is_some()
        {
            PoolCounters::bump(&self.counters.evicted);
            debug!(
                "event=resource_evict module=pool status=ok kind={} reason=ttl",
                key.kind
            );
        }
    }

    /// Step 3 of resolution, run under the owning tier's entry lock.
    fn create_single_flight(
        &self,
        record: &TransferRecord,
        factory: &dyn ResourceFactory,
    ) -> PoolResult<Resource> {
        let key = record.key();
        if !record.has_attributes() {
            PoolCounters::bump(&self.counters.misses);
            trace!(
                "event=resource_create module=pool status=miss kind={}",
                key.kind
            );
            return Err(PoolError::Miss(key));
        }

        let now_ms = self.clock.now_ms();
        let expires_at_ms = now_ms.saturating_add(self.ttl_ms);
        let (resource, created) = match self.owned.entry(key) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_expired(now_ms) {
                    let existing = occupied.get().resource.clone();
                    drop(occupied);
                    self.live.insert(key, existing.downgrade());
                    PoolCounters::bump(&self.counters.cache_hits);
                    return Ok(existing);
                }
                let (resource, created) = match self.live_upgrade(&key) {
                    Some(existing) => (existing, false),
                    None => (factory.create(record)?, true),
                };
                occupied.insert(OwnedEntry {
                    resource: resource.clone(),
                    expires_at_ms,
                });
                (resource, created)
            }
            Entry::Vacant(vacant) => {
                if let Some(existing) = self.live_upgrade(&key) {
                    (existing, false)
                } else {
                    let created = factory.create(record)?;
                    vacant.insert(OwnedEntry {
                        resource: created.clone(),
                        expires_at_ms,
                    });
                    (created, true)
                }
            }
        };

        if !created {
            PoolCounters::bump(&self.counters.live_hits);
            return Ok(resource);
        }

        self.live.insert(key, resource.downgrade());
        PoolCounters::bump(&self.counters.created);
        debug!(
            "event=resource_create module=pool status=ok kind={} version={}",
            key.kind,
            resource.version()
        );
        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::{PoolError, ResourcePool};
    use crate::clock::ManualClock;
    use crate::config::PoolConfig;
    use crate::decode::decode_fragment;
    use crate::model::chapter::Chapter;
    use crate::model::kind::{ResourceKey, ResourceKind};
    use crate::model::resource::DomainResource;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    const CHAPTER_ID: &str = "0f3cbd7d-6d8e-4d54-9f41-4b7c3f8d1a01";
    const MANGA_ID: &str = "7b2d1e4c-3a5f-4e6b-8c9d-0a1b2c3d4e5f";

    fn chapter_fragment(relationships: Value) -> Value {
        json!({
            "id": CHAPTER_ID,
            "type": "chapter",
            "attributes": {
                "title": "Arrival",
                "chapter": "1",
                "pages": 18,
                "translatedLanguage": "en",
                "publishAt": "2021-04-19T21:45:59+00:00",
                "createdAt": "2021-04-19T21:45:59+00:00",
                "updatedAt": "2021-04-19T21:45:59+00:00",
                "version": 1
            },
            "relationships": relationships,
        })
    }

    fn pool_with_clock() -> (ResourcePool, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let pool = ResourcePool::with_clock(PoolConfig::default(), clock.clone())
            .expect("registry should validate");
        (pool, clock)
    }

    #[test]
    fn bare_stub_on_cold_key_is_a_miss() {
        let (pool, _clock) = pool_with_clock();
        let record = decode_fragment(
            &json!({"id": MANGA_ID, "type": "manga"}),
            ResourceKind::Manga,
        )
        .expect("bare manga fragment should decode");

        let err = pool.resolve(&record).expect_err("stubs cannot build objects");
        assert!(err.is_miss());
        assert!(matches!(err, PoolError::Miss(key) if key.kind == ResourceKind::Manga));
        assert_eq!(pool.stats().misses, 1);
    }

    #[test]
    fn unresolvable_stub_keeps_its_id_without_failing() {
        let (pool, _clock) = pool_with_clock();
        let record = decode_fragment(
            &chapter_fragment(json!([{"id": MANGA_ID, "type": "manga"}])),
            ResourceKind::Chapter,
        )
        .expect("chapter should decode");

        let resource = pool.resolve(&record).expect("chapter should resolve");
        let chapter = resource.downcast::<Chapter>().expect("chapter kind");
        assert_eq!(chapter.manga_id().map(|id| id.to_string()), Some(MANGA_ID.to_string()));
        assert!(chapter.relations().is_empty());
    }

    #[test]
    fn owning_tier_keeps_unreferenced_objects_until_ttl() {
        let (pool, clock) = pool_with_clock();
        let record = decode_fragment(&chapter_fragment(json!([])), ResourceKind::Chapter)
            .expect("chapter should decode");
        drop(pool.resolve(&record).expect("first resolve"));

        clock.advance(Duration::from_millis(pool.ttl_ms() - 1));
        let key = ResourceKey::new(
            ResourceKind::Chapter,
            Uuid::parse_str(CHAPTER_ID).expect("valid uuid"),
        );
        assert!(pool.contains(&key));
        assert!(pool.lookup::<Chapter>(key.id).is_some());

        clock.advance(Duration::from_millis(1));
        assert!(pool.lookup::<Chapter>(key.id).is_none());
        assert_eq!(pool.len_owned(), 0);
        assert_eq!(pool.stats().evicted, 1);
    }

    #[test]
    fn purge_sweeps_expired_entries() {
        let (pool, clock) = pool_with_clock();
        let record = decode_fragment(&chapter_fragment(json!([])), ResourceKind::Chapter)
            .expect("chapter should decode");
        drop(pool.resolve(&record).expect("resolve"));
        assert_eq!(pool.purge_expired(), 0);

        clock.advance(Duration::from_millis(pool.ttl_ms()));
        assert_eq!(pool.purge_expired(), 1);
        assert_eq!(pool.len_owned(), 0);
        assert_eq!(pool.len_live(), 0);
    }

    #[test]
    fn resolve_sweeps_expired_keys_once_per_interval() {
        let (pool, clock) = pool_with_clock();
        let record = decode_fragment(&chapter_fragment(json!([])), ResourceKind::Chapter)
            .expect("chapter should decode");
        drop(pool.resolve(&record).expect("resolve"));

        clock.advance(Duration::from_millis(pool.ttl_ms()));
        let other = decode_fragment(
            &json!({
                "id": MANGA_ID,
                "type": "manga",
                "attributes": {
                    "title": {"en": "Other"},
                    "originalLanguage": "ja",
                    "contentRating": "safe",
                    "createdAt": "2021-04-19T21:45:59+00:00",
                    "updatedAt": "2021-04-19T21:45:59+00:00"
                }
            }),
            ResourceKind::Manga,
        )
        .expect("manga should decode");
        drop(pool.resolve(&other).expect("resolve other"));

        assert_eq!(pool.len_owned(), 1);
        assert_eq!(pool.stats().evicted, 1);
    }

    #[test]
    fn concurrent_cold_resolves_build_one_object() {
        let (pool, _clock) = pool_with_clock();
        let record = decode_fragment(&chapter_fragment(json!([])), ResourceKind::Chapter)
            .expect("chapter should decode");

        let resolved = std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| scope.spawn(|| pool.resolve(&record).expect("resolve")))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("worker should not panic"))
                .collect::<Vec<_>>()
        });

        assert!(resolved.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
        assert_eq!(pool.stats().created, 1);
        assert_eq!(pool.stats().merged, 8);
    }
}
