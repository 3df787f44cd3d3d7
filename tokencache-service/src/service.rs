//! Tenant- and platform-aware token cache.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use tokencache_core::traits::TokenSource;
use tokencache_core::types::{AccessToken, PlatformType, TenantId, TokenCacheEntry, TokenCacheKey};
use tokencache_store::{StoreConfig, TtlStore};

use crate::config::TokenCacheConfig;
use crate::sweeper::{self, SweeperHandle};

/// Cache of third-party access tokens, one per tenant per platform.
///
/// Construct one at startup and share it (`Arc<TokenCacheService>`) with
/// every handler. All operations are synchronous, in-memory and safe to call
/// concurrently.
///
/// # Cache-aside
///
/// On a miss the caller loads the token from the database and stores it with
/// [`set_token`](Self::set_token), or lets
/// [`get_or_fetch`](Self::get_or_fetch) do both.
pub struct TokenCacheService {
    store: Arc<TtlStore<TokenCacheEntry>>,
    /// Per-tenant clear counter. Locked before the store, never after.
    generations: Mutex<HashMap<TenantId, u64>>,
    ttl: Duration,
    config: TokenCacheConfig,
}

impl TokenCacheService {
    /// Creates a cache from configuration.
    pub fn new(config: TokenCacheConfig) -> Self {
        let store = TtlStore::with_config(StoreConfig {
            max_entries: config.max_entries,
        });

        Self {
            store: Arc::new(store),
            generations: Mutex::new(HashMap::new()),
            ttl: config.ttl(),
            config,
        }
    }

    /// Overrides the token TTL with sub-second precision.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the configuration the cache was built from.
    pub fn config(&self) -> &TokenCacheConfig {
        &self.config
    }

    /// Returns the TTL applied to every stored token.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up the cached token for `tenant` on `platform`.
    ///
    /// `None` means the caller must consult the database.
    pub fn get_token(&self, tenant: &TenantId, platform: PlatformType) -> Option<AccessToken> {
        let key = cache_key(tenant, platform);

        match self.store.get(&key) {
            Some(entry) => {
                debug!(tenant = %tenant, %platform, "Token cache hit");
                Some(entry.access_token)
            }
            None => {
                debug!(tenant = %tenant, %platform, "Token cache miss");
                None
            }
        }
    }

    /// Stores a token, replacing any previous one for the same key.
    ///
    /// Only pass tokens that were fully fetched from the database.
    pub fn set_token(
        &self,
        tenant: &TenantId,
        platform: PlatformType,
        token: impl Into<AccessToken>,
    ) {
        let key = cache_key(tenant, platform);
        self.store
            .set(key, TokenCacheEntry::new(token.into(), platform), self.ttl);

        debug!(tenant = %tenant, %platform, ttl_ms = self.ttl.as_millis() as u64, "Cached token");
    }

    /// Drops the cached token for one tenant and platform.
    ///
    /// Returns true if an entry was removed.
    pub fn invalidate_token(&self, tenant: &TenantId, platform: PlatformType) -> bool {
        let removed = self.store.delete(&cache_key(tenant, platform));
        if removed {
            info!(tenant = %tenant, %platform, "Invalidated cached token");
        }
        removed
    }

    /// Drops every cached token belonging to `tenant`, across all platforms.
    ///
    /// Runs under a single exclusive lock, so no concurrent `set_token` can
    /// interleave with the scan. Other tenants are never touched. Returns the
    /// number of entries removed.
    pub fn clear_company_tokens(&self, tenant: &TenantId) -> usize {
        let mut generations = self.generations.lock();
        *generations.entry(tenant.clone()).or_insert(0) += 1;

        let removed = self
            .store
            .remove_where(|key, _| TokenCacheKey::belongs_to(key, tenant));
        drop(generations);

        info!(tenant = %tenant, removed, "Cleared company tokens");
        removed
    }

    /// Removes expired tokens now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }

    /// Returns aggregate counts plus live tokens per platform.
    ///
    /// Read-only. Every supported platform is listed, so the per-platform
    /// counts always sum to `live_entries`.
    pub fn get_cache_stats(&self) -> CacheStatsReport {
        let (stats, groups) = self.store.stats_grouped(|entry| entry.platform);

        let by_platform = PlatformType::ALL
            .iter()
            .map(|p| (*p, groups.get(p).copied().unwrap_or(0)))
            .collect();

        CacheStatsReport {
            total_entries: stats.total_entries,
            live_entries: stats.live_entries,
            expired_entries: stats.expired_entries,
            by_platform,
        }
    }

    /// Static description of the cache for debug endpoints.
    pub fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            ttl_seconds: self.ttl.as_secs(),
            ttl_description: describe_duration(self.ttl),
            supported_platforms: PlatformType::ALL.to_vec(),
            sweep_interval_seconds: self.config.sweep_interval().map(|d| d.as_secs()),
            max_entries: (self.config.max_entries > 0).then_some(self.config.max_entries),
        }
    }

    /// Returns the cached token, or loads it from `source` and caches it.
    ///
    /// A token the source does not have (`Ok(None)`) is not cached. Source
    /// errors are returned unchanged and leave the cache untouched.
    ///
    /// If [`clear_company_tokens`](Self::clear_company_tokens) runs for the
    /// same tenant while the source is being queried, the fetched token is
    /// returned to the caller but not cached.
    #[instrument(skip_all, fields(tenant = %tenant, platform = %platform))]
    pub async fn get_or_fetch<S>(
        &self,
        source: &S,
        tenant: &TenantId,
        platform: PlatformType,
    ) -> Result<Option<AccessToken>, S::Error>
    where
        S: TokenSource + ?Sized,
    {
        if let Some(token) = self.get_token(tenant, platform) {
            return Ok(Some(token));
        }

        let generation = self.generation(tenant);
        let fetched = source.fetch_token(tenant, platform).await?;

        match &fetched {
            Some(token) => {
                let generations = self.generations.lock();
                if generations.get(tenant).copied().unwrap_or(0) == generation {
                    self.set_token(tenant, platform, token.clone());
                } else {
                    debug!("Tenant cleared during fetch, not caching");
                }
            }
            None => debug!("No token stored for tenant"),
        }

        Ok(fetched)
    }

    fn generation(&self, tenant: &TenantId) -> u64 {
        self.generations.lock().get(tenant).copied().unwrap_or(0)
    }

    /// Starts the background sweeper at the configured interval.
    ///
    /// Returns `None` when sweeping is disabled. Must be called from within a
    /// Tokio runtime.
    pub fn spawn_sweeper(&self) -> Option<SweeperHandle> {
        self.config
            .sweep_interval()
            .map(|interval| self.spawn_sweeper_every(interval))
    }

    /// Starts the background sweeper at an explicit interval.
    pub fn spawn_sweeper_every(&self, interval: Duration) -> SweeperHandle {
        sweeper::spawn(Arc::downgrade(&self.store), interval)
    }
}

impl Default for TokenCacheService {
    fn default() -> Self {
        Self::new(TokenCacheConfig::default())
    }
}

fn cache_key(tenant: &TenantId, platform: PlatformType) -> String {
    TokenCacheKey::new(tenant.clone(), platform).to_string()
}

fn describe_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if d.subsec_nanos() != 0 {
        format!("{} ms", d.as_millis())
    } else if secs >= 3600 && secs % 3600 == 0 {
        plural(secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else {
        plural(secs, "second")
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Cache statistics with a per-platform breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsReport {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Entries not yet expired
    pub live_entries: usize,
    /// Expired entries awaiting eviction
    pub expired_entries: usize,
    /// Live entries per platform
    pub by_platform: BTreeMap<PlatformType, usize>,
}

/// Static description of the cache's policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    /// Token TTL in whole seconds
    pub ttl_seconds: u64,
    /// Human-readable TTL, e.g. "5 minutes"
    pub ttl_description: String,
    /// Platforms tokens can be cached for
    pub supported_platforms: Vec<PlatformType>,
    /// Background sweep interval, if enabled
    pub sweep_interval_seconds: Option<u64>,
    /// Capacity bound, if any
    pub max_entries: Option<usize>,
}
