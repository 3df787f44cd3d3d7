//! # Tokencache Service
//!
//! Process-wide cache of third-party OAuth access tokens, keyed by tenant and
//! platform, sitting in front of the database.
//!
//! - [`TokenCacheService`]: lookup-or-miss, per-tenant invalidation, stats
//! - [`TokenCacheConfig`]: TTL, sweep interval and capacity, loadable from env
//! - [`SweeperHandle`]: background purge of expired tokens
//!
//! ## Example
//!
//! ```rust
//! use tokencache_service::{PlatformType, TenantId, TokenCacheService};
//!
//! let cache = TokenCacheService::default();
//! let tenant = TenantId::new("acme").unwrap();
//!
//! assert!(cache.get_token(&tenant, PlatformType::Facebook).is_none());
//! cache.set_token(&tenant, PlatformType::Facebook, "EAAB...");
//! assert!(cache.get_token(&tenant, PlatformType::Facebook).is_some());
//!
//! cache.clear_company_tokens(&tenant);
//! assert_eq!(cache.get_cache_stats().live_entries, 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod service;
mod sweeper;

pub use config::TokenCacheConfig;
pub use service::{CacheInfo, CacheStatsReport, TokenCacheService};
pub use sweeper::SweeperHandle;

// Re-export the types callers need to talk to the cache
pub use tokencache_core::{
    AccessToken, PlatformType, Result, TenantId, TokenCacheError, TokenCacheKey, TokenSource,
};
