//! Defaults for the token cache.

// ═══════════════════════════════════════════════════════════════════════════════
// EXPIRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Lifetime of a cached access token, in seconds (5 minutes).
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 300;

/// How often the background sweeper purges expired entries, in seconds.
/// Matches the TTL so an unread token lingers at most two TTL intervals.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = DEFAULT_TOKEN_TTL_SECONDS;

// ═══════════════════════════════════════════════════════════════════════════════
// CAPACITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Default upper bound on cached tokens. Zero disables the bound, so live
/// tokens only leave the cache by expiry or explicit invalidation.
pub const DEFAULT_MAX_ENTRIES: usize = 0;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY FORMAT
// ═══════════════════════════════════════════════════════════════════════════════

/// Separator between tenant id and platform in a serialized cache key.
pub const KEY_SEPARATOR: char = ':';

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable overriding the token TTL.
pub const ENV_TTL_SECONDS: &str = "TOKEN_CACHE_TTL_SECONDS";

/// Environment variable overriding the sweep interval (0 disables sweeping).
pub const ENV_SWEEP_INTERVAL_SECONDS: &str = "TOKEN_CACHE_SWEEP_INTERVAL_SECONDS";

/// Environment variable overriding the capacity bound (0 disables it).
pub const ENV_MAX_ENTRIES: &str = "TOKEN_CACHE_MAX_ENTRIES";
