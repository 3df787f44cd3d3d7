//! Error types for the token cache.
//!
//! Cache misses and expiry are never errors; they surface as `None`.
//! The variants here cover invalid key construction and bad configuration.

use thiserror::Error;

/// Result type alias using `TokenCacheError`.
pub type Result<T> = std::result::Result<T, TokenCacheError>;

/// Main error type for token cache operations.
#[derive(Debug, Error)]
pub enum TokenCacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // KEY CONSTRUCTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Tenant identifier is empty or contains the key separator.
    #[error("Invalid tenant id '{tenant}': {reason}")]
    InvalidTenantId {
        /// The rejected id
        tenant: String,
        /// Which rule it broke
        reason: String,
    },

    /// Platform name does not match any supported integration.
    #[error("Unknown platform type: {0}")]
    UnknownPlatform(String),

    /// A serialized cache key could not be parsed back.
    #[error("Invalid cache key: {0}")]
    InvalidCacheKey(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TokenCacheError {
    /// Returns true if this error comes from building or parsing a cache key.
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            TokenCacheError::InvalidTenantId { .. }
                | TokenCacheError::UnknownPlatform(_)
                | TokenCacheError::InvalidCacheKey(_)
        )
    }
}
