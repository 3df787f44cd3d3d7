//! Access tokens and the cached value wrapping them.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::types::PlatformType;

// ═══════════════════════════════════════════════════════════════════════════════
// ACCESS TOKEN
// ═══════════════════════════════════════════════════════════════════════════════

/// A third-party OAuth access token.
///
/// The token is sensitive and will be automatically zeroized when dropped.
/// Never expose it in logs or error messages.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    ///
    /// # Security
    /// Handle the returned string carefully - do not log or expose it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the token length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken([REDACTED])")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE ENTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Value stored per `(tenant, platform)` key.
///
/// Expiry lives on the store's entry, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenCacheEntry {
    /// The cached token
    pub access_token: AccessToken,
    /// Platform the token authenticates against
    pub platform: PlatformType,
}

impl TokenCacheEntry {
    /// Creates a cache entry.
    pub fn new(access_token: AccessToken, platform: PlatformType) -> Self {
        Self {
            access_token,
            platform,
        }
    }
}
