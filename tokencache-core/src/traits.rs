//! Collaborator interfaces for the token cache.

use async_trait::async_trait;

use crate::types::{AccessToken, PlatformType, TenantId};

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Authoritative source of access tokens, consulted on a cache miss.
///
/// Usually backed by the integrations table in the database. The cache never
/// calls a source on its own; callers opt in through the cache-aside helper.
///
/// Implementations report "no token stored" as `Ok(None)` and keep their own
/// error type, which the cache passes through untouched.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Error raised by the underlying store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the current token for `tenant` on `platform`.
    async fn fetch_token(
        &self,
        tenant: &TenantId,
        platform: PlatformType,
    ) -> Result<Option<AccessToken>, Self::Error>;
}
