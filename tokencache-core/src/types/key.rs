//! Composite cache keys.

use std::fmt;
use std::str::FromStr;

use crate::constants::KEY_SEPARATOR;
use crate::error::{Result, TokenCacheError};
use crate::types::{PlatformType, TenantId};

/// Identifies at most one cached token: one per tenant per platform.
///
/// Serializes to `"{tenant}:{platform}"`, e.g. `"acme:FACEBOOK"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenCacheKey {
    tenant: TenantId,
    platform: PlatformType,
}

impl TokenCacheKey {
    /// Creates a key for the given tenant and platform.
    pub fn new(tenant: TenantId, platform: PlatformType) -> Self {
        Self { tenant, platform }
    }

    /// Returns the tenant component.
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// Returns the platform component.
    pub fn platform(&self) -> PlatformType {
        self.platform
    }

    /// Parses a serialized key.
    ///
    /// Splits on the last separator; tenant ids cannot contain one, so the
    /// split is unambiguous.
    pub fn parse(s: &str) -> Result<Self> {
        let (tenant, platform) = s
            .rsplit_once(KEY_SEPARATOR)
            .ok_or_else(|| TokenCacheError::InvalidCacheKey(s.to_string()))?;

        let tenant = TenantId::new(tenant)
            .map_err(|_| TokenCacheError::InvalidCacheKey(s.to_string()))?;
        let platform = platform.parse::<PlatformType>()?;

        Ok(Self { tenant, platform })
    }

    /// Returns true if the serialized `key` belongs to `tenant`.
    ///
    /// Keys that fail to parse belong to nobody.
    pub fn belongs_to(key: &str, tenant: &TenantId) -> bool {
        match key.rsplit_once(KEY_SEPARATOR) {
            Some((owner, _)) => owner == tenant.as_str(),
            None => false,
        }
    }
}

impl fmt::Display for TokenCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.tenant, KEY_SEPARATOR, self.platform)
    }
}

impl FromStr for TokenCacheKey {
    type Err = TokenCacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
