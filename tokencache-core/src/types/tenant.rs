//! Tenant identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::KEY_SEPARATOR;
use crate::error::{Result, TokenCacheError};

/// Opaque tenant (company) identifier.
///
/// The id is stored verbatim, but it must not be blank and must not contain
/// the key separator. Those two rules keep every serialized cache key
/// attributable to exactly one tenant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Creates a tenant id.
    ///
    /// # Errors
    /// Returns [`TokenCacheError::InvalidTenantId`] if the id is blank or
    /// contains `':'`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(TokenCacheError::InvalidTenantId {
                tenant: id,
                reason: "must not be blank".into(),
            });
        }
        if id.contains(KEY_SEPARATOR) {
            return Err(TokenCacheError::InvalidTenantId {
                tenant: id,
                reason: format!("must not contain '{}'", KEY_SEPARATOR),
            });
        }

        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = TokenCacheError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TenantId {
    type Error = TokenCacheError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_valid() {
        let tenant = TenantId::new("company-42").unwrap();
        assert_eq!(tenant.as_str(), "company-42");
        assert_eq!(tenant.to_string(), "company-42");
    }

    #[test]
    fn test_tenant_kept_verbatim() {
        let tenant = TenantId::new(" Acme ").unwrap();
        assert_eq!(tenant.as_str(), " Acme ");
    }

    #[test]
    fn test_tenant_blank_rejected() {
        assert!(matches!(
            TenantId::new(""),
            Err(TokenCacheError::InvalidTenantId { .. })
        ));
        assert!(matches!(
            TenantId::new("   "),
            Err(TokenCacheError::InvalidTenantId { .. })
        ));
    }

    #[test]
    fn test_tenant_separator_rejected() {
        let err = TenantId::new("acme:FACEBOOK").unwrap_err();
        assert!(err.is_key_error());
    }

    #[test]
    fn test_tenant_serde_validates() {
        let tenant: TenantId = serde_json::from_str("\"t1\"").unwrap();
        assert_eq!(tenant.as_str(), "t1");
        assert_eq!(serde_json::to_string(&tenant).unwrap(), "\"t1\"");
        assert!(serde_json::from_str::<TenantId>("\"bad:id\"").is_err());
    }
}
