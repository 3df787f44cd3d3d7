//! Domain types for the token cache.
//!
//! - [`TenantId`]: Validated tenant (company) identifier
//! - [`PlatformType`]: Social/marketing integration a token belongs to
//! - [`TokenCacheKey`]: Composite `(tenant, platform)` key
//! - [`AccessToken`]: Redacted, zeroize-on-drop token string
//! - [`TokenCacheEntry`]: The value held per key

mod platform;
mod tenant;
mod key;
mod token;

pub use platform::*;
pub use tenant::*;
pub use key::*;
pub use token::*;
