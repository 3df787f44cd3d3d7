//! # Tokencache Core
//!
//! Core types, errors, and traits for the tenant-aware access-token cache.
//!
//! This crate provides the building blocks shared by the store, the service
//! and the CLI:
//!
//! - **Types**: Tenant ids, platform types, composite cache keys, access tokens
//! - **Errors**: Key-construction and configuration errors
//! - **Constants**: Default TTL, sweep interval and capacity
//! - **Traits**: The database-side token source used for cache-aside lookups
//!
//! ## Example
//!
//! ```rust
//! use tokencache_core::{PlatformType, TenantId, TokenCacheKey};
//!
//! let tenant = TenantId::new("acme").unwrap();
//! let key = TokenCacheKey::new(tenant, PlatformType::Linkedin);
//! assert_eq!(key.to_string(), "acme:LINKEDIN");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, TokenCacheError};
pub use traits::*;
pub use types::*;
