//! Generic TTL store.
//!
//! Thread-safe in-memory key/value container where every entry carries an
//! absolute expiry instant. Expired entries are never returned; they are
//! evicted lazily on read, or in bulk via [`TtlStore::purge_expired`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod store;

pub use store::{StoreConfig, StoreStats, TtlStore};
