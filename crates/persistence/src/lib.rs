//! # Persistence
//!
//! This crate provides the key/value store that remembers the search form
//! between sessions. Every value is saved with an expiry; an expired or
//! missing key simply loads as absent.

/// Store trait, stored value type and the in-memory backend
pub mod store;
pub use store::*;

/// JSON file backend
pub mod file_store;
pub use file_store::*;
