//! # Campground Catalog
//!
//! This crate provides the static campground catalog: the display name, the
//! recreation.gov link and the display overrides for every campground the
//! search form offers. The catalog is immutable once built and is shared with
//! the selection state and the result renderer.

/// Catalog entries and lookups
mod catalog;
pub use catalog::*;

/// Built-in Yosemite-area catalog
mod yosemite;
pub use yosemite::*;
