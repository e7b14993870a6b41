//! # Availability Client
//!
//! This crate provides the client side of a campground availability search:
//! validating the search form, posting it to the availability endpoint,
//! parsing the structured response and coordinating the loading indicator
//! and user alerts around a single in-flight search.

/// Request, response and error types
mod types;
pub use types::*;

/// Endpoint and client configuration
mod config;
pub use config::*;

/// HTTP client for the availability endpoint
mod client;
pub use client::*;

/// Search trigger coordinating validation, the UI and the backend
mod search;
pub use search::*;
