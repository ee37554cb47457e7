//! Configuration module for the scraping service
//!
//! This module provides the `ScrapeConfig` struct and its type-safe builder
//! for configuring fetch strategies, timeouts, the browser pool, and the
//! result cache with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{ScrapeConfigBuilder, WithBaseUrl};
pub use types::ScrapeConfig;
