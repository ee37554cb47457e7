//! Core configuration types for the scraping service
//!
//! This module contains the main `ScrapeConfig` struct that defines every
//! tuning knob of the fetch chain, the browser pool, the result cache, and
//! the API server.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetch::StrategyKind;

/// Main configuration for the scraping service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Origin of the scraped catalog site.
    ///
    /// **INVARIANT:** Always `scheme://host` with no trailing slash
    /// (normalized in builder), so page URL builders can append paths
    /// without double slashes.
    pub(crate) base_url: String,

    /// Identity header sent by the static HTTP strategy
    pub(crate) static_user_agent: String,

    /// Timeout in seconds for one static HTTP fetch, body included
    ///
    /// Default: 30 seconds
    pub(crate) fetch_timeout_secs: u64,

    /// Timeout in seconds for one whole browser fetch
    ///
    /// Covers navigation, challenge grace, readiness polling, and content
    /// capture. Prevents a wedged tab from pinning a pool slot forever.
    ///
    /// Default: 60 seconds
    pub(crate) browser_timeout_secs: u64,

    /// Milliseconds the browser strategy waits for a page's readiness marker
    ///
    /// Default: 10000
    pub(crate) readiness_timeout_ms: u64,

    /// Milliseconds between readiness marker probes
    ///
    /// Default: 200
    pub(crate) readiness_poll_interval_ms: u64,

    /// Seconds granted to an anti-bot interstitial before the attempt fails
    ///
    /// Default: 8 seconds
    pub(crate) challenge_grace_secs: u64,

    /// Seconds a cached extraction result stays fresh
    ///
    /// Default: 300 seconds
    pub(crate) cache_ttl_secs: u64,

    /// Fetch strategies in the order the chain tries them
    pub(crate) strategy_order: Vec<StrategyKind>,

    /// Cap on concurrently live Chromium sessions
    pub(crate) max_browser_sessions: usize,

    /// Run Chromium headless (forced on in release builds)
    pub(crate) headless: bool,

    /// Explicit Chromium executable, overriding discovery
    pub(crate) chrome_executable: Option<PathBuf>,

    /// TCP port for the JSON API server
    pub(crate) port: u16,
}
