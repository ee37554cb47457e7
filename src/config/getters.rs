//! Getter methods for `ScrapeConfig`
//!
//! Duration-valued knobs are stored as plain integers for serialization and
//! surfaced here as `Duration`, so call sites never convert units themselves.

use std::path::Path;
use std::time::Duration;

use crate::fetch::StrategyKind;

use super::types::ScrapeConfig;

impl ScrapeConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn static_user_agent(&self) -> &str {
        &self.static_user_agent
    }

    /// Deadline for one static HTTP fetch.
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Deadline for one whole browser fetch.
    #[must_use]
    pub fn browser_timeout(&self) -> Duration {
        Duration::from_secs(self.browser_timeout_secs)
    }

    /// How long the browser strategy waits for a readiness marker.
    #[must_use]
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }

    #[must_use]
    pub fn readiness_poll_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_poll_interval_ms)
    }

    /// Grace period granted to anti-bot interstitials.
    #[must_use]
    pub fn challenge_grace(&self) -> Duration {
        Duration::from_secs(self.challenge_grace_secs)
    }

    /// How long cached extraction results stay fresh.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Fetch strategies in the order the chain tries them.
    #[must_use]
    pub fn strategy_order(&self) -> &[StrategyKind] {
        &self.strategy_order
    }

    #[must_use]
    pub fn max_browser_sessions(&self) -> usize {
        self.max_browser_sessions
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}
