//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! The base URL is the only required field; the type parameter makes
//! `build()` unreachable until it has been provided.

use std::marker::PhantomData;
use std::path::PathBuf;

use anyhow::Result;

use crate::fetch::StrategyKind;
use crate::utils::constants::{
    DEFAULT_BROWSER_TIMEOUT_SECS, DEFAULT_CACHE_TTL_SECS, DEFAULT_CHALLENGE_GRACE_SECS,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_HTTP_PORT, DEFAULT_MAX_BROWSER_SESSIONS,
    DEFAULT_READINESS_TIMEOUT_MS, READINESS_POLL_INTERVAL_MS, STATIC_USER_AGENT,
};
use crate::utils::normalize_base_url;

use super::types::ScrapeConfig;

// Type state marking that the required base URL has been set
pub struct WithBaseUrl;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) base_url: Option<String>,
    pub(crate) static_user_agent: String,
    pub(crate) fetch_timeout_secs: u64,
    pub(crate) browser_timeout_secs: u64,
    pub(crate) readiness_timeout_ms: u64,
    pub(crate) readiness_poll_interval_ms: u64,
    pub(crate) challenge_grace_secs: u64,
    pub(crate) cache_ttl_secs: u64,
    pub(crate) strategy_order: Vec<StrategyKind>,
    pub(crate) max_browser_sessions: usize,
    pub(crate) headless: bool,
    pub(crate) chrome_executable: Option<PathBuf>,
    pub(crate) port: u16,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            base_url: None,
            static_user_agent: STATIC_USER_AGENT.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            browser_timeout_secs: DEFAULT_BROWSER_TIMEOUT_SECS,
            readiness_timeout_ms: DEFAULT_READINESS_TIMEOUT_MS,
            readiness_poll_interval_ms: READINESS_POLL_INTERVAL_MS,
            challenge_grace_secs: DEFAULT_CHALLENGE_GRACE_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            strategy_order: vec![StrategyKind::Static, StrategyKind::Browser],
            max_browser_sessions: DEFAULT_MAX_BROWSER_SESSIONS,
            headless: true,
            chrome_executable: None,
            port: DEFAULT_HTTP_PORT,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder<()> {
    /// Set the catalog site origin. Bare hostnames gain `https://`; trailing
    /// slashes are dropped.
    pub fn base_url(self, url: impl Into<String>) -> ScrapeConfigBuilder<WithBaseUrl> {
        ScrapeConfigBuilder {
            base_url: Some(normalize_base_url(&url.into())),
            static_user_agent: self.static_user_agent,
            fetch_timeout_secs: self.fetch_timeout_secs,
            browser_timeout_secs: self.browser_timeout_secs,
            readiness_timeout_ms: self.readiness_timeout_ms,
            readiness_poll_interval_ms: self.readiness_poll_interval_ms,
            challenge_grace_secs: self.challenge_grace_secs,
            cache_ttl_secs: self.cache_ttl_secs,
            strategy_order: self.strategy_order,
            max_browser_sessions: self.max_browser_sessions,
            headless: self.headless,
            chrome_executable: self.chrome_executable,
            port: self.port,
            _phantom: PhantomData,
        }
    }
}

// Optional knobs, settable in any state
impl<State> ScrapeConfigBuilder<State> {
    #[must_use]
    pub fn static_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.static_user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn browser_timeout_secs(mut self, secs: u64) -> Self {
        self.browser_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn readiness_timeout_ms(mut self, millis: u64) -> Self {
        self.readiness_timeout_ms = millis;
        self
    }

    #[must_use]
    pub fn readiness_poll_interval_ms(mut self, millis: u64) -> Self {
        self.readiness_poll_interval_ms = millis;
        self
    }

    #[must_use]
    pub fn challenge_grace_secs(mut self, secs: u64) -> Self {
        self.challenge_grace_secs = secs;
        self
    }

    #[must_use]
    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Replace the fetch escalation order.
    #[must_use]
    pub fn strategy_order(mut self, order: Vec<StrategyKind>) -> Self {
        self.strategy_order = order;
        self
    }

    #[must_use]
    pub fn max_browser_sessions(mut self, sessions: usize) -> Self {
        self.max_browser_sessions = sessions;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

// Build method only available once the base URL is set
impl ScrapeConfigBuilder<WithBaseUrl> {
    pub fn build(self) -> Result<ScrapeConfig> {
        anyhow::ensure!(
            !self.strategy_order.is_empty(),
            "at least one fetch strategy must be configured"
        );
        anyhow::ensure!(
            self.max_browser_sessions >= 1,
            "max_browser_sessions must be at least 1"
        );

        // Enforce headless mode in release builds for production safety
        #[cfg(not(debug_assertions))]
        let headless = if self.headless {
            self.headless
        } else {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            true
        };

        #[cfg(debug_assertions)]
        let headless = self.headless;

        Ok(ScrapeConfig {
            base_url: self
                .base_url
                .ok_or_else(|| anyhow::anyhow!("base_url is required"))?,
            static_user_agent: self.static_user_agent,
            fetch_timeout_secs: self.fetch_timeout_secs,
            browser_timeout_secs: self.browser_timeout_secs,
            readiness_timeout_ms: self.readiness_timeout_ms,
            readiness_poll_interval_ms: self.readiness_poll_interval_ms,
            challenge_grace_secs: self.challenge_grace_secs,
            cache_ttl_secs: self.cache_ttl_secs,
            strategy_order: self.strategy_order,
            max_browser_sessions: self.max_browser_sessions,
            headless,
            chrome_executable: self.chrome_executable,
            port: self.port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_optional_knob() -> Result<()> {
        let config = ScrapeConfig::builder().base_url("otakudesu.best").build()?;

        assert_eq!(config.base_url(), "https://otakudesu.best");
        assert_eq!(config.fetch_timeout().as_secs(), 30);
        assert_eq!(config.readiness_timeout().as_millis(), 10_000);
        assert_eq!(config.readiness_poll_interval().as_millis(), 200);
        assert_eq!(config.challenge_grace().as_secs(), 8);
        assert_eq!(config.cache_ttl().as_secs(), 300);
        assert_eq!(
            config.strategy_order(),
            [StrategyKind::Static, StrategyKind::Browser]
        );
        assert_eq!(config.max_browser_sessions(), 2);
        assert_eq!(config.port(), 3001);
        Ok(())
    }

    #[test]
    fn base_url_is_normalized() -> Result<()> {
        let config = ScrapeConfig::builder()
            .base_url("https://otakudesu.best/")
            .build()?;
        assert_eq!(config.base_url(), "https://otakudesu.best");
        Ok(())
    }

    #[test]
    fn empty_strategy_order_is_rejected() {
        let err = ScrapeConfig::builder()
            .base_url("otakudesu.best")
            .strategy_order(vec![])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at least one fetch strategy"));
    }

    #[test]
    fn zero_browser_sessions_is_rejected() {
        let err = ScrapeConfig::builder()
            .base_url("otakudesu.best")
            .max_browser_sessions(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("max_browser_sessions"));
    }
}
