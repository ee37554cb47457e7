//! Page fetching strategies
//!
//! Every strategy answers the same question, "give me the rendered HTML of
//! this URL", with different machinery and different costs. The
//! [`chain::FetchChain`] runs them in configured order until one succeeds.

pub mod browser_fetcher;
pub mod chain;
pub mod static_fetcher;

pub use browser_fetcher::BrowserFetcher;
pub use chain::FetchChain;
pub use static_fetcher::StaticFetcher;

use std::fmt;
use std::time::Duration;

use crate::error::FetchError;

/// Identifies a fetch strategy in logs, failure reports, and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Single identity-bearing HTTP GET, no script execution
    Static,
    /// Scripted Chromium session that waits for client-side rendering
    Browser,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Static => write!(f, "static"),
            StrategyKind::Browser => write!(f, "browser"),
        }
    }
}

/// What a strategy needs to know to fetch one page.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    /// CSS marker that must be present before the page counts as rendered.
    /// Only meaningful to strategies that execute scripts.
    pub readiness_selector: Option<String>,
    /// Deadline for this request alone, overriding the strategy's configured
    /// ceiling when set.
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            readiness_selector: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_readiness_selector(mut self, selector: impl Into<String>) -> Self {
        self.readiness_selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, ceiling: Duration) -> Self {
        self.timeout = Some(ceiling);
        self
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub html: String,
    /// Address the fetch ended on, after redirects.
    pub final_url: String,
    /// Which strategy produced the page.
    pub strategy: StrategyKind,
}

/// One way of turning a URL into rendered HTML.
#[async_trait::async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Stable identifier used in logs and failure reports.
    fn kind(&self) -> StrategyKind;

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, FetchError>;
}
