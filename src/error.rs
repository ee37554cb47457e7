//! Error types for fetch strategies, extraction schemas, and the fetch chain
//!
//! Fetch failures are classified per strategy so the chain can report every
//! attempt it made. Schema errors surface at construction time, before any
//! page is fetched.

use std::fmt;

use thiserror::Error;

use crate::fetch::StrategyKind;

/// Why a single fetch strategy gave up on a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection, DNS, or protocol-level failure
    Transport,
    /// The strategy's overall deadline elapsed
    Timeout,
    /// Upstream answered with a non-success HTTP status
    Status(u16),
    /// Navigation finished but the readiness marker never appeared
    Readiness,
    /// An anti-bot interstitial persisted past the grace period
    Challenge,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Status(code) => write!(f, "status {code}"),
            FailureKind::Readiness => write!(f, "readiness"),
            FailureKind::Challenge => write!(f, "challenge"),
        }
    }
}

/// Failure of one strategy for one URL.
#[derive(Debug, Clone, Error)]
#[error("{strategy} fetch failed ({kind}): {message}")]
pub struct FetchError {
    pub strategy: StrategyKind,
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(strategy: StrategyKind, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            strategy,
            kind,
            message: message.into(),
        }
    }
}

/// Every configured strategy was tried and every one failed.
///
/// Carries the per-strategy causes in the order they were attempted, so the
/// final error names each strategy and why it lost.
#[derive(Debug, Clone)]
pub struct AllStrategiesFailed {
    pub url: String,
    pub attempts: Vec<FetchError>,
}

impl fmt::Display for AllStrategiesFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "all {} fetch strategies failed for {}",
            self.attempts.len(),
            self.url
        )?;
        for attempt in &self.attempts {
            write!(f, "; {attempt}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AllStrategiesFailed {}

/// Extraction schema rejected at build time.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// CSS selector failed to parse
    #[error("invalid selector '{selector}' for field '{field}': {message}")]
    Selector {
        field: String,
        selector: String,
        message: String,
    },

    /// Capture pattern failed to compile
    #[error("invalid capture pattern for field '{field}': {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A list-producing transform was applied to a repeated selection
    #[error("field '{field}' splits into a list but already selects many elements")]
    SplitOnList { field: String },
}
