//! Ordered escalation across fetch strategies
//!
//! Strategies run one at a time in configured order. The first success wins;
//! when every strategy fails the chain reports all of them, so the caller
//! can see that the static fetch hit a 403 and the browser then timed out.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::error::AllStrategiesFailed;

use super::{FetchRequest, FetchResult, FetchStrategy};

pub struct FetchChain {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl std::fmt::Debug for FetchChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchChain")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FetchChain {
    /// A chain with nothing to try can never fetch; reject it up front.
    pub fn new(strategies: Vec<Box<dyn FetchStrategy>>) -> Result<Self> {
        anyhow::ensure!(
            !strategies.is_empty(),
            "fetch chain requires at least one strategy"
        );
        Ok(Self { strategies })
    }

    /// Try each strategy in order until one yields a page.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, AllStrategiesFailed> {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            debug!("Trying {} fetch for {}", strategy.kind(), request.url);

            match strategy.fetch(request).await {
                Ok(result) => {
                    if !attempts.is_empty() {
                        info!(
                            "{} fetch recovered {} after {} failed attempt(s)",
                            result.strategy,
                            request.url,
                            attempts.len()
                        );
                    }
                    return Ok(result);
                }
                Err(err) => {
                    warn!("Fetch attempt failed for {}: {err}", request.url);
                    attempts.push(err);
                }
            }
        }

        Err(AllStrategiesFailed {
            url: request.url.clone(),
            attempts,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
