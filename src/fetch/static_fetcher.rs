//! Plain HTTP fetch strategy
//!
//! One GET with an honest identity header, follow redirects, take the body.
//! Cheap and fast when the upstream serves full HTML; the chain escalates to
//! a browser when it does not.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{FailureKind, FetchError};

use super::{FetchRequest, FetchResult, FetchStrategy, StrategyKind};

pub struct StaticFetcher {
    client: Client,
}

impl StaticFetcher {
    /// Build the strategy with its identity header and default deadline.
    /// The timeout covers the whole request, body included; a request can
    /// carry its own tighter or looser ceiling.
    pub fn new(user_agent: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn classify(err: &reqwest::Error) -> FailureKind {
        if err.is_timeout() {
            FailureKind::Timeout
        } else {
            FailureKind::Transport
        }
    }
}

#[async_trait::async_trait]
impl FetchStrategy for StaticFetcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Static
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, FetchError> {
        debug!("Static fetch of {}", request.url);

        let mut call = self.client.get(&request.url);
        if let Some(ceiling) = request.timeout {
            call = call.timeout(ceiling);
        }

        let response = call.send().await.map_err(|e| {
            FetchError::new(StrategyKind::Static, Self::classify(&e), e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                StrategyKind::Static,
                FailureKind::Status(status.as_u16()),
                format!("GET {} answered {status}", request.url),
            ));
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| {
            FetchError::new(StrategyKind::Static, Self::classify(&e), e.to_string())
        })?;

        debug!(
            "Static fetch of {} captured {} bytes from {final_url}",
            request.url,
            html.len()
        );

        Ok(FetchResult {
            html,
            final_url,
            strategy: StrategyKind::Static,
        })
    }
}
