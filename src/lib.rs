pub mod browser_pool;
pub mod browser_setup;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod pipeline;
pub mod sites;
pub mod utils;

pub use browser_pool::{BrowserPool, BrowserSessionGuard};
pub use browser_setup::{find_browser_executable, launch_browser};
pub use cache::ResultCache;
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use error::{AllStrategiesFailed, FailureKind, FetchError, SchemaError};
pub use extract::{
    CollectionSchema, ExtractionSchema, FieldSpec, HtmlDocument, Payload, Record, Value,
};
pub use fetch::{
    BrowserFetcher, FetchChain, FetchRequest, FetchResult, FetchStrategy, StaticFetcher,
    StrategyKind,
};
pub use http::{ApiError, Envelope};
pub use pipeline::{DataSource, Outcome, Pipeline};
pub use sites::{Lookup, Otakudesu};

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

/// Build the fetch strategies the configuration asks for, in its order.
///
/// The browser pool is created only when the chain contains a browser
/// strategy; a static-only chain never touches Chromium.
pub fn build_chain(config: &ScrapeConfig) -> Result<(FetchChain, Option<Arc<BrowserPool>>)> {
    let mut pool: Option<Arc<BrowserPool>> = None;
    let mut strategies: Vec<Box<dyn FetchStrategy>> = Vec::new();

    for kind in config.strategy_order() {
        match kind {
            StrategyKind::Static => {
                let fetcher =
                    StaticFetcher::new(config.static_user_agent(), config.fetch_timeout())
                        .context("could not build the static HTTP client")?;
                strategies.push(Box::new(fetcher));
            }
            StrategyKind::Browser => {
                let pool = pool.get_or_insert_with(|| {
                    BrowserPool::new(
                        config.max_browser_sessions(),
                        config.headless(),
                        config.chrome_executable().map(Path::to_path_buf),
                    )
                });
                strategies.push(Box::new(BrowserFetcher::new(Arc::clone(pool), config)));
            }
        }
    }

    Ok((FetchChain::new(strategies)?, pool))
}

/// Wire the whole service: strategy chain, catalog client, HTTP router.
///
/// The returned pool handle, when present, should be shut down after the
/// server exits so idle Chromium sessions close cleanly.
pub fn build_service(config: &ScrapeConfig) -> Result<(axum::Router, Option<Arc<BrowserPool>>)> {
    let (chain, pool) = build_chain(config)?;
    let catalog = Arc::new(Otakudesu::new(config, chain)?);
    Ok((http::router(catalog), pool))
}
