// Cache-backed anime catalog API over the otakudesu site.
//
// Configuration comes from OTAKUSCRAPE_* environment variables; every value
// has a default that works for local use.

use anyhow::Result;
use otakuscrape::{ScrapeConfig, StrategyKind, build_service, http};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_BASE_URL: &str = "https://otakudesu.best";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,otakuscrape=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = config_from_env()?;
    info!("Starting otakuscrape against {}", config.base_url());

    let (app, pool) = build_service(&config)?;
    let served = http::serve(app, config.port()).await;

    if let Some(pool) = pool {
        if let Err(err) = pool.shutdown().await {
            warn!("Browser pool shutdown failed: {err:#}");
        }
    }

    served
}

fn config_from_env() -> Result<ScrapeConfig> {
    let mut builder = ScrapeConfig::builder()
        .base_url(env_var("OTAKUSCRAPE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()));

    if let Some(agent) = env_var("OTAKUSCRAPE_USER_AGENT") {
        builder = builder.static_user_agent(agent);
    }
    if let Some(secs) = env_parsed::<u64>("OTAKUSCRAPE_FETCH_TIMEOUT_SECS")? {
        builder = builder.fetch_timeout_secs(secs);
    }
    if let Some(secs) = env_parsed::<u64>("OTAKUSCRAPE_BROWSER_TIMEOUT_SECS")? {
        builder = builder.browser_timeout_secs(secs);
    }
    if let Some(ms) = env_parsed::<u64>("OTAKUSCRAPE_READINESS_TIMEOUT_MS")? {
        builder = builder.readiness_timeout_ms(ms);
    }
    if let Some(secs) = env_parsed::<u64>("OTAKUSCRAPE_CHALLENGE_GRACE_SECS")? {
        builder = builder.challenge_grace_secs(secs);
    }
    if let Some(secs) = env_parsed::<u64>("OTAKUSCRAPE_CACHE_TTL_SECS")? {
        builder = builder.cache_ttl_secs(secs);
    }
    if let Some(order) = env_var("OTAKUSCRAPE_STRATEGIES") {
        builder = builder.strategy_order(parse_strategies(&order)?);
    }
    if let Some(max) = env_parsed::<usize>("OTAKUSCRAPE_MAX_BROWSER_SESSIONS")? {
        builder = builder.max_browser_sessions(max);
    }
    if let Some(headless) = env_parsed::<bool>("OTAKUSCRAPE_HEADLESS")? {
        builder = builder.headless(headless);
    }
    if let Some(path) = env_var("OTAKUSCRAPE_CHROME") {
        builder = builder.chrome_executable(path);
    }
    if let Some(port) = env_parsed::<u16>("PORT")? {
        builder = builder.port(port);
    }

    builder.build()
}

/// Comma-separated strategy list, e.g. `static,browser` or `browser`.
fn parse_strategies(raw: &str) -> Result<Vec<StrategyKind>> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "static" => Ok(StrategyKind::Static),
            "browser" => Ok(StrategyKind::Browser),
            other => anyhow::bail!("unknown fetch strategy {other:?} (expected static or browser)"),
        })
        .collect()
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T>(name: &'static str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|err| anyhow::anyhow!("{name}={raw:?} is not usable: {err}")),
    }
}
