//! Scripted Chromium fetch strategy
//!
//! Drives a pooled browser session through navigation, anti-bot challenge
//! grace, and readiness polling, then captures the rendered DOM. The whole
//! attempt runs under one deadline; the page and the session are released on
//! every exit path, including timeout and cancellation.

use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chromiumoxide::Page;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

use crate::browser_pool::BrowserPool;
use crate::browser_setup;
use crate::config::ScrapeConfig;
use crate::error::{FailureKind, FetchError};

use super::{FetchRequest, FetchResult, FetchStrategy, StrategyKind};

/// Interstitial markers, matched case-insensitively against the head of the
/// rendered document.
const CHALLENGE_MARKERS: &[&str] = &[
    "just a moment",
    "checking your browser",
    "attention required",
    "cf-browser-verification",
    "challenge-platform",
    "verify you are human",
];

/// How much of the document the challenge scan reads. Interstitials are tiny
/// and carry their markers up top.
const CHALLENGE_SCAN_CHARS: usize = 4096;

pub struct BrowserFetcher {
    pool: Arc<BrowserPool>,
    overall_timeout: Duration,
    readiness_timeout: Duration,
    readiness_poll_interval: Duration,
    challenge_grace: Duration,
}

impl BrowserFetcher {
    pub fn new(pool: Arc<BrowserPool>, config: &ScrapeConfig) -> Self {
        Self {
            pool,
            overall_timeout: config.browser_timeout(),
            readiness_timeout: config.readiness_timeout(),
            readiness_poll_interval: config.readiness_poll_interval(),
            challenge_grace: config.challenge_grace(),
        }
    }

    async fn fetch_inner(&self, request: &FetchRequest) -> Result<FetchResult, FetchError> {
        let session = self
            .pool
            .acquire()
            .await
            .map_err(|e| transport(format!("could not obtain a browser session: {e:#}")))?;

        let page = session
            .browser()
            .new_page("about:blank")
            .await
            .map_err(|e| transport(format!("could not open a page: {e}")))?;
        let page = PageGuard::new(page);

        if let Err(e) = browser_setup::prepare_page(&page).await {
            debug!("Page preparation scripts failed, continuing: {e}");
        }

        page.goto(request.url.as_str())
            .await
            .map_err(|e| transport(format!("navigation to {} failed: {e}", request.url)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| transport(format!("navigation to {} did not settle: {e}", request.url)))?;

        let mut html = capture(&page).await?;

        if self.is_challenged(&page, &html).await {
            info!(
                "Challenge interstitial at {}, allowing {:?} to clear",
                request.url, self.challenge_grace
            );
            sleep(self.challenge_grace).await;
            // Interstitials navigate away when they clear.
            let _ = page.wait_for_navigation().await;
            html = capture(&page).await?;

            if self.is_challenged(&page, &html).await {
                return Err(FetchError::new(
                    StrategyKind::Browser,
                    FailureKind::Challenge,
                    format!(
                        "anti-bot challenge at {} did not clear within {:?}",
                        request.url, self.challenge_grace
                    ),
                ));
            }
        }

        if let Some(selector) = request.readiness_selector.as_deref() {
            self.await_readiness(&page, selector).await?;
            // The marker appeared after capture; take the settled DOM.
            html = capture(&page).await?;
        }

        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| request.url.clone());

        debug!(
            "Browser fetch of {} captured {} bytes from {final_url}",
            request.url,
            html.len()
        );

        Ok(FetchResult {
            html,
            final_url,
            strategy: StrategyKind::Browser,
        })
    }

    /// Poll for the readiness marker until it appears or the budget runs out.
    ///
    /// `wait_for_navigation` returns when the HTTP response lands; pages that
    /// build their listings client-side need this second wait.
    async fn await_readiness(&self, page: &Page, selector: &str) -> Result<(), FetchError> {
        let start = Instant::now();
        debug!("Waiting for readiness marker '{selector}'");

        loop {
            if page.find_element(selector).await.is_ok() {
                debug!("Readiness marker '{selector}' present after {:?}", start.elapsed());
                return Ok(());
            }

            if start.elapsed() >= self.readiness_timeout {
                return Err(FetchError::new(
                    StrategyKind::Browser,
                    FailureKind::Readiness,
                    format!(
                        "readiness marker '{selector}' absent after {:?}",
                        self.readiness_timeout
                    ),
                ));
            }

            sleep(self.readiness_poll_interval).await;
        }
    }

    async fn is_challenged(&self, page: &Page, html: &str) -> bool {
        if looks_challenged(html) {
            return true;
        }
        match page.url().await {
            Ok(Some(url)) => url.contains("/sorry/") || url.contains("captcha"),
            _ => false,
        }
    }
}

#[async_trait::async_trait]
impl FetchStrategy for BrowserFetcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Browser
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, FetchError> {
        let ceiling = request.timeout.unwrap_or(self.overall_timeout);
        match timeout(ceiling, self.fetch_inner(request)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::new(
                StrategyKind::Browser,
                FailureKind::Timeout,
                format!(
                    "browser fetch of {} did not finish within {ceiling:?}",
                    request.url
                ),
            )),
        }
    }
}

fn transport(message: String) -> FetchError {
    FetchError::new(StrategyKind::Browser, FailureKind::Transport, message)
}

async fn capture(page: &Page) -> Result<String, FetchError> {
    page.content()
        .await
        .map_err(|e| transport(format!("could not capture page content: {e}")))
}

fn looks_challenged(html: &str) -> bool {
    let head: String = html
        .chars()
        .take(CHALLENGE_SCAN_CHARS)
        .collect::<String>()
        .to_lowercase();
    CHALLENGE_MARKERS.iter().any(|marker| head.contains(marker))
}

/// Closes the page on every exit path. Drop spawns the async close, so
/// cancellation and timeout release the tab just like a clean return.
struct PageGuard {
    page: Page,
}

impl PageGuard {
    fn new(page: Page) -> Self {
        Self { page }
    }
}

impl Deref for PageGuard {
    type Target = Page;

    fn deref(&self) -> &Page {
        &self.page
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        let page = self.page.clone();
        tokio::spawn(async move {
            let _ = page.close().await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_markers_match_interstitial_heads() {
        let cloudflare = "<html><head><title>Just a moment...</title></head><body></body></html>";
        assert!(looks_challenged(cloudflare));

        let cased = "<title>Checking Your Browser</title>";
        assert!(looks_challenged(cased));

        let listing = "<html><head><title>Ongoing Anime</title></head><body>\
                       <div class=\"venz\"><ul><li>item</li></ul></div></body></html>";
        assert!(!looks_challenged(listing));
    }

    #[test]
    fn challenge_scan_ignores_markers_deep_in_large_documents() {
        let mut html = String::from("<html><head><title>Catalog</title></head><body>");
        html.push_str(&"<p>filler</p>".repeat(1000));
        html.push_str("just a moment");
        html.push_str("</body></html>");
        assert!(!looks_challenged(&html));
    }
}
