//! Fallback behavior of the fetch strategy chain

mod common;

use std::sync::atomic::Ordering;

use common::StubStrategy;
use otakuscrape::error::FailureKind;
use otakuscrape::fetch::{FetchChain, FetchRequest, FetchStrategy, StrategyKind};

#[tokio::test]
async fn first_success_stops_the_chain() {
    let primary = StubStrategy::serving(StrategyKind::Static, "<html>primary</html>");
    let fallback = StubStrategy::serving(StrategyKind::Browser, "<html>fallback</html>");
    let primary_calls = primary.counter();
    let fallback_calls = fallback.counter();

    let chain = FetchChain::new(vec![Box::new(primary), Box::new(fallback)]).unwrap();
    let result = chain
        .fetch(&FetchRequest::new("https://example.com/listing"))
        .await
        .unwrap();

    assert_eq!(result.html, "<html>primary</html>");
    assert_eq!(result.strategy, StrategyKind::Static);
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chain_falls_back_in_configured_order() {
    let primary = StubStrategy::failing(StrategyKind::Static, FailureKind::Status(403), "blocked");
    let fallback = StubStrategy::serving(StrategyKind::Browser, "<html>rendered</html>");
    let primary_calls = primary.counter();
    let fallback_calls = fallback.counter();

    let chain = FetchChain::new(vec![Box::new(primary), Box::new(fallback)]).unwrap();
    let result = chain
        .fetch(&FetchRequest::new("https://example.com/listing"))
        .await
        .unwrap();

    assert_eq!(result.strategy, StrategyKind::Browser);
    assert_eq!(result.html, "<html>rendered</html>");
    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhausted_chain_reports_every_attempt_in_order() {
    let chain = FetchChain::new(vec![
        Box::new(StubStrategy::failing(
            StrategyKind::Static,
            FailureKind::Status(403),
            "blocked",
        )),
        Box::new(StubStrategy::failing(
            StrategyKind::Browser,
            FailureKind::Timeout,
            "deadline elapsed",
        )),
    ])
    .unwrap();

    let err = chain
        .fetch(&FetchRequest::new("https://example.com/listing"))
        .await
        .unwrap_err();

    assert_eq!(err.url, "https://example.com/listing");
    assert_eq!(err.attempts.len(), 2);
    assert_eq!(err.attempts[0].strategy, StrategyKind::Static);
    assert_eq!(err.attempts[0].kind, FailureKind::Status(403));
    assert_eq!(err.attempts[1].strategy, StrategyKind::Browser);
    assert_eq!(err.attempts[1].kind, FailureKind::Timeout);

    let rendered = err.to_string();
    assert!(rendered.contains("all 2 fetch strategies failed"));
    assert!(rendered.contains("static fetch failed (status 403): blocked"));
    assert!(rendered.contains("browser fetch failed (timeout): deadline elapsed"));
}

#[tokio::test]
async fn empty_chain_is_rejected_at_construction() {
    let strategies: Vec<Box<dyn FetchStrategy>> = Vec::new();
    let err = FetchChain::new(strategies).unwrap_err();
    assert!(err.to_string().contains("at least one strategy"));
}
