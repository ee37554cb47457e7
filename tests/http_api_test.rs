//! Full-surface HTTP tests: router, handlers, envelope, and cache behavior
//! over stubbed fetch strategies.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::StubStrategy;
use otakuscrape::config::ScrapeConfig;
use otakuscrape::error::FailureKind;
use otakuscrape::fetch::{FetchChain, StrategyKind};
use otakuscrape::http;
use otakuscrape::sites::Otakudesu;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_around(strategy: StubStrategy) -> (Router, Arc<AtomicUsize>) {
    let calls = strategy.counter();
    let chain = FetchChain::new(vec![Box::new(strategy)]).unwrap();
    let config = ScrapeConfig::builder()
        .base_url("https://otakudesu.best")
        .build()
        .unwrap();
    let catalog = Otakudesu::new(&config, chain).unwrap();
    (http::router(Arc::new(catalog)), calls)
}

fn app_serving(body: &str) -> (Router, Arc<AtomicUsize>) {
    app_around(StubStrategy::serving(StrategyKind::Static, body))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn index_lists_the_endpoints() {
    let (app, _) = app_serving("<html></html>");
    let (status, body) = get_json(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("otakuscrape"));
    assert!(body.get("source").is_none());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn search_answers_live_then_from_cache() {
    let (app, calls) = app_serving(&common::search_page());

    let (status, body) = get_json(&app, "/api/search?q=naruto").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("live"));

    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["id"], json!("naruto-sub-indo"));
    assert_eq!(hits[0]["title"], json!("Naruto Subtitle Indonesia"));
    assert_eq!(hits[0]["image"], json!("https://img.otakudesu.best/naruto.jpg"));
    assert_eq!(hits[0]["genres"], json!(["Action", "Adventure"]));
    assert_eq!(hits[0]["status"], json!("Completed"));
    assert_eq!(hits[0]["rating"], json!("8.21"));
    assert_eq!(
        hits[0]["url"],
        json!("https://otakudesu.best/anime/naruto-sub-indo/")
    );
    assert_eq!(hits[1]["id"], json!("boruto-sub-indo"));
    assert_eq!(hits[1]["status"], json!("Ongoing"));

    let (status, body) = get_json(&app, "/api/search?q=naruto").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], json!("cache"));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "cache hit must not fetch");
}

#[tokio::test]
async fn equivalent_queries_share_a_cache_slot() {
    let (app, calls) = app_serving(&common::search_page());

    get_json(&app, "/api/search?q=Naruto").await;
    let (_, body) = get_json(&app, "/api/search?q=naruto%20").await;

    assert_eq!(body["source"], json!("cache"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn search_without_a_query_is_rejected() {
    let (app, calls) = app_serving(&common::search_page());

    let (status, body) = get_json(&app, "/api/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "Query parameter required"})
    );

    // Whitespace-only counts as missing.
    let (status, _) = get_json(&app, "/api/search?q=+").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "rejections never fetch");
}

#[tokio::test]
async fn ongoing_returns_series_and_pagination() {
    let (app, _) = app_serving(&common::ongoing_page());

    let (status, body) = get_json(&app, "/api/ongoing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let series = body["data"]["anime"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["id"], json!("spy-x-family"));
    assert_eq!(series[0]["title"], json!("Spy x Family"));
    assert_eq!(series[0]["image"], json!("https://img.otakudesu.best/spy.jpg"));
    assert_eq!(series[0]["episode"], json!("Episode 8"));
    assert_eq!(series[0]["day"], json!("Sabtu"));
    assert_eq!(
        series[0]["url"],
        json!("https://otakudesu.best/anime/spy-x-family/")
    );
    assert_eq!(series[1]["id"], json!("kimetsu-yaiba"));

    // Counters are JSON numbers, not markup strings.
    assert_eq!(body["data"]["pagination"]["totalPages"], json!(24));
    assert_eq!(body["data"]["pagination"]["currentPage"], json!(1));
}

#[tokio::test]
async fn ongoing_rejects_a_malformed_page() {
    let (app, calls) = app_serving(&common::ongoing_page());

    let (status, body) = get_json(&app, "/api/ongoing?page=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("page"));

    let (status, _) = get_json(&app, "/api/ongoing?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn detail_strips_the_title_and_orders_episodes() {
    let (app, _) = app_serving(&common::detail_page());

    let (status, body) = get_json(&app, "/api/anime/spy-x-family").await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["id"], json!("spy-x-family"));
    assert_eq!(data["title"], json!("Spy x Family"));
    assert_eq!(data["image"], json!("https://img.otakudesu.best/spy-detail.jpg"));
    assert_eq!(
        data["synopsis"],
        json!("A spy builds a pretend family for his mission.")
    );
    assert_eq!(data["status"], json!("Ongoing"));
    assert_eq!(data["type"], json!("TV"));
    assert_eq!(data["episode"], json!("12"));
    assert_eq!(data["aired"], json!("Apr 09, 2022"));
    assert_eq!(data["genre"], json!(["Action", "Comedy", "Shounen"]));
    assert_eq!(data["score"], json!("8.61"));

    let episodes = data["episodes"].as_array().unwrap();
    let numbers: Vec<&str> = episodes
        .iter()
        .map(|episode| episode["number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, ["1", "2", "3"], "episodes come back ascending");
    assert_eq!(
        episodes[0]["url"],
        json!("https://otakudesu.best/episode/spy-x-family-episode-1/")
    );
    assert_eq!(episodes[0]["date"], json!("09 April 2022"));
}

#[tokio::test]
async fn stream_resolves_the_embed() {
    let (app, _) = app_serving(&common::episode_page());

    let (status, body) = get_json(
        &app,
        "/api/stream?url=https://otakudesu.best/episode/spy-x-family-episode-1/",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["data"]["streamingUrl"],
        json!("https://desustream.info/beta/stream/?id=abc123")
    );
}

#[tokio::test]
async fn stream_without_a_url_is_rejected() {
    let (app, _) = app_serving(&common::episode_page());

    let (status, body) = get_json(&app, "/api/stream").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"success": false, "error": "url parameter required"})
    );
}

#[tokio::test]
async fn stream_with_a_relative_url_is_rejected() {
    let (app, calls) = app_serving(&common::episode_page());

    let (status, body) = get_json(&app, "/api/stream?url=/episode/ep-1/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["error"],
        json!("invalid url parameter: must be an absolute http(s) address")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exhausted_fetches_surface_as_server_errors() {
    let (app, _) = app_around(StubStrategy::failing(
        StrategyKind::Static,
        FailureKind::Status(403),
        "GET answered 403",
    ));

    let (status, body) = get_json(&app, "/api/ongoing").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("all 1 fetch strategies failed"));
    assert!(message.contains("status 403"));
}

#[tokio::test]
async fn failures_are_not_cached() {
    let (app, calls) = app_around(StubStrategy::failing(
        StrategyKind::Static,
        FailureKind::Transport,
        "connection refused",
    ));

    get_json(&app, "/api/ongoing").await;
    get_json(&app, "/api/ongoing").await;

    assert_eq!(calls.load(Ordering::SeqCst), 2, "each request retries");
}
