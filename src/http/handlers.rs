//! Endpoint handlers
//!
//! Thin translations from query and path parameters into catalog calls. All
//! data shaping happens in the site service; handlers only validate input,
//! log the answer, and wrap outcomes in the response envelope.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json};
use serde::Serialize;
use tracing::info;

use crate::extract::Payload;
use crate::http::error::{ApiError, Envelope};
use crate::sites::Otakudesu;
use crate::utils::is_valid_url;

#[derive(Serialize)]
struct ApiIndex {
    name: &'static str,
    endpoints: [&'static str; 4],
}

/// `GET /` lists what the service offers.
pub async fn index() -> impl IntoResponse {
    Json(Envelope::bare(ApiIndex {
        name: "otakuscrape",
        endpoints: [
            "/api/ongoing?page=2",
            "/api/search?q=naruto",
            "/api/anime/{id}",
            "/api/stream?url={episode-url}",
        ],
    }))
}

/// `GET /api/ongoing?page=N` lists currently airing series.
///
/// `page` is optional and defaults to the first listing page.
pub async fn ongoing(
    State(catalog): State<Arc<Otakudesu>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Payload>>, ApiError> {
    let page = match params.get("page") {
        None => 1,
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| ApiError::InvalidParam {
                name: "page",
                reason: format!("{raw:?} is not a positive number"),
            })?,
    };

    let outcome = catalog.ongoing(page).await?;
    info!("Ongoing page {page} answered from {}", outcome.source);
    Ok(Json(Envelope::success(outcome.source, outcome.payload)))
}

/// `GET /api/search?q=...` searches the whole catalog by title.
pub async fn search(
    State(catalog): State<Arc<Otakudesu>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Payload>>, ApiError> {
    let query = params
        .get("q")
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .ok_or(ApiError::MissingParam("Query"))?;

    let outcome = catalog.search(query).await?;
    info!("Search {query:?} answered from {}", outcome.source);
    Ok(Json(Envelope::success(outcome.source, outcome.payload)))
}

/// `GET /api/anime/:id` returns one series page, episodes included.
pub async fn anime_detail(
    State(catalog): State<Arc<Otakudesu>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Payload>>, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::MissingParam("id"));
    }

    let outcome = catalog.detail(id).await?;
    info!("Detail {id} answered from {}", outcome.source);
    Ok(Json(Envelope::success(outcome.source, outcome.payload)))
}

/// `GET /api/stream?url=...` resolves the streaming embed on an episode page.
pub async fn stream(
    State(catalog): State<Arc<Otakudesu>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Payload>>, ApiError> {
    let url = params
        .get("url")
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingParam("url"))?;

    if !is_valid_url(url) {
        return Err(ApiError::InvalidParam {
            name: "url",
            reason: "must be an absolute http(s) address".to_string(),
        });
    }

    let outcome = catalog.stream(url).await?;
    info!("Stream lookup answered from {}", outcome.source);
    Ok(Json(Envelope::success(outcome.source, outcome.payload)))
}
