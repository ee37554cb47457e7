//! Request pipeline
//!
//! Every catalog operation runs the same five steps: check the cache, walk
//! the fetch chain, extract records from the captured HTML, store the result,
//! done. Only successful extractions are stored, so a failed fetch never
//! shadows the next attempt with a cached error.

use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::cache::ResultCache;
use crate::error::AllStrategiesFailed;
use crate::extract::{HtmlDocument, Payload};
use crate::fetch::{FetchChain, FetchRequest};

/// Where the payload of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Served from the TTL cache without touching the network
    Cache,
    /// Fetched and extracted for this request
    Live,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Cache => write!(f, "cache"),
            DataSource::Live => write!(f, "live"),
        }
    }
}

/// A successful pipeline run: the extracted payload plus its provenance.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub payload: Payload,
    pub source: DataSource,
}

/// Cache-fronted fetch-and-extract executor, shared by all operations.
pub struct Pipeline<K: Eq + Hash> {
    chain: FetchChain,
    cache: ResultCache<K, Payload>,
}

impl<K: Eq + Hash + Clone> Pipeline<K> {
    #[must_use]
    pub fn new(chain: FetchChain, cache: ResultCache<K, Payload>) -> Self {
        Self { chain, cache }
    }

    /// Run one operation end to end.
    ///
    /// `extract` receives the parsed document and distills it into a payload.
    /// It runs synchronously between the fetch and the store; the parsed DOM
    /// never crosses an await point (it is not `Send`).
    pub async fn run(
        &self,
        key: K,
        request: FetchRequest,
        extract: impl FnOnce(&HtmlDocument) -> Payload,
    ) -> Result<Outcome, AllStrategiesFailed> {
        if let Some(payload) = self.cache.get(&key) {
            debug!("Serving {} from cache", request.url);
            return Ok(Outcome {
                payload,
                source: DataSource::Cache,
            });
        }

        let fetched = self.chain.fetch(&request).await?;

        let payload = {
            let document = HtmlDocument::parse(&fetched.html);
            extract(&document)
        };

        debug!(
            "Caching {} result extracted from {}",
            fetched.strategy, fetched.final_url
        );
        self.cache.insert(key, payload.clone());

        Ok(Outcome {
            payload,
            source: DataSource::Live,
        })
    }

    /// Direct cache access, used by tests and cache introspection.
    #[must_use]
    pub fn cache(&self) -> &ResultCache<K, Payload> {
        &self.cache
    }
}
