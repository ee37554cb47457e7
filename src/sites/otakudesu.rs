//! otakudesu catalog service
//!
//! Everything specific to the otakudesu site lives in this file: URL
//! construction, readiness markers, the CSS-selector schemas, and the shape
//! of each operation's payload. When the site changes its markup, this is
//! the only file to touch.

use std::fmt;

use anyhow::{Context, Result};
use scraper::Selector;
use url::Url;

use crate::cache::ResultCache;
use crate::config::ScrapeConfig;
use crate::error::{AllStrategiesFailed, SchemaError};
use crate::extract::{
    derive_record_id, CollectionSchema, ExtractionSchema, FieldSpec, HtmlDocument, Payload,
    Record, Value,
};
use crate::fetch::{FetchChain, FetchRequest};
use crate::pipeline::{Outcome, Pipeline};
use crate::utils::is_valid_url;
use crate::utils::string_utils::leading_int;

/// Markers that signal a page has finished rendering its catalog content.
const ONGOING_READY: &str = ".venz > ul > li";
const SEARCH_READY: &str = ".chivsrc";
const DETAIL_READY: &str = ".fotoanime";

/// Streaming embeds are recognized by their hosting domain.
const STREAM_HOST: &str = "desustream";

/// Typed cache key, one variant per catalog operation.
///
/// Keys carry their operation, so a series id can never collide with a
/// search for the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lookup {
    Ongoing { page: u32 },
    Search { query: String },
    Detail { id: String },
    Stream { url: String },
}

impl Lookup {
    /// The site search is case-insensitive, so equivalent queries share one
    /// cache slot.
    fn search(query: &str) -> Self {
        Lookup::Search {
            query: query.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Ongoing { page } => write!(f, "ongoing page {page}"),
            Lookup::Search { query } => write!(f, "search {query:?}"),
            Lookup::Detail { id } => write!(f, "detail {id}"),
            Lookup::Stream { url } => write!(f, "stream {url}"),
        }
    }
}

/// Every selector the site needs, compiled once at startup.
struct SiteSchemas {
    ongoing: CollectionSchema,
    search: CollectionSchema,
    detail: ExtractionSchema,
    episodes: CollectionSchema,
    frames: Selector,
    page_links: Selector,
    current_page: Selector,
}

fn selector(name: &str, selector: &str) -> Result<Selector, SchemaError> {
    Selector::parse(selector).map_err(|err| SchemaError::Selector {
        field: name.to_string(),
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

impl SiteSchemas {
    fn build() -> Result<Self, SchemaError> {
        let ongoing_item = ExtractionSchema::new(vec![
            FieldSpec::text("title", ".jdlflm")?,
            FieldSpec::attr("image", "img", "src")?.trimmed(),
            FieldSpec::text("episode", ".epz")?,
            FieldSpec::text("day", ".epztipe")?,
            FieldSpec::attr("url", "a", "href")?.trimmed(),
        ])?;

        let search_item = ExtractionSchema::new(vec![
            FieldSpec::text("title", "h2 a")?,
            FieldSpec::attr("image", "img", "src")?.trimmed(),
            FieldSpec::texts("genres", ".set:nth-of-type(1) a")?,
            FieldSpec::text("status", ".set:nth-of-type(2)")?.strip_label("Status :"),
            FieldSpec::text("rating", ".set:nth-of-type(3)")?.strip_label("Rating :"),
            FieldSpec::attr("url", "h2 a", "href")?.trimmed(),
        ])?;

        let detail = ExtractionSchema::new(vec![
            FieldSpec::text("title", ".jdlrx h1")?.strip_label("Subtitle Indonesia"),
            FieldSpec::attr("image", ".fotoanime img", "src")?.trimmed(),
            FieldSpec::text("synopsis", ".sinopc")?,
            FieldSpec::text("status", ".infozingle p:nth-of-type(1)")?.strip_label("Status :"),
            FieldSpec::text("type", ".infozingle p:nth-of-type(2)")?.strip_label("Type :"),
            FieldSpec::text("episode", ".infozingle p:nth-of-type(3)")?
                .strip_label("Total Episode :"),
            FieldSpec::text("aired", ".infozingle p:nth-of-type(4)")?.strip_label("Aired :"),
            FieldSpec::text("genre", ".infozingle p:nth-of-type(5)")?
                .strip_label("Genres :")
                .split(", "),
            FieldSpec::text("score", ".infozingle p:nth-of-type(6)")?.strip_label("Score :"),
        ])?;

        let episode_item = ExtractionSchema::new(vec![
            FieldSpec::text("number", ".leftoff")?.capture(r"(\d+)")?,
            FieldSpec::text("title", ".lefttitle")?,
            FieldSpec::text("date", ".zeebr")?,
            FieldSpec::attr("url", "a", "href")?.trimmed(),
        ])?;

        Ok(Self {
            ongoing: CollectionSchema::new("ongoing", ".venz > ul > li", ongoing_item)?,
            search: CollectionSchema::new("search", ".chivsrc > li", search_item)?,
            detail,
            // The site lists the freshest episode first; readers want 1..N.
            episodes: CollectionSchema::new("episodes", ".episodelist li", episode_item)?
                .source_newest_first(),
            frames: selector("frames", "iframe")?,
            page_links: selector("page_links", ".pagenavix .page-numbers")?,
            current_page: selector("current_page", ".pagenavix .current")?,
        })
    }
}

/// High-level catalog client: builds page URLs, runs the fetch pipeline, and
/// shapes each operation's payload.
pub struct Otakudesu {
    base: Url,
    schemas: SiteSchemas,
    pipeline: Pipeline<Lookup>,
}

impl Otakudesu {
    /// Compile the selector schemas and wire the pipeline.
    ///
    /// Selector and pattern typos surface here, at startup, never mid-request.
    pub fn new(config: &ScrapeConfig, chain: FetchChain) -> Result<Self> {
        anyhow::ensure!(
            is_valid_url(config.base_url()),
            "base URL {:?} is not an http(s) address",
            config.base_url()
        );
        let base = Url::parse(config.base_url())
            .with_context(|| format!("invalid base URL {:?}", config.base_url()))?;
        let schemas = SiteSchemas::build().context("site extraction schema failed to compile")?;

        Ok(Self {
            base,
            schemas,
            pipeline: Pipeline::new(chain, ResultCache::new(config.cache_ttl())),
        })
    }

    /// Currently airing series, one listing page at a time.
    pub async fn ongoing(&self, page: u32) -> Result<Outcome, AllStrategiesFailed> {
        let request =
            FetchRequest::new(self.ongoing_url(page)).with_readiness_selector(ONGOING_READY);
        self.pipeline
            .run(Lookup::Ongoing { page }, request, |doc| {
                self.ongoing_payload(doc)
            })
            .await
    }

    /// Full-site title search.
    pub async fn search(&self, query: &str) -> Result<Outcome, AllStrategiesFailed> {
        let request =
            FetchRequest::new(self.search_url(query)).with_readiness_selector(SEARCH_READY);
        self.pipeline
            .run(Lookup::search(query), request, |doc| {
                self.search_payload(doc)
            })
            .await
    }

    /// Everything on one series page, episodes in ascending order.
    pub async fn detail(&self, id: &str) -> Result<Outcome, AllStrategiesFailed> {
        let request =
            FetchRequest::new(self.detail_url(id)).with_readiness_selector(DETAIL_READY);
        let key = Lookup::Detail { id: id.to_string() };
        self.pipeline
            .run(key, request, |doc| self.detail_payload(doc, id))
            .await
    }

    /// Streaming embed address on an episode page. The payload carries an
    /// empty `streamingUrl` when the page has no recognized player; that is
    /// a valid answer, not a failure.
    pub async fn stream(&self, episode_url: &str) -> Result<Outcome, AllStrategiesFailed> {
        let key = Lookup::Stream {
            url: episode_url.to_string(),
        };
        self.pipeline
            .run(key, FetchRequest::new(episode_url), |doc| {
                self.stream_payload(doc)
            })
            .await
    }

    fn ongoing_payload(&self, doc: &HtmlDocument) -> Payload {
        let mut series = self.schemas.ongoing.extract(doc.root());
        for record in &mut series {
            attach_id(record);
        }

        let mut listing = Record::new();
        listing.push("anime", Value::Records(series));
        listing.push("pagination", Value::Child(self.pagination(doc)));
        Payload::One(listing)
    }

    fn search_payload(&self, doc: &HtmlDocument) -> Payload {
        let mut results = self.schemas.search.extract(doc.root());
        for record in &mut results {
            attach_id(record);
        }
        Payload::Many(results)
    }

    fn detail_payload(&self, doc: &HtmlDocument, id: &str) -> Payload {
        let root = doc.root();
        let mut record = self.schemas.detail.extract(root);
        record.prepend("id", Value::Text(id.to_string()));
        record.push(
            "episodes",
            Value::Records(self.schemas.episodes.extract(root)),
        );
        Payload::One(record)
    }

    fn stream_payload(&self, doc: &HtmlDocument) -> Payload {
        let streaming_url = doc
            .root()
            .select_all(&self.schemas.frames)
            .iter()
            .filter_map(|frame| frame.attr("src"))
            .find(|src| src.contains(STREAM_HOST))
            .unwrap_or_default();

        let mut record = Record::new();
        record.push("streamingUrl", Value::Text(streaming_url.to_string()));
        Payload::One(record)
    }

    /// The page navigation renders `[prev, 1, 2, .., N, next]`; the page
    /// count sits second from the end. Both counters default to 1.
    fn pagination(&self, doc: &HtmlDocument) -> Record {
        let root = doc.root();
        let links = root.select_all(&self.schemas.page_links);
        let total = links
            .len()
            .checked_sub(2)
            .and_then(|index| links.get(index))
            .and_then(|node| leading_int(&node.text()))
            .unwrap_or(1);
        let current = root
            .select_first(&self.schemas.current_page)
            .and_then(|node| leading_int(&node.text()))
            .unwrap_or(1);

        let mut pagination = Record::new();
        pagination.push("totalPages", Value::Number(total));
        pagination.push("currentPage", Value::Number(current));
        pagination
    }

    fn ongoing_url(&self, page: u32) -> String {
        if page > 1 {
            self.page_url(&["ongoing-anime", "page", &page.to_string()])
        } else {
            self.page_url(&["ongoing-anime"])
        }
    }

    fn search_url(&self, query: &str) -> String {
        let mut url = self.base.clone();
        url.set_path("/");
        url.query_pairs_mut()
            .append_pair("s", query)
            .append_pair("post_type", "anime");
        url.to_string()
    }

    fn detail_url(&self, id: &str) -> String {
        self.page_url(&["anime", id])
    }

    fn page_url(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        {
            // The base is validated as http(s), which always has a path.
            let mut path = url
                .path_segments_mut()
                .expect("http(s) URL has path segments");
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
            // The site 301s to the trailing-slash form; skip the hop.
            path.push("");
        }
        url.to_string()
    }
}

/// Prepend the derived `id`, so every record leads with it.
fn attach_id(record: &mut Record) {
    let id = derive_record_id(
        record.text("url").unwrap_or_default(),
        record.text("title").unwrap_or_default(),
    );
    record.prepend("id", Value::Text(id));
}
