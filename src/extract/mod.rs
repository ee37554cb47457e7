//! Schema-driven extraction of typed records from fetched HTML
//!
//! The flow is: parse a page into an [`HtmlDocument`], point an
//! [`ExtractionSchema`] or [`CollectionSchema`] at it, get back ordered
//! [`Record`]s ready for serialization. Schemas are built once at startup and
//! shared; extraction is pure and never fails.

pub mod document;
pub mod record;
pub mod schema;

pub use document::{DomNode, HtmlDocument};
pub use record::{Payload, Record, Value};
pub use schema::{CollectionSchema, ExtractionSchema, FieldSpec, Transform};

use url::Url;

use crate::utils::string_utils::slugify;

/// Derive a stable identifier for a record from its detail-page URL, falling
/// back to a slug of the title when the URL has no usable path segment.
///
/// `https://example.com/anime/my-show-title/` yields `my-show-title`; a
/// record with no URL but a title of `"My Show!"` yields `my-show`.
#[must_use]
pub fn derive_record_id(url: &str, title: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative hrefs are already a path.
        Err(_) => url.to_string(),
    };

    let segment = path
        .split('/')
        .filter(|part| !part.is_empty())
        .next_back()
        .unwrap_or_default();

    if segment.is_empty() {
        slugify(title)
    } else {
        segment.to_string()
    }
}
