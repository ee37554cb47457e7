//! Thin adapter over `scraper` for schema-driven extraction
//!
//! Schemas only need scoped selection, text, and attributes, so that is the
//! whole surface. `scraper::Html` is not `Send`; documents are parsed,
//! consumed, and dropped without crossing an await point.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The document root, the starting scope for extraction.
    #[must_use]
    pub fn root(&self) -> DomNode<'_> {
        DomNode {
            element: self.html.root_element(),
        }
    }
}

/// One matched element, scoped for further selection.
#[derive(Clone, Copy)]
pub struct DomNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> DomNode<'a> {
    /// First descendant matching the selector.
    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<DomNode<'a>> {
        self.element
            .select(selector)
            .next()
            .map(|element| DomNode { element })
    }

    /// Every descendant matching the selector, in document order.
    #[must_use]
    pub fn select_all(&self, selector: &Selector) -> Vec<DomNode<'a>> {
        self.element
            .select(selector)
            .map(|element| DomNode { element })
            .collect()
    }

    /// Visible text with whitespace runs collapsed to single spaces.
    ///
    /// Listing markup is indentation-heavy; collapsing here means label
    /// stripping and captures never have to reason about newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Raw attribute value, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }
}
