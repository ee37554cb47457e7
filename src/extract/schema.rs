//! Declarative extraction schemas
//!
//! A schema names the fields of one entity and says where each lives: a CSS
//! selector, text or an attribute, one match or all of them, plus a pipeline
//! of pure text transforms. Selectors and patterns are validated when the
//! schema is built; extraction itself never fails, it degrades to empty
//! values so one missing node cannot poison a whole page.

use regex::Regex;
use scraper::Selector;

use crate::error::SchemaError;
use crate::extract::document::DomNode;
use crate::extract::record::{Record, Value};
use crate::utils::string_utils::strip_label;

/// Pure text transform applied after a field is located.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Trim surrounding whitespace
    Trim,
    /// Drop a literal label such as `"Status :"` and keep the value
    StripLabel(String),
    /// Split into a list on a delimiter, trimming and dropping empty parts
    Split(String),
    /// Keep the first capture group; empty string when the pattern misses
    Capture(Regex),
}

impl Transform {
    fn apply(&self, value: Extracted) -> Extracted {
        match self {
            Transform::Split(delimiter) => match value {
                Extracted::One(text) => Extracted::Many(split_list(&text, delimiter)),
                // Rejected when the schema is built; pass through untouched.
                Extracted::Many(items) => Extracted::Many(items),
            },
            Transform::Trim => map_text(value, |text| text.trim().to_string()),
            Transform::StripLabel(label) => map_text(value, |text| strip_label(text, label)),
            Transform::Capture(pattern) => map_text(value, |text| first_capture(pattern, text)),
        }
    }
}

/// Scalar transforms map element-wise over repeated selections.
enum Extracted {
    One(String),
    Many(Vec<String>),
}

fn map_text(value: Extracted, f: impl Fn(&str) -> String) -> Extracted {
    match value {
        Extracted::One(text) => Extracted::One(f(&text)),
        Extracted::Many(items) => Extracted::Many(items.iter().map(|text| f(text)).collect()),
    }
}

fn split_list(text: &str, delimiter: &str) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn first_capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().to_string())
        .unwrap_or_default()
}

fn parse_selector(field: &str, selector: &str) -> Result<Selector, SchemaError> {
    Selector::parse(selector).map_err(|err| SchemaError::Selector {
        field: field.to_string(),
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

/// Where one named field lives and how its raw text becomes a value.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    selector: Selector,
    attr: Option<String>,
    many: bool,
    transforms: Vec<Transform>,
}

impl FieldSpec {
    /// Text of the first element matching `selector`.
    pub fn text(name: &str, selector: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            name: name.to_string(),
            selector: parse_selector(name, selector)?,
            attr: None,
            many: false,
            transforms: Vec::new(),
        })
    }

    /// Text of every element matching `selector`, as a list.
    pub fn texts(name: &str, selector: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            many: true,
            ..Self::text(name, selector)?
        })
    }

    /// An attribute of the first element matching `selector`.
    pub fn attr(name: &str, selector: &str, attr: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            attr: Some(attr.to_string()),
            ..Self::text(name, selector)?
        })
    }

    #[must_use]
    pub fn trimmed(mut self) -> Self {
        self.transforms.push(Transform::Trim);
        self
    }

    #[must_use]
    pub fn strip_label(mut self, label: &str) -> Self {
        self.transforms.push(Transform::StripLabel(label.to_string()));
        self
    }

    #[must_use]
    pub fn split(mut self, delimiter: &str) -> Self {
        self.transforms.push(Transform::Split(delimiter.to_string()));
        self
    }

    pub fn capture(mut self, pattern: &str) -> Result<Self, SchemaError> {
        let compiled = Regex::new(pattern).map_err(|source| SchemaError::Pattern {
            field: self.name.clone(),
            source,
        })?;
        self.transforms.push(Transform::Capture(compiled));
        Ok(self)
    }

    fn splits(&self) -> bool {
        self.transforms
            .iter()
            .any(|transform| matches!(transform, Transform::Split(_)))
    }

    fn extract(&self, scope: DomNode<'_>) -> Value {
        let located = if self.many {
            Extracted::Many(
                scope
                    .select_all(&self.selector)
                    .iter()
                    .map(|node| self.raw_value(node))
                    .collect(),
            )
        } else {
            match scope.select_first(&self.selector) {
                Some(node) => Extracted::One(self.raw_value(&node)),
                None => Extracted::One(String::new()),
            }
        };

        let transformed = self
            .transforms
            .iter()
            .fold(located, |value, transform| transform.apply(value));

        match transformed {
            Extracted::One(text) => Value::Text(text),
            Extracted::Many(items) => Value::List(items),
        }
    }

    fn raw_value(&self, node: &DomNode<'_>) -> String {
        match &self.attr {
            Some(attr) => node.attr(attr).unwrap_or_default().to_string(),
            None => node.text(),
        }
    }
}

/// Ordered fields of one entity.
#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    fields: Vec<FieldSpec>,
}

impl ExtractionSchema {
    /// Validates the field set: a field cannot both select many elements and
    /// split its text into a list, the result shape would be ambiguous.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        for field in &fields {
            if field.many && field.splits() {
                return Err(SchemaError::SplitOnList {
                    field: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Extract every field from `scope` into a record, in declaration order.
    #[must_use]
    pub fn extract(&self, scope: DomNode<'_>) -> Record {
        let mut record = Record::new();
        for field in &self.fields {
            record.push(field.name.clone(), field.extract(scope));
        }
        record
    }
}

/// A repeated entity: a container selector plus the schema of each item.
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    container: Selector,
    item: ExtractionSchema,
    newest_first: bool,
}

impl CollectionSchema {
    pub fn new(name: &str, container: &str, item: ExtractionSchema) -> Result<Self, SchemaError> {
        Ok(Self {
            container: parse_selector(name, container)?,
            item,
            newest_first: false,
        })
    }

    /// Mark the source as listing newest entries first; extraction reverses
    /// the items so callers always see ascending order.
    #[must_use]
    pub fn source_newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    #[must_use]
    pub fn extract(&self, scope: DomNode<'_>) -> Vec<Record> {
        let mut records: Vec<Record> = scope
            .select_all(&self.container)
            .into_iter()
            .map(|node| self.item.extract(node))
            .collect();
        if self.newest_first {
            records.reverse();
        }
        records
    }
}
