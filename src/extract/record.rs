//! Extracted data model
//!
//! A [`Record`] keeps its fields in insertion order and serializes them that
//! way, so API responses read in the order the schema declared, not
//! alphabetically.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One extracted field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single piece of text (possibly empty when the source had no match)
    Text(String),
    /// A derived counter such as a page total
    Number(u64),
    /// Repeated text, e.g. a genre list
    List(Vec<String>),
    /// Nested records, e.g. the episodes of a series
    Records(Vec<Record>),
    /// A single nested record, e.g. a pagination block
    Child(Record),
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Number(n) => serializer.serialize_u64(*n),
            Value::List(items) => items.serialize(serializer),
            Value::Records(records) => records.serialize(serializer),
            Value::Child(record) => record.serialize(serializer),
        }
    }
}

/// Ordered set of named fields for one extracted entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Later pushes with the same name are kept as-is;
    /// schemas never declare duplicate names.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// Insert a field at the front, used for derived identifiers.
    pub fn prepend(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(0, (name.into(), value));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Text content of a field, when it is a text field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// What one catalog operation produces: a single record or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    One(Record),
    Many(Vec<Record>),
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Payload::One(record) => record.serialize(serializer),
            Payload::Many(records) => records.serialize(serializer),
        }
    }
}
