use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One comparable text unit extracted from a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Declared `name` metadata value
    Name,

    /// Declared `description` metadata value
    Description,

    /// "What I do" section
    #[serde(alias = "what_i_do")]
    BodyOverview,

    /// "When to use me" section
    #[serde(alias = "when_to_use")]
    UsageConditions,

    /// "Steps" section
    #[serde(alias = "steps")]
    Procedure,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Description,
        Field::BodyOverview,
        Field::UsageConditions,
        Field::Procedure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::BodyOverview => "body_overview",
            Field::UsageConditions => "usage_conditions",
            Field::Procedure => "procedure",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Field::Name),
            "description" => Ok(Field::Description),
            "body_overview" | "what_i_do" => Ok(Field::BodyOverview),
            "usage_conditions" | "when_to_use" => Ok(Field::UsageConditions),
            "procedure" | "steps" => Ok(Field::Procedure),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// Ordered header metadata.
///
/// Keys keep the position of their first appearance; a repeated key replaces
/// the earlier value (last one wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, overwriting any earlier value for the same key.
    /// Returns the replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The five extracted text fields of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentFields {
    pub name: String,
    pub description: String,
    pub body_overview: String,
    pub usage_conditions: String,
    pub procedure: String,
}

impl DocumentFields {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::BodyOverview => &self.body_overview,
            Field::UsageConditions => &self.usage_conditions,
            Field::Procedure => &self.procedure,
        }
    }
}

/// A parsed skill document. Immutable once built by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    /// Unique identity inside a corpus
    name: String,

    /// Header key/value pairs
    metadata: Metadata,

    /// Extracted comparable fields
    fields: DocumentFields,

    /// Full text after the header block
    raw_body: String,

    /// Character count of the whole original document
    size: usize,
}

impl ParsedDocument {
    pub(crate) fn new(
        name: String,
        metadata: Metadata,
        fields: DocumentFields,
        raw_body: String,
        size: usize,
    ) -> Self {
        Self {
            name,
            metadata,
            fields,
            raw_body,
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of fenced code regions in the body (paired fences, halved)
    #[must_use]
    pub fn code_block_count(&self) -> usize {
        self.raw_body.matches("```").count() / 2
    }
}
