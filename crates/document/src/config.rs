use serde::{Deserialize, Serialize};

/// Configuration for document field extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Line marker that opens and closes the metadata header
    pub header_marker: String,

    /// Metadata key holding the document's declared name
    pub name_key: String,

    /// Metadata key holding the document's description
    pub description_key: String,

    /// Start/end markers for the body_overview field
    pub body_overview: SectionMarkers,

    /// Start/end markers for the usage_conditions field
    pub usage_conditions: SectionMarkers,

    /// Start/end markers for the procedure field
    pub procedure: SectionMarkers,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            header_marker: "---".to_string(),
            name_key: "name".to_string(),
            description_key: "description".to_string(),
            body_overview: SectionMarkers::new("## What I do", "## When to use me"),
            usage_conditions: SectionMarkers::new("## When to use me", "## Prerequisites"),
            procedure: SectionMarkers::new("## Steps", "## Best Practices"),
        }
    }
}

impl ParserConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.header_marker.is_empty() {
            return Err("header_marker must not be empty".to_string());
        }
        if self.name_key.trim().is_empty() || self.description_key.trim().is_empty() {
            return Err("metadata keys must not be empty".to_string());
        }

        for (label, markers) in [
            ("body_overview", &self.body_overview),
            ("usage_conditions", &self.usage_conditions),
            ("procedure", &self.procedure),
        ] {
            if markers.start.is_empty() || markers.end.is_empty() {
                return Err(format!("{label}: section markers must not be empty"));
            }
        }

        Ok(())
    }
}

/// A pair of markers delimiting a named section.
///
/// The extracted text includes the start marker and stops right before the
/// end marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionMarkers {
    pub start: String,
    pub end: String,
}

impl SectionMarkers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}
