use crate::config::{ParserConfig, SectionMarkers};
use crate::types::{DocumentFields, Metadata, ParsedDocument};

/// Name given to documents that declare none and are parsed without one
const UNNAMED: &str = "unnamed";

/// Extracts metadata and named fields from raw skill documents.
///
/// Pure over its input: parsing the same text twice yields identical documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    config: ParserConfig,
}

impl DocumentParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a document whose identity is supplied by the caller
    /// (usually the directory it was loaded from).
    pub fn parse_named(&self, name: impl Into<String>, text: &str) -> ParsedDocument {
        self.build(name.into(), text)
    }

    /// Parse a document, taking its identity from the declared `name` metadata.
    pub fn parse(&self, text: &str) -> ParsedDocument {
        let (metadata, _) = self.split_header(text);
        let name = metadata
            .get(&self.config.name_key)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED)
            .to_string();
        self.build(name, text)
    }

    fn build(&self, name: String, text: &str) -> ParsedDocument {
        let (metadata, body) = self.split_header(text);

        let fields = DocumentFields {
            name: metadata
                .get(&self.config.name_key)
                .unwrap_or_default()
                .to_string(),
            description: metadata
                .get(&self.config.description_key)
                .unwrap_or_default()
                .to_string(),
            body_overview: extract_section(body, &self.config.body_overview).to_string(),
            usage_conditions: extract_section(body, &self.config.usage_conditions).to_string(),
            procedure: extract_section(body, &self.config.procedure).to_string(),
        };

        log::debug!(
            "Parsed document {name}: {} metadata keys, {} chars",
            metadata.len(),
            text.chars().count()
        );

        ParsedDocument::new(
            name,
            metadata,
            fields,
            body.to_string(),
            text.chars().count(),
        )
    }

    /// Split the header block from the body.
    ///
    /// A header exists only when the text starts with the marker and the
    /// marker occurs again later; otherwise the whole text is body.
    fn split_header<'a>(&self, text: &'a str) -> (Metadata, &'a str) {
        let marker = self.config.header_marker.as_str();
        let Some(rest) = text.strip_prefix(marker) else {
            return (Metadata::new(), text);
        };
        let Some(close) = rest.find(marker) else {
            return (Metadata::new(), text);
        };

        let header = &rest[..close];
        let body = &rest[close + marker.len()..];
        (parse_header(header), body)
    }
}

/// Flat `key: value` parser. Lines without a colon are ignored; values may
/// contain further colons.
fn parse_header(header: &str) -> Metadata {
    let mut metadata = Metadata::new();
    for line in header.trim().split('\n') {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        metadata.insert(key.trim(), value.trim());
    }
    metadata
}

/// Text from the start marker up to (not including) the end marker.
/// Both markers are searched from the beginning of the body.
fn extract_section<'a>(body: &'a str, markers: &SectionMarkers) -> &'a str {
    let (Some(start), Some(end)) = (body.find(&markers.start), body.find(&markers.end)) else {
        return "";
    };
    if end < start {
        return "";
    }
    &body[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SKILL: &str = "---
name: python-ruff-linter
description: Lint Python code with ruff: fast and strict
license: MIT
---
## What I do
Run ruff over the project.

## When to use me
Before committing Python changes.

## Prerequisites
ruff installed.

## Steps
1. Run `ruff check .`

## Best Practices
Keep the config in pyproject.toml.
";

    #[test]
    fn extracts_metadata_and_sections() {
        let doc = DocumentParser::default().parse_named("python-ruff-linter", SKILL);

        assert_eq!(doc.name(), "python-ruff-linter");
        assert_eq!(doc.metadata().get("license"), Some("MIT"));
        assert_eq!(doc.field(Field::Name), "python-ruff-linter");
        assert_eq!(
            doc.field(Field::Description),
            "Lint Python code with ruff: fast and strict"
        );
        assert_eq!(
            doc.field(Field::BodyOverview),
            "## What I do\nRun ruff over the project.\n\n"
        );
        assert_eq!(
            doc.field(Field::UsageConditions),
            "## When to use me\nBefore committing Python changes.\n\n"
        );
        assert_eq!(doc.field(Field::Procedure), "## Steps\n1. Run `ruff check .`\n\n");
        assert!(doc.raw_body().starts_with("\n## What I do"));
        assert_eq!(doc.size(), SKILL.chars().count());
    }

    #[test]
    fn missing_header_treats_everything_as_body() {
        let text = "## What I do\nthings\n## When to use me\nalways\n";
        let doc = DocumentParser::default().parse_named("plain", text);

        assert!(doc.metadata().is_empty());
        assert_eq!(doc.field(Field::Name), "");
        assert_eq!(doc.raw_body(), text);
        assert_eq!(doc.field(Field::BodyOverview), "## What I do\nthings\n");
    }

    #[test]
    fn unterminated_header_degrades_to_no_metadata() {
        let text = "---\nname: broken\n## What I do\n";
        let doc = DocumentParser::default().parse_named("broken", text);

        assert!(doc.metadata().is_empty());
        assert_eq!(doc.raw_body(), text);
    }

    #[test]
    fn missing_end_marker_yields_empty_field() {
        let text = "---\nname: x\n---\n## Steps\ndo it\n";
        let doc = DocumentParser::default().parse_named("x", text);
        assert_eq!(doc.field(Field::Procedure), "");
        assert_eq!(doc.field(Field::BodyOverview), "");
    }

    #[test]
    fn end_marker_before_start_marker_yields_empty_field() {
        let text = "## Best Practices\nfirst\n## Steps\nlater\n";
        let doc = DocumentParser::default().parse_named("x", text);
        assert_eq!(doc.field(Field::Procedure), "");
    }

    #[test]
    fn duplicate_metadata_keys_last_wins() {
        let text = "---\nname: first\nname: second\n---\nbody";
        let doc = DocumentParser::default().parse_named("dup", text);
        assert_eq!(doc.metadata().get("name"), Some("second"));
        assert_eq!(doc.field(Field::Name), "second");
    }

    #[test]
    fn parse_takes_identity_from_declared_name() {
        let parser = DocumentParser::default();
        assert_eq!(parser.parse(SKILL).name(), "python-ruff-linter");
        assert_eq!(parser.parse("no header").name(), "unnamed");
    }

    #[test]
    fn size_counts_characters_not_bytes() {
        let doc = DocumentParser::default().parse_named("utf8", "é✓");
        assert_eq!(doc.size(), 2);
    }

    #[test]
    fn counts_paired_code_fences() {
        let text = "```bash\nls\n```\n\n```python\nprint()\n```\n```";
        let doc = DocumentParser::default().parse_named("code", text);
        assert_eq!(doc.code_block_count(), 2);
    }

    proptest! {
        #[test]
        fn proptest_parsing_is_idempotent(text in "(---\n)?([a-z]{1,6}: [a-z ]{0,8}\n){0,3}(---\n)?(## (What I do|Steps|Best Practices)\n[a-z ]{0,12}\n){0,4}") {
            let parser = DocumentParser::default();
            let first = parser.parse_named("doc", &text);
            let second = parser.parse_named("doc", &text);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn proptest_parser_never_panics_on_arbitrary_text(text in "\\PC{0,200}") {
            let doc = DocumentParser::default().parse_named("any", &text);
            prop_assert_eq!(doc.size(), text.chars().count());
        }
    }
}
