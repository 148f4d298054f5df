//! # Skill Document
//!
//! Field extraction from skill documents: markdown files carrying a metadata
//! header and a fixed set of named sections.
//!
//! ## Layout of a skill document
//!
//! ```text
//! ---
//! name: python-ruff-linter          ──> metadata (flat key: value list)
//! description: Lint Python code
//! ---
//! ## What I do                      ──> body_overview
//! ...
//! ## When to use me                 ──> usage_conditions
//! ...
//! ## Prerequisites
//! ## Steps                          ──> procedure
//! ...
//! ## Best Practices
//! ```
//!
//! Parsing never fails. A missing header yields empty metadata, a missing
//! section marker yields an empty field, and consumers treat empty text as
//! "no signal".
//!
//! ## Example
//!
//! ```rust
//! use skill_document::{DocumentParser, Field};
//!
//! let parser = DocumentParser::default();
//! let doc = parser.parse_named(
//!     "deploy-app",
//!     "---\nname: deploy-app\ndescription: deploy the app\n---\n## What I do\nDeploys.\n## When to use me\n",
//! );
//!
//! assert_eq!(doc.field(Field::Description), "deploy the app");
//! assert_eq!(doc.field(Field::BodyOverview), "## What I do\nDeploys.\n");
//! ```

mod config;
mod parser;
mod types;

pub use config::{ParserConfig, SectionMarkers};
pub use parser::DocumentParser;
pub use types::{DocumentFields, Field, Metadata, ParsedDocument};
