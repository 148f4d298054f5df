//! # Skill Auditor
//!
//! Loads a skill corpus and runs every analysis over it.
//!
//! ```text
//! skills/<name>/SKILL.md ──> load_corpus ──> Corpus (sorted by name)
//!                                               │
//!            ┌──────────────────────────────────┼─────────────────────────────┐
//!            ▼                                  ▼                             ▼
//!   DuplicityMatrix (all pairs)      CostEstimate (per doc)      Requirements (per doc)
//!            │                                  │                             │
//!            ▼                                  ▼                             ▼
//!     DuplicityReport                      CostReport            CompatibilityReport
//!            └──────────────────────────────────┴─────────────────────────────┘
//!                                               ▼
//!                                          AuditReport
//! ```
//!
//! An empty corpus is rejected with [`AuditError::EmptyCorpus`] instead of
//! producing undefined averages.
//!
//! ## Example
//!
//! ```rust
//! use skill_auditor::{AuditConfig, Auditor, Corpus};
//!
//! let auditor = Auditor::new(AuditConfig::default()).unwrap();
//! let corpus = Corpus::parse(
//!     auditor.parser(),
//!     [("python-ruff-linter", "---\nname: python-ruff-linter\n---\nLint Python.")],
//! )
//! .unwrap();
//!
//! let report = auditor.audit(&corpus).unwrap();
//! assert_eq!(report.duplicity.average, 100);
//! assert_eq!(report.categories["python-ruff-linter"], "language-specific");
//! ```

mod auditor;
mod category;
mod config;
mod corpus;
mod error;
mod loader;
mod report;

pub use auditor::Auditor;
pub use category::{categorize, default_rules, CategoryRule, MatchKind, FALLBACK_CATEGORY};
pub use config::{AuditConfig, CONFIG_ENV};
pub use corpus::Corpus;
pub use error::{AuditError, Result};
pub use loader::load_corpus;
pub use report::{
    percent, AuditReport, CategoryCost, CompatibilityReport, CostRecord, CostReport, CostSummary,
    DuplicityReport, FlagCount, ProfileSummary,
};
