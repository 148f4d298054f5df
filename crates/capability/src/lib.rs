//! # Skill Capability
//!
//! Which restricted execution profiles may load a skill document.
//!
//! ```text
//! raw body ──> CapabilityClassifier ──> Requirements
//!                (substring cues)           │
//!                                           ├──> is_compatible(profile) ──> bool
//! profiles/*.json ──> ProfileRegistry ──────┘
//! ```
//!
//! Detection is lexical and over-inclusive: a cue that appears anywhere in
//! the body raises its requirement, even inside unrelated prose.

mod classifier;
mod error;
mod profile;
mod resolver;

pub use classifier::{
    CapabilityClassifier, CaseMatching, Cue, RequirementFlag, Requirements, DEFAULT_INTEGRATIONS,
};
pub use error::{CapabilityError, Result};
pub use profile::{Access, CapabilityProfile, ProfileRegistry, PROFILE_SCHEMA_VERSION};
pub use resolver::{flag_counts, is_compatible, CompatibilityMatrix};
