//! # Skill Similarity
//!
//! Weighted lexical similarity between parsed skill documents.
//!
//! ```text
//! doc A ─┐                       per field:
//!        ├──> for (field, w) in weights ──> ratio(lower(a), lower(b)) * w
//! doc B ─┘                                        │
//!                                                 └──> Σ * 100, truncated ──> 0..=100
//! ```
//!
//! The ratio is the gestalt pattern-matching ratio `2*M / T`. Building a
//! [`DuplicityMatrix`] compares every pair once, which is quadratic in corpus
//! size and, per comparison, up to `len(a) * len(b)` in field length. That is
//! fine for corpora in the low hundreds of documents and is the scaling limit
//! of this crate.

mod engine;
mod error;
mod matcher;
mod matrix;
mod weights;

pub use engine::SimilarityEngine;
pub use error::{Result, SimilarityError};
pub use matcher::{ratio, MatchingBlock, SequenceMatcher};
pub use matrix::{DuplicatePair, DuplicityMatrix, DuplicityThresholds, MostDuplicated, PairTier};
pub use weights::SimilarityWeights;
