use crate::engine::SimilarityEngine;
use crate::error::{Result, SimilarityError};
use serde::{Deserialize, Serialize};
use skill_document::ParsedDocument;
use std::collections::BTreeMap;

/// Self-similarity by convention, never computed
pub const IDENTITY_SCORE: u32 = 100;

/// Score cut-offs used to classify document pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DuplicityThresholds {
    /// Pairs at or above this score are high duplicity
    pub high: u32,

    /// Pairs at or above this score (and below `high`) are moderate
    pub moderate: u32,

    /// High pairs at or above this score are merge candidates
    pub merge: u32,

    /// High pairs at or above this score (and below `merge`) are
    /// consolidation candidates
    pub consolidation: u32,
}

impl Default for DuplicityThresholds {
    fn default() -> Self {
        Self {
            high: 70,
            moderate: 50,
            merge: 86,
            consolidation: 71,
        }
    }
}

impl DuplicityThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.moderate > self.high {
            return Err(SimilarityError::InvalidThresholds(format!(
                "moderate ({}) cannot exceed high ({})",
                self.moderate, self.high
            )));
        }
        if self.consolidation > self.merge {
            return Err(SimilarityError::InvalidThresholds(format!(
                "consolidation ({}) cannot exceed merge ({})",
                self.consolidation, self.merge
            )));
        }
        if self.high > IDENTITY_SCORE || self.merge > IDENTITY_SCORE {
            return Err(SimilarityError::InvalidThresholds(
                "thresholds must be within 0..=100".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn tier(&self, score: u32) -> PairTier {
        if score >= self.high {
            PairTier::High
        } else if score >= self.moderate {
            PairTier::Moderate
        } else {
            PairTier::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairTier {
    High,
    Moderate,
    Low,
}

/// One unordered document pair with its score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    pub first: String,
    pub second: String,
    pub score: u32,
    pub tier: PairTier,
}

/// A document ranked by how many high-duplicity pairs it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostDuplicated {
    pub name: String,
    pub high_pairs: usize,
    pub max_score: u32,
}

/// Square score table keyed by document name.
///
/// The diagonal is always [`IDENTITY_SCORE`]; off-diagonal entries come from
/// [`SimilarityEngine::score`], which is order-independent, so the table is
/// symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicityMatrix {
    scores: BTreeMap<String, BTreeMap<String, u32>>,
}

impl DuplicityMatrix {
    /// Score every pair of `documents`. Each unordered pair is computed once.
    ///
    /// Names key the rows, so a name seen twice is rejected.
    pub fn build<'a>(
        engine: &SimilarityEngine,
        documents: impl IntoIterator<Item = &'a ParsedDocument>,
    ) -> Result<Self> {
        let mut docs: Vec<&ParsedDocument> = documents.into_iter().collect();
        docs.sort_by(|a, b| a.name().cmp(b.name()));
        if let Some(pair) = docs.windows(2).find(|pair| pair[0].name() == pair[1].name()) {
            return Err(SimilarityError::DuplicateDocument(pair[0].name().to_string()));
        }

        let mut scores: BTreeMap<String, BTreeMap<String, u32>> = docs
            .iter()
            .map(|doc| (doc.name().to_string(), BTreeMap::new()))
            .collect();

        for (i, left) in docs.iter().enumerate() {
            if let Some(row) = scores.get_mut(left.name()) {
                row.insert(left.name().to_string(), IDENTITY_SCORE);
            }
            for right in &docs[i + 1..] {
                let score = engine.score(left, right);
                log::debug!("duplicity {} ~ {} = {score}", left.name(), right.name());
                if let Some(row) = scores.get_mut(left.name()) {
                    row.insert(right.name().to_string(), score);
                }
                if let Some(row) = scores.get_mut(right.name()) {
                    row.insert(left.name().to_string(), score);
                }
            }
        }

        Ok(Self { scores })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Document names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    #[must_use]
    pub fn score(&self, first: &str, second: &str) -> Option<u32> {
        self.scores.get(first)?.get(second).copied()
    }

    /// Full row for one document
    pub fn row(&self, name: &str) -> Option<&BTreeMap<String, u32>> {
        self.scores.get(name)
    }

    /// Mean over all ordered pairs including the diagonal, truncated.
    /// `None` for an empty matrix.
    #[must_use]
    pub fn average(&self) -> Option<u32> {
        let cells = self.scores.len() * self.scores.len();
        if cells == 0 {
            return None;
        }
        let total: u64 = self
            .scores
            .values()
            .flat_map(|row| row.values())
            .map(|score| u64::from(*score))
            .sum();
        u32::try_from(total / cells as u64).ok()
    }

    /// Every unordered pair (first < second), in name order
    pub fn pairs(&self, thresholds: &DuplicityThresholds) -> Vec<DuplicatePair> {
        let names: Vec<&String> = self.scores.keys().collect();
        let mut pairs = Vec::new();
        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                let score = self.score(first, second).unwrap_or(0);
                pairs.push(DuplicatePair {
                    first: (*first).clone(),
                    second: (*second).clone(),
                    score,
                    tier: thresholds.tier(score),
                });
            }
        }
        pairs
    }

    /// Pairs of one tier, highest score first (name order among equals)
    pub fn pairs_in_tier(&self, thresholds: &DuplicityThresholds, tier: PairTier) -> Vec<DuplicatePair> {
        let mut pairs: Vec<_> = self
            .pairs(thresholds)
            .into_iter()
            .filter(|pair| pair.tier == tier)
            .collect();
        pairs.sort_by(|a, b| b.score.cmp(&a.score));
        pairs
    }

    /// High pairs scoring at least `merge`
    pub fn merge_candidates(&self, thresholds: &DuplicityThresholds) -> Vec<DuplicatePair> {
        self.pairs_in_tier(thresholds, PairTier::High)
            .into_iter()
            .filter(|pair| pair.score >= thresholds.merge)
            .collect()
    }

    /// High pairs scoring in `consolidation..merge`
    pub fn consolidation_candidates(&self, thresholds: &DuplicityThresholds) -> Vec<DuplicatePair> {
        self.pairs_in_tier(thresholds, PairTier::High)
            .into_iter()
            .filter(|pair| pair.score >= thresholds.consolidation && pair.score < thresholds.merge)
            .collect()
    }

    /// Highest score against any other document
    #[must_use]
    pub fn max_off_diagonal(&self, name: &str) -> Option<u32> {
        self.scores
            .get(name)?
            .iter()
            .filter(|(other, _)| other.as_str() != name)
            .map(|(_, score)| *score)
            .max()
    }

    /// Documents appearing in the most high-duplicity pairs
    pub fn most_duplicated(&self, thresholds: &DuplicityThresholds, limit: usize) -> Vec<MostDuplicated> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for pair in self.pairs_in_tier(thresholds, PairTier::High) {
            for name in [pair.first, pair.second] {
                if let Some((key, _)) = self.scores.get_key_value(name.as_str()) {
                    *counts.entry(key.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<MostDuplicated> = counts
            .into_iter()
            .map(|(name, high_pairs)| MostDuplicated {
                name: name.to_string(),
                high_pairs,
                max_score: self.max_off_diagonal(name).unwrap_or(0),
            })
            .collect();
        ranked.sort_by(|a, b| b.high_pairs.cmp(&a.high_pairs));
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skill_document::DocumentParser;

    fn corpus() -> Vec<ParsedDocument> {
        let parser = DocumentParser::default();
        vec![
            parser.parse_named(
                "git-pr-creator",
                "---\nname: git-pr-creator\ndescription: create a pull request\n---\n",
            ),
            parser.parse_named(
                "git-pr-creator-v2",
                "---\nname: git-pr-creator\ndescription: create a pull request\n---\n",
            ),
            parser.parse_named(
                "opentofu-aws-explorer",
                "---\nname: opentofu-aws-explorer\ndescription: inspect cloud resources\n---\n## What I do\nwalk providers\n## When to use me\n",
            ),
        ]
    }

    #[test]
    fn diagonal_is_identity_and_matrix_is_symmetric() {
        let docs = corpus();
        let matrix = DuplicityMatrix::build(&SimilarityEngine::default(), &docs).unwrap();

        assert_eq!(matrix.len(), 3);
        for name in matrix.names() {
            assert_eq!(matrix.score(name, name), Some(IDENTITY_SCORE));
        }
        for a in matrix.names() {
            for b in matrix.names() {
                assert_eq!(matrix.score(a, b), matrix.score(b, a));
            }
        }
        // Identical content still scores below 100 off the diagonal.
        assert_eq!(matrix.score("git-pr-creator", "git-pr-creator-v2"), Some(99));
    }

    #[test]
    fn names_are_sorted_regardless_of_input_order() {
        let mut docs = corpus();
        docs.reverse();
        let matrix = DuplicityMatrix::build(&SimilarityEngine::default(), &docs).unwrap();
        let names: Vec<_> = matrix.names().collect();
        assert_eq!(
            names,
            vec!["git-pr-creator", "git-pr-creator-v2", "opentofu-aws-explorer"]
        );
    }

    #[test]
    fn classifies_pairs_and_candidates() {
        let docs = corpus();
        let matrix = DuplicityMatrix::build(&SimilarityEngine::default(), &docs).unwrap();
        let thresholds = DuplicityThresholds::default();

        let pairs = matrix.pairs(&thresholds);
        assert_eq!(pairs.len(), 3);

        let high = matrix.pairs_in_tier(&thresholds, PairTier::High);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].first, "git-pr-creator");
        assert_eq!(high[0].second, "git-pr-creator-v2");

        assert_eq!(matrix.merge_candidates(&thresholds).len(), 1);
        assert!(matrix.consolidation_candidates(&thresholds).is_empty());

        let ranked = matrix.most_duplicated(&thresholds, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].high_pairs, 1);
        assert_eq!(ranked[0].max_score, 99);
    }

    #[test]
    fn average_includes_diagonal() {
        let docs = corpus();
        let matrix = DuplicityMatrix::build(&SimilarityEngine::default(), &docs[..2]).unwrap();
        // (100 + 99 + 99 + 100) / 4
        assert_eq!(matrix.average(), Some(99));
        assert_eq!(DuplicityMatrix::default().average(), None);
    }

    #[test]
    fn repeated_name_is_rejected() {
        let mut docs = corpus();
        docs.push(docs[0].clone());
        let err = DuplicityMatrix::build(&SimilarityEngine::default(), &docs).unwrap_err();
        assert!(
            matches!(&err, SimilarityError::DuplicateDocument(name) if name == "git-pr-creator"),
            "{err}"
        );
    }

    #[test]
    fn threshold_validation() {
        assert!(DuplicityThresholds::default().validate().is_ok());
        let broken = DuplicityThresholds {
            moderate: 80,
            ..Default::default()
        };
        assert!(broken.validate().is_err());
        let broken = DuplicityThresholds {
            consolidation: 90,
            ..Default::default()
        };
        assert!(broken.validate().is_err());
        assert_eq!(DuplicityThresholds::default().tier(70), PairTier::High);
        assert_eq!(DuplicityThresholds::default().tier(50), PairTier::Moderate);
        assert_eq!(DuplicityThresholds::default().tier(49), PairTier::Low);
    }
}
