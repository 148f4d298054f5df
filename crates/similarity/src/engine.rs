use crate::matcher::ratio;
use crate::weights::SimilarityWeights;
use skill_document::{Field, ParsedDocument};

/// Weighted lexical similarity between two parsed documents
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    weights: SimilarityWeights,
}

impl SimilarityEngine {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    /// Case-folded ratio for every weighted field, in weight order
    pub fn field_ratios(&self, left: &ParsedDocument, right: &ParsedDocument) -> Vec<(Field, f64)> {
        self.weights
            .iter()
            .map(|(field, _)| {
                let a = left.field(field).to_lowercase();
                let b = right.field(field).to_lowercase();
                (field, ratio(&a, &b))
            })
            .collect()
    }

    /// Duplicity score in `0..=100`.
    ///
    /// Not forced to 100 for identical documents: the score only reaches 100
    /// when every weighted field matches exactly.
    #[must_use]
    pub fn score(&self, left: &ParsedDocument, right: &ParsedDocument) -> u32 {
        let mut weighted = 0.0_f64;
        for ((_, field_ratio), (_, weight)) in self
            .field_ratios(left, right)
            .into_iter()
            .zip(self.weights.iter())
        {
            weighted += field_ratio * weight;
        }

        let scaled = weighted / self.weights.normalizer() * 100.0;
        // `as` truncates toward zero and saturates at the bounds.
        (scaled as u32).min(100)
    }
}
