use crate::error::{Result, SimilarityError};
use serde::{Deserialize, Serialize};
use skill_document::Field;
use std::collections::BTreeMap;

/// Totals within this distance of 1.0 are treated as already normalized
const UNIT_TOTAL_EPSILON: f64 = 1e-9;

/// Per-field weights for the duplicity score.
///
/// Iteration follows [`Field`] order, so the weighted sum accumulates in the
/// same order for every comparison of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityWeights {
    weights: BTreeMap<Field, f64>,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (Field::Name, 0.15),
                (Field::Description, 0.25),
                (Field::BodyOverview, 0.30),
                (Field::UsageConditions, 0.20),
                (Field::Procedure, 0.10),
            ]),
        }
    }
}

impl SimilarityWeights {
    /// Build weights from `(field, weight)` pairs, rejecting repeats.
    pub fn new(entries: impl IntoIterator<Item = (Field, f64)>) -> Result<Self> {
        let mut weights = BTreeMap::new();
        for (field, weight) in entries {
            if weights.insert(field, weight).is_some() {
                return Err(SimilarityError::DuplicateField(field.to_string()));
            }
        }
        let weights = Self { weights };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(SimilarityError::InvalidWeight {
                    field: field.to_string(),
                    weight: *weight,
                });
            }
        }
        if self.total() <= 0.0 {
            return Err(SimilarityError::NoWeights);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        self.weights.iter().map(|(field, weight)| (*field, *weight))
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<f64> {
        self.weights.get(&field).copied()
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Divisor applied to the weighted sum: 1.0 when the weights already add
    /// up to one, otherwise their total.
    pub(crate) fn normalizer(&self) -> f64 {
        let total = self.total();
        if (total - 1.0).abs() <= UNIT_TOTAL_EPSILON {
            1.0
        } else {
            total
        }
    }
}
