use crate::error::{BudgetError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Estimator constants and band thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostConfig {
    /// Characters that make up one cost unit
    pub chars_per_unit: f64,

    /// Fractional overhead added on top of the raw unit count
    pub overhead_fraction: f64,

    /// Estimates at or above this are in the warning band
    pub warning_at: u64,

    /// Estimates at or above this are in the critical band
    pub critical_at: u64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            chars_per_unit: 4.0,
            overhead_fraction: 0.1,
            warning_at: 2_000,
            critical_at: 3_000,
        }
    }
}

impl CostConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.chars_per_unit.is_finite() || self.chars_per_unit <= 0.0 {
            return Err(BudgetError::invalid_config(format!(
                "chars_per_unit must be > 0 (got {})",
                self.chars_per_unit
            )));
        }
        if !self.overhead_fraction.is_finite() || self.overhead_fraction < 0.0 {
            return Err(BudgetError::invalid_config(format!(
                "overhead_fraction must be >= 0 (got {})",
                self.overhead_fraction
            )));
        }
        if self.warning_at > self.critical_at {
            return Err(BudgetError::invalid_config(format!(
                "warning_at ({}) cannot exceed critical_at ({})",
                self.warning_at, self.critical_at
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostBand {
    Normal,
    Warning,
    Critical,
}

impl CostBand {
    pub const ALL: [CostBand; 3] = [CostBand::Normal, CostBand::Warning, CostBand::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            CostBand::Normal => "normal",
            CostBand::Warning => "warning",
            CostBand::Critical => "critical",
        }
    }

    /// Warning or critical
    pub fn is_oversized(self) -> bool {
        self != CostBand::Normal
    }
}

impl fmt::Display for CostBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cost of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostEstimate {
    /// Character count the estimate was derived from
    pub chars: usize,

    /// Estimated cost units
    pub units: u64,

    pub band: CostBand,

    /// Fenced code regions in the document body
    pub code_blocks: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    config: CostConfig,
}

impl CostEstimator {
    pub fn new(config: CostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// `floor(chars / chars_per_unit * (1 + overhead_fraction))`
    #[must_use]
    pub fn units(&self, chars: usize) -> u64 {
        let raw = chars as f64 / self.config.chars_per_unit * (1.0 + self.config.overhead_fraction);
        raw as u64
    }

    #[must_use]
    pub fn band(&self, units: u64) -> CostBand {
        if units >= self.config.critical_at {
            CostBand::Critical
        } else if units >= self.config.warning_at {
            CostBand::Warning
        } else {
            CostBand::Normal
        }
    }

    #[must_use]
    pub fn estimate(&self, chars: usize, code_blocks: usize) -> CostEstimate {
        let units = self.units(chars);
        CostEstimate {
            chars,
            units,
            band: self.band(units),
            code_blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_document_lands_in_warning_band() {
        let estimate = CostEstimator::default().estimate(8_000, 2);
        assert_eq!(estimate.units, 2_200);
        assert_eq!(estimate.band, CostBand::Warning);
        assert_eq!(estimate.code_blocks, 2);
    }

    #[test]
    fn empty_document_costs_nothing() {
        let estimate = CostEstimator::default().estimate(0, 0);
        assert_eq!(estimate.units, 0);
        assert_eq!(estimate.band, CostBand::Normal);
    }

    #[test]
    fn band_boundaries_are_inclusive_at_the_lower_edge() {
        let estimator = CostEstimator::default();
        assert_eq!(estimator.band(1_999), CostBand::Normal);
        assert_eq!(estimator.band(2_000), CostBand::Warning);
        assert_eq!(estimator.band(2_999), CostBand::Warning);
        assert_eq!(estimator.band(3_000), CostBand::Critical);
    }

    #[test]
    fn units_truncate() {
        let estimator = CostEstimator::default();
        // 10 / 4 * 1.1 = 2.75
        assert_eq!(estimator.units(10), 2);
        // 11_000 / 4 * 1.1 = 3025
        assert_eq!(estimator.units(11_000), 3_025);
    }

    #[test]
    fn config_validation() {
        assert!(CostConfig::default().validate().is_ok());
        let bad = CostConfig {
            chars_per_unit: 0.0,
            ..Default::default()
        };
        assert!(CostEstimator::new(bad).is_err());
        let bad = CostConfig {
            overhead_fraction: -0.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = CostConfig {
            warning_at: 5_000,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn band_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CostBand::Critical).unwrap(),
            "\"critical\""
        );
    }

    proptest! {
        #[test]
        fn proptest_units_are_monotonic(a in 0usize..2_000_000, b in 0usize..2_000_000) {
            let estimator = CostEstimator::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(estimator.units(lo) <= estimator.units(hi));
            prop_assert!(estimator.band(estimator.units(lo)) <= estimator.band(estimator.units(hi)));
        }
    }
}
