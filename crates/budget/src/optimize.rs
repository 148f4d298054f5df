use crate::estimator::{CostBand, CostEstimate};
use serde::Serialize;
use std::fmt;

/// Documents with more code blocks than this are extraction targets
const CODE_BLOCK_LIMIT: usize = 3;
/// Units saved per pair of extracted code blocks
const UNITS_PER_EXTRACTED_PAIR: u64 = 150;
/// Documents longer than this are verbose
const VERBOSE_CHARS: usize = 5_000;
/// Share of a verbose document's characters expected to be trimmable
const VERBOSE_TRIM_RATIO: f64 = 0.02;
/// Warning-band documents longer than this should be split
const SPLIT_CHARS: usize = 8_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    None,
    Low,
    Medium,
    High,
}

/// Estimated units an author could save by restructuring a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Savings {
    pub units: u64,
    pub impact: Impact,
}

/// Suggested action for an oversized document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    SplitIntoSmaller,
    ExtractCodeBlocks { count: usize },
    ConsiderSplitting,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::SplitIntoSmaller => f.write_str("Split into smaller skills"),
            Recommendation::ExtractCodeBlocks { count } => write!(f, "Extract {count} code blocks"),
            Recommendation::ConsiderSplitting => f.write_str("Consider splitting"),
        }
    }
}

impl CostEstimate {
    #[must_use]
    pub fn recommendation(&self) -> Option<Recommendation> {
        match self.band {
            CostBand::Critical => Some(Recommendation::SplitIntoSmaller),
            CostBand::Warning if self.code_blocks > CODE_BLOCK_LIMIT => {
                Some(Recommendation::ExtractCodeBlocks {
                    count: self.code_blocks / 2,
                })
            }
            CostBand::Warning if self.chars > SPLIT_CHARS => Some(Recommendation::ConsiderSplitting),
            _ => None,
        }
    }

    /// Savings from extracting code blocks and trimming verbose prose
    #[must_use]
    pub fn savings(&self) -> Savings {
        let mut potential = 0.0_f64;
        if self.code_blocks > CODE_BLOCK_LIMIT {
            potential += ((self.code_blocks / 2) as u64 * UNITS_PER_EXTRACTED_PAIR) as f64;
        }
        if self.chars > VERBOSE_CHARS {
            potential += self.chars as f64 * VERBOSE_TRIM_RATIO;
        }

        let impact = if potential > 200.0 {
            Impact::High
        } else if potential > 100.0 {
            Impact::Medium
        } else if potential > 0.0 {
            Impact::Low
        } else {
            Impact::None
        };

        Savings {
            units: potential as u64,
            impact,
        }
    }
}
