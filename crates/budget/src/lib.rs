//! # Skill Budget
//!
//! Approximate consumption cost of a skill document against a fixed
//! per-document budget.
//!
//! ```text
//! units = floor(chars / chars_per_unit * (1 + overhead_fraction))
//!
//!   0 ───── normal ───── warning_at ───── warning ───── critical_at ───── critical ──>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use skill_budget::{CostBand, CostEstimator};
//!
//! let estimator = CostEstimator::default();
//! let estimate = estimator.estimate(8_000, 0);
//! assert_eq!(estimate.units, 2_200);
//! assert_eq!(estimate.band, CostBand::Warning);
//! ```

mod error;
mod estimator;
mod optimize;

pub use error::{BudgetError, Result};
pub use estimator::{CostBand, CostConfig, CostEstimate, CostEstimator};
pub use optimize::{Impact, Recommendation, Savings};
