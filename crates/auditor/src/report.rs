use serde::Serialize;
use skill_budget::{CostBand, Recommendation, Savings};
use skill_capability::{Access, CompatibilityMatrix, RequirementFlag, Requirements};
use skill_similarity::{DuplicatePair, DuplicityMatrix, MostDuplicated};
use std::collections::BTreeMap;

/// Pairwise duplicity of the whole corpus
#[derive(Debug, Clone, Serialize)]
pub struct DuplicityReport {
    pub documents: usize,

    /// Mean over all ordered pairs including the diagonal
    pub average: u32,

    pub high_pairs: Vec<DuplicatePair>,
    pub moderate_pairs: Vec<DuplicatePair>,
    pub low_pair_count: usize,

    pub merge_candidates: Vec<DuplicatePair>,
    pub consolidation_candidates: Vec<DuplicatePair>,
    pub most_duplicated: Vec<MostDuplicated>,

    pub matrix: DuplicityMatrix,
}

/// Cost of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostRecord {
    pub name: String,
    pub chars: usize,
    pub units: u64,
    pub band: CostBand,
    pub code_blocks: usize,
    pub category: String,
    pub recommendation: Option<Recommendation>,
    pub savings: Savings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCost {
    pub count: usize,
    pub total_units: u64,
    pub average_units: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostSummary {
    pub documents: usize,
    pub total_units: u64,
    pub average_units: u64,
    pub bands: BTreeMap<CostBand, usize>,
    /// Warning plus critical
    pub oversized: usize,
    pub potential_savings: u64,
    pub categories: BTreeMap<String, CategoryCost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    /// One record per document, in name order
    pub records: Vec<CostRecord>,
    pub summary: CostSummary,
}

impl CostReport {
    /// Records with the most expensive first
    pub fn ranked(&self) -> Vec<&CostRecord> {
        let mut ranked: Vec<&CostRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.units.cmp(&a.units));
        ranked
    }

    pub fn in_band(&self, band: CostBand) -> impl Iterator<Item = &CostRecord> {
        self.records.iter().filter(move |record| record.band == band)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub access: Access,
    pub description: Option<String>,
    pub compatible: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagCount {
    pub flag: RequirementFlag,
    pub documents: usize,
}

/// Which profiles may load which documents
#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityReport {
    pub documents: usize,

    /// Registry order
    pub profiles: Vec<ProfileSummary>,

    /// Classifier cue order
    pub flags: Vec<FlagCount>,

    pub requirements: BTreeMap<String, Requirements>,
    pub matrix: CompatibilityMatrix,
}

impl CompatibilityReport {
    /// Documents only the unrestricted profiles can load
    pub fn unrestricted_only(&self) -> Vec<&str> {
        let restricted: Vec<&str> = self
            .profiles
            .iter()
            .filter(|profile| profile.access == Access::Restricted)
            .map(|profile| profile.name.as_str())
            .collect();
        self.matrix
            .documents()
            .filter(|doc| {
                self.matrix.row(doc).is_some_and(|row| {
                    restricted
                        .iter()
                        .all(|profile| !row.get(*profile).copied().unwrap_or(false))
                })
            })
            .collect()
    }
}

/// Everything one run produces
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub duplicity: DuplicityReport,
    pub cost: CostReport,
    pub compatibility: CompatibilityReport,
    pub categories: BTreeMap<String, String>,
}

/// `part / whole` as a truncated percentage; 0 when `whole` is 0
pub fn percent(part: usize, whole: usize) -> usize {
    if whole == 0 {
        0
    } else {
        part * 100 / whole
    }
}
