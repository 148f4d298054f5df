use crate::category::{categorize, CategoryRule};
use crate::config::AuditConfig;
use crate::corpus::Corpus;
use crate::error::{AuditError, Result};
use crate::loader::load_corpus;
use crate::report::{
    AuditReport, CategoryCost, CompatibilityReport, CostRecord, CostReport, CostSummary,
    DuplicityReport, FlagCount, ProfileSummary,
};
use skill_budget::{CostBand, CostEstimator};
use skill_capability::{
    flag_counts, CapabilityClassifier, CompatibilityMatrix, ProfileRegistry, Requirements,
};
use skill_document::DocumentParser;
use skill_similarity::{DuplicityMatrix, DuplicityThresholds, PairTier, SimilarityEngine};
use std::collections::BTreeMap;
use std::path::Path;

/// Corpus orchestrator.
///
/// Built once from a validated [`AuditConfig`]; every analysis borrows a
/// [`Corpus`] and either produces its full report or fails before producing
/// any of it.
#[derive(Debug, Clone)]
pub struct Auditor {
    file_name: String,
    parser: DocumentParser,
    engine: SimilarityEngine,
    thresholds: DuplicityThresholds,
    estimator: CostEstimator,
    classifier: CapabilityClassifier,
    registry: ProfileRegistry,
    categories: Vec<CategoryRule>,
    most_duplicated_limit: usize,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Result<Self> {
        config.validate()?;
        let registry = config.registry()?;
        let classifier = config.classifier();
        Ok(Self {
            estimator: CostEstimator::new(config.cost)?,
            engine: SimilarityEngine::new(config.weights),
            parser: DocumentParser::new(config.parser),
            thresholds: config.thresholds,
            file_name: config.file_name,
            classifier,
            registry,
            categories: config.categories,
            most_duplicated_limit: config.most_duplicated_limit,
        })
    }

    pub fn parser(&self) -> &DocumentParser {
        &self.parser
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn thresholds(&self) -> &DuplicityThresholds {
        &self.thresholds
    }

    /// Load `<dir>/<child>/<file_name>` documents
    pub fn load(&self, dir: &Path) -> Result<Corpus> {
        load_corpus(dir, &self.file_name, &self.parser)
    }

    /// Naming category of one document
    pub fn category<'a>(&'a self, name: &str) -> &'a str {
        categorize(&self.categories, name)
    }

    pub fn duplicity(&self, corpus: &Corpus) -> Result<DuplicityReport> {
        corpus.ensure_not_empty()?;
        let matrix = DuplicityMatrix::build(&self.engine, corpus.documents())?;
        let average = matrix.average().ok_or(AuditError::EmptyCorpus)?;

        let pairs = matrix.pairs(&self.thresholds);
        let high_pairs = matrix.pairs_in_tier(&self.thresholds, PairTier::High);
        let moderate_pairs = matrix.pairs_in_tier(&self.thresholds, PairTier::Moderate);
        let low_pair_count = pairs
            .iter()
            .filter(|pair| pair.tier == PairTier::Low)
            .count();

        log::info!(
            "Duplicity: {} documents, average {average}, {} high / {} moderate pairs",
            matrix.len(),
            high_pairs.len(),
            moderate_pairs.len()
        );

        Ok(DuplicityReport {
            documents: matrix.len(),
            average,
            merge_candidates: matrix.merge_candidates(&self.thresholds),
            consolidation_candidates: matrix.consolidation_candidates(&self.thresholds),
            most_duplicated: matrix.most_duplicated(&self.thresholds, self.most_duplicated_limit),
            high_pairs,
            moderate_pairs,
            low_pair_count,
            matrix,
        })
    }

    pub fn costs(&self, corpus: &Corpus) -> Result<CostReport> {
        corpus.ensure_not_empty()?;

        let records: Vec<CostRecord> = corpus
            .documents()
            .map(|doc| {
                let estimate = self.estimator.estimate(doc.size(), doc.code_block_count());
                CostRecord {
                    name: doc.name().to_string(),
                    chars: estimate.chars,
                    units: estimate.units,
                    band: estimate.band,
                    code_blocks: estimate.code_blocks,
                    category: self.category(doc.name()).to_string(),
                    recommendation: estimate.recommendation(),
                    savings: estimate.savings(),
                }
            })
            .collect();

        let summary = summarize_costs(&records);
        log::info!(
            "Cost: {} units total, {} oversized",
            summary.total_units,
            summary.oversized
        );
        Ok(CostReport { records, summary })
    }

    pub fn compatibility(&self, corpus: &Corpus) -> Result<CompatibilityReport> {
        corpus.ensure_not_empty()?;

        let requirements: BTreeMap<String, Requirements> = corpus
            .documents()
            .map(|doc| (doc.name().to_string(), self.classifier.classify(doc.raw_body())))
            .collect();
        let matrix = CompatibilityMatrix::build(
            &self.registry,
            requirements
                .iter()
                .map(|(name, req)| (name.as_str(), req)),
        );

        let counts: BTreeMap<String, usize> =
            matrix.compatible_counts(&self.registry).into_iter().collect();
        let profiles = self
            .registry
            .iter()
            .map(|profile| ProfileSummary {
                name: profile.name.clone(),
                access: profile.access,
                description: profile.description.clone(),
                compatible: counts.get(&profile.name).copied().unwrap_or(0),
            })
            .collect();

        let flags = flag_counts(self.classifier.flags(), requirements.values())
            .into_iter()
            .map(|(flag, documents)| FlagCount { flag, documents })
            .collect();

        log::debug!(
            "Compatibility resolved for {} documents x {} profiles",
            matrix.len(),
            self.registry.len()
        );

        Ok(CompatibilityReport {
            documents: corpus.len(),
            profiles,
            flags,
            requirements,
            matrix,
        })
    }

    /// Every analysis over one corpus
    pub fn audit(&self, corpus: &Corpus) -> Result<AuditReport> {
        corpus.ensure_not_empty()?;
        Ok(AuditReport {
            duplicity: self.duplicity(corpus)?,
            cost: self.costs(corpus)?,
            compatibility: self.compatibility(corpus)?,
            categories: corpus
                .names()
                .map(|name| (name.to_string(), self.category(name).to_string()))
                .collect(),
        })
    }
}

fn summarize_costs(records: &[CostRecord]) -> CostSummary {
    let mut bands: BTreeMap<CostBand, usize> =
        CostBand::ALL.iter().map(|band| (*band, 0)).collect();
    let mut categories: BTreeMap<String, CategoryCost> = BTreeMap::new();
    let mut total_units = 0u64;
    let mut potential_savings = 0u64;

    for record in records {
        total_units += record.units;
        potential_savings += record.savings.units;
        *bands.entry(record.band).or_insert(0) += 1;

        let category = categories.entry(record.category.clone()).or_default();
        category.count += 1;
        category.total_units += record.units;
    }
    for category in categories.values_mut() {
        category.average_units = category.total_units / category.count as u64;
    }

    let documents = records.len();
    CostSummary {
        documents,
        total_units,
        average_units: if documents == 0 {
            0
        } else {
            total_units / documents as u64
        },
        oversized: records.iter().filter(|r| r.band.is_oversized()).count(),
        bands,
        potential_savings,
        categories,
    }
}
