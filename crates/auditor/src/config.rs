use crate::category::{default_rules, CategoryRule};
use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use skill_budget::CostConfig;
use skill_capability::{
    CapabilityClassifier, CapabilityProfile, ProfileRegistry, DEFAULT_INTEGRATIONS,
};
use skill_document::ParserConfig;
use skill_similarity::{DuplicityThresholds, SimilarityWeights};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when none is passed explicitly
pub const CONFIG_ENV: &str = "SKILL_AUDIT_CONFIG";

/// Audit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// File looked up in each corpus subdirectory
    pub file_name: String,

    /// Header and section markers
    pub parser: ParserConfig,

    /// Per-field duplicity weights
    pub weights: SimilarityWeights,

    /// Pair classification cut-offs
    pub thresholds: DuplicityThresholds,

    /// Estimator constants and cost bands
    pub cost: CostConfig,

    /// Integration identifiers the classifier looks for
    pub integrations: Vec<String>,

    /// Capability profiles; the built-in set when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<CapabilityProfile>>,

    /// Naming rules, first match wins
    pub categories: Vec<CategoryRule>,

    /// Length of the "most duplicated" ranking
    pub most_duplicated_limit: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            file_name: "SKILL.md".to_string(),
            parser: ParserConfig::default(),
            weights: SimilarityWeights::default(),
            thresholds: DuplicityThresholds::default(),
            cost: CostConfig::default(),
            integrations: DEFAULT_INTEGRATIONS.iter().map(|id| id.to_string()).collect(),
            profiles: None,
            categories: default_rules(),
            most_duplicated_limit: 10,
        }
    }
}

impl AuditConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| AuditError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AuditConfig = toml::from_str(&raw).map_err(|error| AuditError::ConfigParse {
            path: path.to_path_buf(),
            error,
        })?;
        config.validate()?;
        log::debug!("Loaded audit config from {}", path.display());
        Ok(config)
    }

    /// Explicit path, then [`CONFIG_ENV`], then defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(AuditError::invalid_config("file_name must not be empty"));
        }
        self.parser
            .validate()
            .map_err(|reason| AuditError::invalid_config(format!("parser: {reason}")))?;
        self.weights.validate()?;
        self.thresholds.validate()?;
        self.cost.validate()?;
        for rule in &self.categories {
            rule.validate()?;
        }
        if self.most_duplicated_limit == 0 {
            return Err(AuditError::invalid_config(
                "most_duplicated_limit must be at least 1",
            ));
        }
        self.registry()?;
        Ok(())
    }

    pub fn registry(&self) -> Result<ProfileRegistry> {
        let registry = match &self.profiles {
            Some(profiles) => ProfileRegistry::new(profiles.iter().cloned())?,
            None => ProfileRegistry::builtin()?,
        };
        Ok(registry)
    }

    pub fn classifier(&self) -> CapabilityClassifier {
        CapabilityClassifier::new(&self.integrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use skill_document::Field;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AuditConfig::default();
        config.validate().unwrap();
        assert_eq!(config.registry().unwrap().len(), 7);
        assert_eq!(config.file_name, "SKILL.md");
        assert_eq!(config.integrations, DEFAULT_INTEGRATIONS);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
integrations = ["atlassian", "github"]

[weights]
name = 0.5
description = 0.5

[cost]
critical_at = 4000

[[profiles]]
name = "reviewer"
access = "restricted"
tools = ["read"]
integrations = ["github"]
"#
        )
        .unwrap();

        let config = AuditConfig::load(file.path()).unwrap();
        assert_eq!(config.weights.get(Field::Name), Some(0.5));
        assert_eq!(config.weights.get(Field::Procedure), None);
        assert_eq!(config.cost.critical_at, 4000);
        assert_eq!(config.cost.warning_at, 2000);
        assert_eq!(config.thresholds, DuplicityThresholds::default());

        let registry = config.registry().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["reviewer"]);
        let req = config.classifier().classify("Push it to GitHub.");
        assert!(registry.resolve(&req, "reviewer").unwrap());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file_nmae = \"README.md\"").unwrap();
        assert!(matches!(
            AuditConfig::load(file.path()),
            Err(AuditError::ConfigParse { .. })
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = AuditConfig {
            file_name: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AuditError::InvalidConfig(_))));

        let mut config = AuditConfig::default();
        config.cost.chars_per_unit = 0.0;
        assert!(matches!(config.validate(), Err(AuditError::Budget(_))));

        let mut config = AuditConfig::default();
        config.thresholds.moderate = 90;
        assert!(matches!(config.validate(), Err(AuditError::Similarity(_))));

        let config = AuditConfig {
            profiles: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AuditError::Capability(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AuditConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AuditError::Read { .. }));
    }
}
