use crate::classifier::{RequirementFlag, Requirements};
use crate::error::Result;
use crate::profile::{CapabilityProfile, ProfileRegistry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether a document with `requirements` may be loaded under `profile`.
///
/// Unrestricted profiles accept everything. Restricted profiles reject
/// delegation and any integration they do not list.
#[must_use]
pub fn is_compatible(requirements: &Requirements, profile: &CapabilityProfile) -> bool {
    if profile.is_unrestricted() {
        return true;
    }
    if requirements.delegation {
        return false;
    }
    requirements
        .integrations
        .iter()
        .all(|id| profile.permits_integration(id))
}

/// Document × profile compatibility table, keyed by document name then
/// profile name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompatibilityMatrix {
    cells: BTreeMap<String, BTreeMap<String, bool>>,
}

impl CompatibilityMatrix {
    /// Resolve every document against every registered profile
    pub fn build<'a>(
        registry: &ProfileRegistry,
        documents: impl IntoIterator<Item = (&'a str, &'a Requirements)>,
    ) -> Self {
        let mut cells = BTreeMap::new();
        for (name, requirements) in documents {
            let row: BTreeMap<String, bool> = registry
                .iter()
                .map(|profile| (profile.name.clone(), is_compatible(requirements, profile)))
                .collect();
            cells.insert(name.to_string(), row);
        }
        Self { cells }
    }

    /// Compatibility of one document with one profile.
    /// An unknown profile name is an error, not "incompatible".
    pub fn get(
        &self,
        registry: &ProfileRegistry,
        document: &str,
        profile: &str,
    ) -> Result<Option<bool>> {
        registry.get(profile)?;
        Ok(self
            .cells
            .get(document)
            .and_then(|row| row.get(profile))
            .copied())
    }

    pub fn row(&self, document: &str) -> Option<&BTreeMap<String, bool>> {
        self.cells.get(document)
    }

    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of documents each profile can load, in registry order
    pub fn compatible_counts(&self, registry: &ProfileRegistry) -> Vec<(String, usize)> {
        registry
            .names()
            .map(|profile| {
                let count = self
                    .cells
                    .values()
                    .filter(|row| row.get(profile).copied().unwrap_or(false))
                    .count();
                (profile.to_string(), count)
            })
            .collect()
    }
}

impl ProfileRegistry {
    /// Resolve compatibility against a profile referenced by name
    pub fn resolve(&self, requirements: &Requirements, profile: &str) -> Result<bool> {
        Ok(is_compatible(requirements, self.get(profile)?))
    }
}

/// Count how many requirement sets raise each flag
pub fn flag_counts<'a>(
    flags: impl IntoIterator<Item = &'a RequirementFlag>,
    requirements: impl IntoIterator<Item = &'a Requirements> + Clone,
) -> Vec<(RequirementFlag, usize)> {
    flags
        .into_iter()
        .map(|flag| {
            let count = requirements
                .clone()
                .into_iter()
                .filter(|req| req.has(flag))
                .count();
            (flag.clone(), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CapabilityClassifier;
    use crate::error::CapabilityError;
    use proptest::prelude::*;

    fn registry() -> ProfileRegistry {
        ProfileRegistry::builtin().expect("builtin profiles")
    }

    #[test]
    fn delegation_requires_full_access() {
        let registry = registry();
        let req = CapabilityClassifier::default().classify("Delegate each file to a subagent.");

        assert!(registry.resolve(&req, "primary").unwrap());
        for profile in registry.iter().filter(|p| !p.is_unrestricted()) {
            assert!(!is_compatible(&req, profile), "{} accepted delegation", profile.name);
        }
        assert!(!registry.resolve(&req, "linting-subagent").unwrap());
    }

    #[test]
    fn integrations_must_be_permitted() {
        let registry = registry();
        let req = CapabilityClassifier::default().classify("Create the ticket in Atlassian Jira.");

        assert!(registry.resolve(&req, "git-workflow-subagent").unwrap());
        assert!(registry.resolve(&req, "workflow-subagent").unwrap());
        assert!(!registry.resolve(&req, "testing-subagent").unwrap());

        let req = CapabilityClassifier::default().classify("Draw it with drawio.");
        assert!(!registry.resolve(&req, "git-workflow-subagent").unwrap());
    }

    #[test]
    fn shell_and_clarification_alone_do_not_restrict() {
        let req = CapabilityClassifier::default().classify("```bash\nls\n```\nAny question?");
        assert!(req.shell && req.clarification);
        assert!(registry().resolve(&req, "linting-subagent").unwrap());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let req = Requirements::default();
        assert!(matches!(
            registry().resolve(&req, "nope"),
            Err(CapabilityError::UnknownProfile(_))
        ));
    }

    #[test]
    fn matrix_and_counts() {
        let registry = registry();
        let classifier = CapabilityClassifier::default();
        let plain = classifier.classify("Format tables.");
        let jira = classifier.classify("Open an atlassian issue.");
        let matrix = CompatibilityMatrix::build(&registry, [("plain", &plain), ("jira", &jira)]);

        assert_eq!(matrix.documents().collect::<Vec<_>>(), vec!["jira", "plain"]);
        assert_eq!(matrix.get(&registry, "jira", "primary").unwrap(), Some(true));
        assert_eq!(
            matrix.get(&registry, "jira", "linting-subagent").unwrap(),
            Some(false)
        );
        assert!(matrix.get(&registry, "jira", "ghost").is_err());

        let counts = matrix.compatible_counts(&registry);
        assert_eq!(counts[0], ("primary".to_string(), 2));
        assert_eq!(counts[1], ("linting-subagent".to_string(), 1));
        assert_eq!(counts[3], ("git-workflow-subagent".to_string(), 2));

        let flags = flag_counts(classifier.flags(), [&plain, &jira]);
        let atlassian = flags
            .iter()
            .find(|(flag, _)| *flag == RequirementFlag::Integration("atlassian".to_string()))
            .map(|(_, count)| *count);
        assert_eq!(atlassian, Some(1));
    }

    proptest! {
        #[test]
        fn proptest_unrestricted_profile_accepts_everything(body in "\\PC{0,120}") {
            let registry = registry();
            let req = CapabilityClassifier::default().classify(&body);
            prop_assert!(registry.resolve(&req, "primary").unwrap());
        }
    }
}
