use crate::error::{CapabilityError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PROFILE_SCHEMA_VERSION: u32 = 1;

const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("primary.json", include_str!("../../../profiles/primary.json")),
    (
        "linting-subagent.json",
        include_str!("../../../profiles/linting-subagent.json"),
    ),
    (
        "testing-subagent.json",
        include_str!("../../../profiles/testing-subagent.json"),
    ),
    (
        "git-workflow-subagent.json",
        include_str!("../../../profiles/git-workflow-subagent.json"),
    ),
    (
        "documentation-subagent.json",
        include_str!("../../../profiles/documentation-subagent.json"),
    ),
    (
        "opentofu-explorer-subagent.json",
        include_str!("../../../profiles/opentofu-explorer-subagent.json"),
    ),
    (
        "workflow-subagent.json",
        include_str!("../../../profiles/workflow-subagent.json"),
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Full access: compatible with every document
    Unrestricted,
    Restricted,
}

/// A named execution restriction tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilityProfile {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub access: Access,

    /// Permitted primitive operations
    #[serde(default)]
    pub tools: BTreeSet<String>,

    /// Permitted external integration identifiers
    #[serde(default)]
    pub integrations: BTreeSet<String>,
}

fn default_schema_version() -> u32 {
    PROFILE_SCHEMA_VERSION
}

impl CapabilityProfile {
    pub fn new(
        name: impl Into<String>,
        access: Access,
        tools: impl IntoIterator<Item = impl Into<String>>,
        integrations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            schema_version: PROFILE_SCHEMA_VERSION,
            name: name.into(),
            description: None,
            access,
            tools: tools.into_iter().map(Into::into).collect(),
            integrations: integrations.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse and validate a JSON profile definition
    pub fn from_json(source_name: &str, raw: &str) -> Result<Self> {
        let profile: CapabilityProfile =
            serde_json::from_str(raw).map_err(|error| CapabilityError::Parse {
                source_name: source_name.to_string(),
                error,
            })?;
        profile.normalized()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.access == Access::Unrestricted
    }

    pub fn permits_integration(&self, id: &str) -> bool {
        self.integrations.contains(id)
    }

    /// Validate and lowercase identifiers so they compare against
    /// classifier output.
    pub fn normalized(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(CapabilityError::invalid_profile("<unnamed>", "name must not be empty"));
        }
        if self.schema_version != PROFILE_SCHEMA_VERSION {
            return Err(CapabilityError::invalid_profile(
                &self.name,
                format!(
                    "schema_version {} is not supported (expected {PROFILE_SCHEMA_VERSION})",
                    self.schema_version
                ),
            ));
        }

        self.tools = normalize_ids(&self.name, "tools", self.tools)?;
        self.integrations = normalize_ids(&self.name, "integrations", self.integrations)?;
        Ok(self)
    }
}

fn normalize_ids(profile: &str, label: &str, ids: BTreeSet<String>) -> Result<BTreeSet<String>> {
    let mut out = BTreeSet::new();
    for id in ids {
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return Err(CapabilityError::invalid_profile(
                profile,
                format!("{label} must not contain empty identifiers"),
            ));
        }
        out.insert(id);
    }
    Ok(out)
}

/// Ordered set of capability profiles, looked up by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProfileRegistry {
    profiles: Vec<CapabilityProfile>,
}

impl ProfileRegistry {
    /// Register profiles in the given order. Names must be unique.
    pub fn new(profiles: impl IntoIterator<Item = CapabilityProfile>) -> Result<Self> {
        let mut registered: Vec<CapabilityProfile> = Vec::new();
        for profile in profiles {
            let profile = profile.normalized()?;
            if registered.iter().any(|p| p.name == profile.name) {
                return Err(CapabilityError::DuplicateProfile(profile.name));
            }
            registered.push(profile);
        }
        if registered.is_empty() {
            return Err(CapabilityError::NoProfiles);
        }
        log::debug!("Registered {} capability profiles", registered.len());
        Ok(Self {
            profiles: registered,
        })
    }

    /// The shipped profile set
    pub fn builtin() -> Result<Self> {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|(source, raw)| CapabilityProfile::from_json(source, raw))
            .collect::<Result<Vec<_>>>()?;
        Self::new(profiles)
    }

    /// Fails fast on names that no profile carries
    pub fn get(&self, name: &str) -> Result<&CapabilityProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.name == name)
            .ok_or_else(|| CapabilityError::UnknownProfile(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityProfile> {
        self.profiles.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|profile| profile.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Every integration identifier any profile permits
    pub fn integrations(&self) -> BTreeSet<String> {
        self.profiles
            .iter()
            .flat_map(|profile| profile.integrations.iter().cloned())
            .collect()
    }
}
