use thiserror::Error;

pub type Result<T> = std::result::Result<T, CapabilityError>;

#[derive(Error, Debug)]
pub enum CapabilityError {
    /// A profile name that no registered profile carries
    #[error("Unknown capability profile: {0}")]
    UnknownProfile(String),

    #[error("Duplicate capability profile: {0}")]
    DuplicateProfile(String),

    #[error("Invalid capability profile {name}: {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("Failed to parse capability profile {source_name}: {error}")]
    Parse {
        source_name: String,
        error: serde_json::Error,
    },

    #[error("No capability profiles configured")]
    NoProfiles,
}

impl CapabilityError {
    pub fn invalid_profile(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
