use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Integrations recognised when no other set is configured
pub const DEFAULT_INTEGRATIONS: &[&str] = &["atlassian", "drawio", "zai-mcp-server"];

const DELEGATION_MARKERS: &[&str] = &["task", "delegate", "subagent"];
const CLARIFICATION_MARKERS: &[&str] = &["question"];

/// One capability a document may implicitly require
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequirementFlag {
    /// Runs shell commands
    Shell,
    /// Runs Python snippets
    Python,
    /// Hands work to another unit of work
    Delegation,
    /// Asks the user clarifying questions
    Clarification,
    /// Talks to a named external integration
    Integration(String),
}

impl RequirementFlag {
    pub fn label(&self) -> String {
        match self {
            RequirementFlag::Shell => "shell".to_string(),
            RequirementFlag::Python => "python".to_string(),
            RequirementFlag::Delegation => "delegation".to_string(),
            RequirementFlag::Clarification => "clarification".to_string(),
            RequirementFlag::Integration(id) => format!("integration:{id}"),
        }
    }
}

impl fmt::Display for RequirementFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for RequirementFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMatching {
    /// Exact substring (fenced code-type markers)
    Sensitive,
    /// Substring of the lowercased body (free-text cues)
    Insensitive,
}

/// A marker set that raises one requirement when any marker appears
#[derive(Debug, Clone)]
pub struct Cue {
    pub flag: RequirementFlag,
    pub markers: Vec<String>,
    pub case: CaseMatching,
}

impl Cue {
    fn new(flag: RequirementFlag, markers: &[&str], case: CaseMatching) -> Self {
        let markers = markers
            .iter()
            .map(|marker| match case {
                CaseMatching::Sensitive => marker.to_string(),
                CaseMatching::Insensitive => marker.to_lowercase(),
            })
            .collect();
        Self {
            flag,
            markers,
            case,
        }
    }

    fn matches(&self, body: &str, lowered: &str) -> bool {
        let haystack = match self.case {
            CaseMatching::Sensitive => body,
            CaseMatching::Insensitive => lowered,
        };
        self.markers
            .iter()
            .any(|marker| haystack.contains(marker.as_str()))
    }
}

/// Requirements inferred from one document body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Requirements {
    pub shell: bool,
    pub python: bool,
    pub delegation: bool,
    pub clarification: bool,
    /// Lowercased identifiers of required integrations
    pub integrations: BTreeSet<String>,
}

impl Requirements {
    pub fn has(&self, flag: &RequirementFlag) -> bool {
        match flag {
            RequirementFlag::Shell => self.shell,
            RequirementFlag::Python => self.python,
            RequirementFlag::Delegation => self.delegation,
            RequirementFlag::Clarification => self.clarification,
            RequirementFlag::Integration(id) => self.integrations.contains(id),
        }
    }

    fn raise(&mut self, flag: &RequirementFlag) {
        match flag {
            RequirementFlag::Shell => self.shell = true,
            RequirementFlag::Python => self.python = true,
            RequirementFlag::Delegation => self.delegation = true,
            RequirementFlag::Clarification => self.clarification = true,
            RequirementFlag::Integration(id) => {
                self.integrations.insert(id.clone());
            }
        }
    }
}

/// Lexical capability detection.
///
/// Never suppresses a cue that textually appears; false positives from
/// incidental mentions are accepted.
#[derive(Debug, Clone)]
pub struct CapabilityClassifier {
    cues: Vec<Cue>,
}

impl Default for CapabilityClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_INTEGRATIONS.iter().copied())
    }
}

impl CapabilityClassifier {
    /// Build the cue table for the given integration identifiers
    pub fn new<I, S>(integrations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cues = vec![
            Cue::new(RequirementFlag::Shell, &["```bash"], CaseMatching::Sensitive),
            Cue::new(RequirementFlag::Python, &["```python"], CaseMatching::Sensitive),
            Cue::new(
                RequirementFlag::Delegation,
                DELEGATION_MARKERS,
                CaseMatching::Insensitive,
            ),
            Cue::new(
                RequirementFlag::Clarification,
                CLARIFICATION_MARKERS,
                CaseMatching::Insensitive,
            ),
        ];

        let ids: BTreeSet<String> = integrations
            .into_iter()
            .map(|id| id.as_ref().trim().to_lowercase())
            .filter(|id| !id.is_empty())
            .collect();
        for id in ids {
            cues.push(Cue::new(
                RequirementFlag::Integration(id.clone()),
                &[id.as_str()],
                CaseMatching::Insensitive,
            ));
        }

        Self { cues }
    }

    /// Every flag this classifier can raise, in cue order
    pub fn flags(&self) -> impl Iterator<Item = &RequirementFlag> {
        self.cues.iter().map(|cue| &cue.flag)
    }

    #[must_use]
    pub fn classify(&self, body: &str) -> Requirements {
        let lowered = body.to_lowercase();
        let mut requirements = Requirements::default();
        for cue in &self.cues {
            if cue.matches(body, &lowered) {
                requirements.raise(&cue.flag);
            }
        }
        requirements
    }
}
