use crate::event::ObjectKind;
use serde::{Deserialize, Serialize};

/// Subsystem a finding originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingSource {
    None,
    KubernetesApiServer,
    Prometheus,
    Manual,
    Callback,
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FindingSeverity {
    Debug,
    Info,
    Low,
    Medium,
    High,
}

/// The object a finding is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSubject {
    pub name: String,
    pub namespace: String,
    pub kind: ObjectKind,
}

/// A unit of supporting content attached to a finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum EnrichmentBlock {
    /// Markdown-formatted text
    Markdown(String),
}

impl EnrichmentBlock {
    /// Create a markdown block
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Markdown(text.into())
    }

    /// Create a markdown block quoting `text` verbatim as inline code
    pub fn quoted(text: &str) -> Self {
        Self::Markdown(format!("```{}```", text))
    }

    /// The rendered text of this block
    pub fn text(&self) -> &str {
        match self {
            Self::Markdown(text) => text,
        }
    }
}

/// Output of a rule that matched an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub source: FindingSource,
    pub severity: FindingSeverity,
    /// Groups repeated findings of the same kind
    pub aggregation_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<FindingSubject>,
    #[serde(default)]
    pub enrichments: Vec<EnrichmentBlock>,
}

impl Finding {
    /// Create a finding with no subject or enrichments
    pub fn new(
        title: impl Into<String>,
        source: FindingSource,
        severity: FindingSeverity,
        aggregation_key: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            source,
            severity,
            aggregation_key: aggregation_key.into(),
            subject: None,
            enrichments: Vec::new(),
        }
    }

    /// Attach the object this finding is about
    pub fn with_subject(mut self, subject: FindingSubject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Append enrichment blocks, preserving order
    pub fn add_enrichment(&mut self, blocks: impl IntoIterator<Item = EnrichmentBlock>) {
        self.enrichments.extend(blocks);
    }
}
