use crate::params::UnschedulablePodParams;
use podwatch_core::{EventRecord, Finding, ObjectReference};

/// Evaluation context containing the event and the action parameters
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Event under evaluation
    pub event: &'a EventRecord,
    /// Parameters the action was configured with
    pub params: &'a UnschedulablePodParams,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(event: &'a EventRecord, params: &'a UnschedulablePodParams) -> Self {
        Self { event, params }
    }

    /// The object the event refers to
    pub fn involved_object(&self) -> Option<&'a ObjectReference> {
        self.event.involved_object.as_ref()
    }
}

/// Result of applying one filter predicate to an event
#[derive(Debug, Clone)]
pub struct FilterResult {
    /// Whether the event passed the filter
    pub passed: bool,
    /// Reason for failure (if any)
    pub reason: Option<String>,
}

impl FilterResult {
    /// Create a passing filter result
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
        }
    }

    /// Create a failing filter result
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Outcome of evaluating an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every predicate passed
    Match(Finding),
    /// A predicate rejected the event
    Skip {
        /// Name of the rejecting predicate
        predicate: String,
        reason: String,
    },
    /// There was no event to evaluate
    NoEvent,
}

impl Verdict {
    /// Whether the event produced a finding
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }

    /// The finding, if the event matched
    pub fn into_finding(self) -> Option<Finding> {
        match self {
            Self::Match(finding) => Some(finding),
            Self::Skip { .. } | Self::NoEvent => None,
        }
    }
}
