use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name under which the action appears in a playbook's `actions` list
pub const ACTION_NAME: &str = "unschedulable_pod";

/// Default number of minutes a pod must stay unschedulable before alerting
pub const DEFAULT_GRACE_MINUTES: i64 = 30;

fn default_grace_minutes() -> i64 {
    DEFAULT_GRACE_MINUTES
}

/// Parameters for the unschedulable pod action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnschedulablePodParams {
    /// Only match pods in this namespace; `None` matches every namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Minimum span between first and last occurrence, in minutes
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,
}

impl Default for UnschedulablePodParams {
    fn default() -> Self {
        Self {
            namespace: None,
            grace_minutes: DEFAULT_GRACE_MINUTES,
        }
    }
}

impl UnschedulablePodParams {
    /// Reject values the evaluator cannot meaningfully apply
    pub fn validate(&self) -> Result<()> {
        if self.grace_minutes < 0 {
            return Err(RulesError::invalid_params(
                "grace_minutes",
                format!("must not be negative, got {}", self.grace_minutes),
                "Use 0 to alert on the first FailedScheduling event",
            ));
        }

        if matches!(self.namespace.as_deref(), Some("")) {
            return Err(RulesError::invalid_params(
                "namespace",
                "must not be empty",
                "Remove the namespace key to match every namespace",
            ));
        }

        Ok(())
    }

    /// Parse params from YAML and validate them
    ///
    /// Accepts either the bare parameter mapping or a playbook
    /// (one, or a list of them) whose `actions` include this action.
    pub fn from_yaml_str(data: &str) -> Result<Self> {
        let document: serde_yaml::Value = podwatch_core::from_yaml(data)?;

        let params = match find_action(&document) {
            Some(serde_yaml::Value::Null) => Self::default(),
            Some(value) => decode(value.clone())?,
            None if is_playbook(&document) => {
                return Err(RulesError::action_not_found(ACTION_NAME))
            }
            None if document.is_null() => Self::default(),
            None => decode(document)?,
        };

        params.validate()?;
        Ok(params)
    }

    /// Load params from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| RulesError::params_file(path.display().to_string(), e))?;
        Self::from_yaml_str(&data)
    }
}

fn decode(value: serde_yaml::Value) -> Result<UnschedulablePodParams> {
    serde_yaml::from_value(value).map_err(|e| {
        RulesError::from(podwatch_core::PodwatchError::serialization_error(
            format!("Failed to decode {} params: {}", ACTION_NAME, e),
            Some(Box::new(e)),
        ))
    })
}

fn is_playbook(document: &serde_yaml::Value) -> bool {
    document.is_sequence() || document.get("actions").is_some()
}

/// Locate `actions[*].unschedulable_pod` in a playbook or list of playbooks
fn find_action(document: &serde_yaml::Value) -> Option<&serde_yaml::Value> {
    let playbooks: Vec<&serde_yaml::Value> = match document.as_sequence() {
        Some(list) => list.iter().collect(),
        None => vec![document],
    };

    playbooks
        .into_iter()
        .filter_map(|playbook| playbook.get("actions")?.as_sequence())
        .flatten()
        .find_map(|action| action.get(ACTION_NAME))
}
