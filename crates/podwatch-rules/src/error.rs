// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Rules error type
#[derive(Error, Debug, Diagnostic)]
pub enum RulesError {
    /// Action parameters failed validation
    #[error("Invalid parameter '{field}': {reason}")]
    #[diagnostic(
        code(rules::invalid_params),
        help("{suggestion}")
    )]
    InvalidParams {
        field: String,
        reason: String,
        suggestion: String,
    },

    /// Playbook does not configure the requested action
    #[error("No '{action}' action found in playbook")]
    #[diagnostic(
        code(rules::action_not_found),
        help("Add an entry like `- {action}: {{grace_minutes: 30}}` under `actions`")
    )]
    ActionNotFound {
        action: String,
    },

    /// Params file could not be read
    #[error("Failed to read params file {path}")]
    #[diagnostic(
        code(rules::params_file),
        help("Check that the file exists and is readable")
    )]
    ParamsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Core error
    #[error("Core error: {0}")]
    #[diagnostic(
        code(rules::core_error),
        help("Ensure the params document is valid YAML")
    )]
    CoreError(#[from] podwatch_core::PodwatchError),
}

/// Result type for rules operations
pub type Result<T> = std::result::Result<T, RulesError>;

impl RulesError {
    /// Create an InvalidParams error
    pub fn invalid_params(
        field: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::InvalidParams {
            field: field.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an ActionNotFound error
    pub fn action_not_found(action: impl Into<String>) -> Self {
        Self::ActionNotFound {
            action: action.into(),
        }
    }

    /// Create a ParamsFile error
    pub fn params_file(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ParamsFile {
            path: path.into(),
            source,
        }
    }
}
