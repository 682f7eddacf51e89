// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for Podwatch operations
#[derive(Error, Debug, Diagnostic)]
pub enum PodwatchError {
    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(podwatch::serialization_error),
        help("Ensure the document is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Event document has an unsupported shape
    #[error("Invalid event document: {reason}")]
    #[diagnostic(
        code(podwatch::invalid_event_document),
        help("Provide a single Event object, a list of Events, or an EventList with an 'items' field")
    )]
    InvalidEventDocument {
        #[allow(unused)]
        reason: String,
    },
}

/// Result type alias for Podwatch operations
pub type Result<T> = std::result::Result<T, PodwatchError>;

impl PodwatchError {
    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }

    /// Create an InvalidEventDocument error
    pub fn invalid_event_document(reason: impl Into<String>) -> Self {
        Self::InvalidEventDocument {
            reason: reason.into(),
        }
    }
}
