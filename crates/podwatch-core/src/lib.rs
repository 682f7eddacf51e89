//! Podwatch Core - Shared vocabulary between event rules and their host
//!
//! This crate provides:
//! - Event records as delivered by the Kubernetes API server
//! - Findings and their enrichment blocks
//! - Capability traits for event sources and finding sinks
//! - Error types with miette diagnostics
//! - Serialization helpers

pub mod error;
pub mod event;
pub mod finding;
pub mod traits;

// Re-export commonly used types
pub use error::{PodwatchError, Result};
pub use event::{
    events_from_document, EventReason, EventRecord, ObjectKind, ObjectReference,
    EVENT_TIMESTAMP_FORMAT,
};
pub use finding::{EnrichmentBlock, Finding, FindingSeverity, FindingSource, FindingSubject};
pub use traits::{EventSource, FindingSink};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::Event;

/// Serialize a value to JSON
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| {
        PodwatchError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to pretty JSON
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        PodwatchError::serialization_error(
            format!("Failed to serialize to JSON: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Serialize a value to YAML
pub fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| {
        PodwatchError::serialization_error(
            format!("Failed to serialize to YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Deserialize a value from YAML (JSON documents are accepted too)
pub fn from_yaml<T: for<'de> serde::Deserialize<'de>>(data: &str) -> Result<T> {
    serde_yaml::from_str(data).map_err(|e| {
        PodwatchError::serialization_error(
            format!("Failed to deserialize from YAML: {}", e),
            Some(Box::new(e)),
        )
    })
}
