//! Podwatch Rules - Event rules producing findings
//!
//! This crate provides:
//! - The unschedulable pod evaluator
//! - Filter predicates (reason, pod reference, namespace, name, grace period)
//! - Event timestamp parsing and duration rendering
//! - Action parameters loaded from YAML playbooks

pub mod error;
pub mod evaluator;
pub mod filter;
pub mod params;
pub mod time;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RulesError};
pub use evaluator::{evaluate, run_action, UnschedulablePodEvaluator};
pub use params::UnschedulablePodParams;
pub use types::{EvaluationContext, FilterResult, Verdict};
