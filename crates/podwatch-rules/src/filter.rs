use crate::time::event_span;
use crate::types::{EvaluationContext, FilterResult};
use podwatch_core::{EventReason, ObjectKind};

/// Workload family whose scheduling noise is never alerted on
pub const EXCLUDED_NAME_PREFIX: &str = "airflow-";

/// Filter predicate trait
pub trait FilterPredicate: Send + Sync {
    /// Filter an event
    fn filter(&self, context: &EvaluationContext<'_>) -> FilterResult;

    /// Name of the filter
    fn name(&self) -> &str;
}

/// Filter for the event reason
pub struct ReasonMatches {
    pub reason: EventReason,
}

impl FilterPredicate for ReasonMatches {
    fn filter(&self, context: &EvaluationContext<'_>) -> FilterResult {
        match &context.event.reason {
            Some(reason) if *reason == self.reason => FilterResult::pass(),
            Some(reason) => FilterResult::fail(format!("Event reason is {}", reason)),
            None => FilterResult::fail("Event has no reason"),
        }
    }

    fn name(&self) -> &str {
        "ReasonMatches"
    }
}

/// Filter for events about a named, namespaced pod
pub struct InvolvesPod;

impl FilterPredicate for InvolvesPod {
    fn filter(&self, context: &EvaluationContext<'_>) -> FilterResult {
        let reference = match context.involved_object() {
            Some(reference) => reference,
            None => return FilterResult::fail("Event has no involved object"),
        };

        match &reference.kind {
            Some(ObjectKind::Pod) => {}
            Some(kind) => return FilterResult::fail(format!("Involved object is a {}", kind)),
            None => return FilterResult::fail("Involved object has no kind"),
        }

        if reference.name.is_none() {
            return FilterResult::fail("Pod reference has no name");
        }
        if reference.namespace.is_none() {
            return FilterResult::fail("Pod reference has no namespace");
        }

        FilterResult::pass()
    }

    fn name(&self) -> &str {
        "InvolvesPod"
    }
}

/// Filter for the configured namespace
pub struct NamespaceMatches;

impl FilterPredicate for NamespaceMatches {
    fn filter(&self, context: &EvaluationContext<'_>) -> FilterResult {
        // No namespace configured = all namespaces
        let wanted = match &context.params.namespace {
            Some(ns) => ns,
            None => return FilterResult::pass(),
        };

        let actual = context
            .involved_object()
            .and_then(|r| r.namespace.as_deref());

        if actual == Some(wanted.as_str()) {
            FilterResult::pass()
        } else {
            FilterResult::fail(format!(
                "Pod namespace {} does not match {}",
                actual.unwrap_or("<none>"),
                wanted
            ))
        }
    }

    fn name(&self) -> &str {
        "NamespaceMatches"
    }
}

/// Filter for pod names with an excluded prefix
pub struct NameNotExcluded {
    pub prefix: String,
}

impl FilterPredicate for NameNotExcluded {
    fn filter(&self, context: &EvaluationContext<'_>) -> FilterResult {
        let name = context.involved_object().and_then(|r| r.name.as_deref());

        match name {
            Some(name) if name.starts_with(&self.prefix) => {
                FilterResult::fail(format!("Pod {} starts with {}", name, self.prefix))
            }
            Some(_) => FilterResult::pass(),
            None => FilterResult::fail("Pod reference has no name"),
        }
    }

    fn name(&self) -> &str {
        "NameNotExcluded"
    }
}

/// Filter for events that have persisted at least the grace period
pub struct PersistedPastGrace;

impl FilterPredicate for PersistedPastGrace {
    fn filter(&self, context: &EvaluationContext<'_>) -> FilterResult {
        let event = context.event;
        let span = match event_span(
            event.first_timestamp.as_deref(),
            event.last_timestamp.as_deref(),
        ) {
            Some(span) => span,
            None => return FilterResult::fail("Event timestamps are missing or malformed"),
        };

        // Spans are whole seconds, so compare at second granularity
        let grace_secs = context.params.grace_minutes.saturating_mul(60);
        if span.num_seconds() < grace_secs {
            return FilterResult::fail(format!(
                "Unschedulable for {}s, below grace period of {} minutes",
                span.num_seconds(),
                context.params.grace_minutes
            ));
        }

        FilterResult::pass()
    }

    fn name(&self) -> &str {
        "PersistedPastGrace"
    }
}

/// Get the filter predicates for unschedulable pods, in evaluation order
pub fn unschedulable_pod_filters() -> Vec<Box<dyn FilterPredicate>> {
    vec![
        Box::new(ReasonMatches {
            reason: EventReason::FailedScheduling,
        }),
        Box::new(InvolvesPod),
        Box::new(NamespaceMatches),
        Box::new(NameNotExcluded {
            prefix: EXCLUDED_NAME_PREFIX.to_string(),
        }),
        Box::new(PersistedPastGrace),
    ]
}
