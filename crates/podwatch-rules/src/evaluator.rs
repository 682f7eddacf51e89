use crate::filter::{unschedulable_pod_filters, FilterPredicate};
use crate::params::UnschedulablePodParams;
use crate::time::{event_span, format_duration};
use crate::types::{EvaluationContext, Verdict};
use podwatch_core::{
    EnrichmentBlock, EventRecord, EventSource, Finding, FindingSeverity, FindingSink,
    FindingSource, FindingSubject, ObjectKind,
};

/// Groups every unschedulable pod finding together, regardless of pod
pub const AGGREGATION_KEY: &str = "unschedulable_pod";

/// Decides whether a FailedScheduling event warrants a finding
///
/// Evaluation is pure: it neither logs nor retains anything between calls.
pub struct UnschedulablePodEvaluator {
    params: UnschedulablePodParams,
    filters: Vec<Box<dyn FilterPredicate>>,
}

impl UnschedulablePodEvaluator {
    /// Create a new evaluator
    pub fn new(params: UnschedulablePodParams) -> Self {
        Self {
            params,
            filters: unschedulable_pod_filters(),
        }
    }

    /// Parameters this evaluator applies
    pub fn params(&self) -> &UnschedulablePodParams {
        &self.params
    }

    /// Evaluate an event, reporting which predicate rejected it
    pub fn check(&self, event: Option<&EventRecord>) -> Verdict {
        let event = match event {
            Some(event) => event,
            None => return Verdict::NoEvent,
        };

        let context = EvaluationContext::new(event, &self.params);
        for filter in &self.filters {
            let result = filter.filter(&context);
            if !result.passed {
                return Verdict::Skip {
                    predicate: filter.name().to_string(),
                    reason: result.reason.unwrap_or_default(),
                };
            }
        }

        match build_finding(event) {
            Some(finding) => Verdict::Match(finding),
            // Unreachable once InvolvesPod and PersistedPastGrace have passed
            None => Verdict::Skip {
                predicate: "BuildFinding".to_string(),
                reason: "Event lacks the fields a finding needs".to_string(),
            },
        }
    }

    /// Evaluate an event, returning a finding if every predicate passes
    pub fn evaluate(&self, event: Option<&EventRecord>) -> Option<Finding> {
        self.check(event).into_finding()
    }
}

/// Evaluate one event against the given params
pub fn evaluate(event: Option<&EventRecord>, params: &UnschedulablePodParams) -> Option<Finding> {
    UnschedulablePodEvaluator::new(params.clone()).evaluate(event)
}

/// Run the action: pull the event from `source`, register any finding on `sink`
///
/// Returns whether a finding was registered.
pub fn run_action<S, K>(source: &S, sink: &mut K, params: &UnschedulablePodParams) -> bool
where
    S: EventSource + ?Sized,
    K: FindingSink + ?Sized,
{
    match evaluate(source.event(), params) {
        Some(finding) => {
            sink.add_finding(finding);
            true
        }
        None => false,
    }
}

fn build_finding(event: &EventRecord) -> Option<Finding> {
    let pod = event.involved_object.as_ref()?;
    let name = pod.name.as_deref()?;
    let namespace = pod.namespace.as_deref()?;
    let span = event_span(
        event.first_timestamp.as_deref(),
        event.last_timestamp.as_deref(),
    )?;

    let mut finding = Finding::new(
        format!("Unschedulable pod {} in namespace {}", name, namespace),
        FindingSource::KubernetesApiServer,
        FindingSeverity::High,
        AGGREGATION_KEY,
    )
    .with_subject(FindingSubject {
        name: name.to_string(),
        namespace: namespace.to_string(),
        kind: ObjectKind::Pod,
    });

    let mut blocks = vec![EnrichmentBlock::markdown(format!(
        "For the past {} hours",
        format_duration(span)
    ))];
    if let Some(message) = event.message.as_deref().filter(|m| !m.is_empty()) {
        blocks.push(EnrichmentBlock::quoted(message));
    }
    finding.add_enrichment(blocks);

    Some(finding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use podwatch_core::{EventReason, ObjectReference};

    fn create_test_event(name: &str, last: &str, message: &str) -> EventRecord {
        EventRecord {
            reason: Some(EventReason::FailedScheduling),
            involved_object: Some(ObjectReference::new(ObjectKind::Pod, name, "default")),
            first_timestamp: Some("2024-01-01T00:00:00Z".to_string()),
            last_timestamp: Some(last.to_string()),
            message: Some(message.to_string()),
        }
    }

    fn scenario_a() -> EventRecord {
        create_test_event("web-1", "2024-01-01T00:31:00Z", "0/3 nodes available")
    }

    fn params() -> UnschedulablePodParams {
        UnschedulablePodParams {
            namespace: None,
            grace_minutes: 30,
        }
    }

    #[test]
    fn test_matching_event_produces_finding() {
        let finding = evaluate(Some(&scenario_a()), &params()).unwrap();

        assert_eq!(finding.title, "Unschedulable pod web-1 in namespace default");
        assert_eq!(finding.source, FindingSource::KubernetesApiServer);
        assert_eq!(finding.severity, FindingSeverity::High);
        assert_eq!(finding.aggregation_key, "unschedulable_pod");
        assert_eq!(
            finding.enrichments,
            vec![
                EnrichmentBlock::Markdown("For the past 0:31:00 hours".to_string()),
                EnrichmentBlock::Markdown("```0/3 nodes available```".to_string()),
            ]
        );

        let subject = finding.subject.unwrap();
        assert_eq!(subject.name, "web-1");
        assert_eq!(subject.namespace, "default");
        assert_eq!(subject.kind, ObjectKind::Pod);
    }

    #[test]
    fn test_excluded_prefix_is_quiet() {
        let event = create_test_event("airflow-sensor-7", "2024-01-01T00:31:00Z", "0/3 nodes available");
        assert!(evaluate(Some(&event), &params()).is_none());
    }

    #[test]
    fn test_short_span_is_quiet() {
        let event = create_test_event("web-1", "2024-01-01T00:20:00Z", "0/3 nodes available");
        assert!(evaluate(Some(&event), &params()).is_none());
    }

    #[test]
    fn test_exact_threshold_matches() {
        let event = create_test_event("web-1", "2024-01-01T00:30:00Z", "0/3 nodes available");
        let finding = evaluate(Some(&event), &params()).unwrap();
        assert_eq!(finding.enrichments[0].text(), "For the past 0:30:00 hours");
    }

    #[test]
    fn test_empty_or_absent_message_has_single_block() {
        let event = create_test_event("web-1", "2024-01-01T00:31:00Z", "");
        let finding = evaluate(Some(&event), &params()).unwrap();
        assert_eq!(finding.enrichments.len(), 1);

        let mut event = scenario_a();
        event.message = None;
        let finding = evaluate(Some(&event), &params()).unwrap();
        assert_eq!(finding.enrichments.len(), 1);
    }

    #[test]
    fn test_no_event_is_quiet() {
        assert!(evaluate(None, &params()).is_none());
        let evaluator = UnschedulablePodEvaluator::new(params());
        assert_eq!(evaluator.check(None), Verdict::NoEvent);
    }

    #[test]
    fn test_other_reasons_and_kinds_are_quiet() {
        let mut event = scenario_a();
        event.reason = Some(EventReason::Other("FailedMount".to_string()));
        assert!(evaluate(Some(&event), &params()).is_none());

        let mut event = scenario_a();
        event.involved_object.as_mut().unwrap().kind = Some(ObjectKind::Deployment);
        assert!(evaluate(Some(&event), &params()).is_none());

        let mut event = scenario_a();
        event.involved_object = None;
        assert!(evaluate(Some(&event), &params()).is_none());
    }

    #[test]
    fn test_namespace_filter() {
        let other = UnschedulablePodParams {
            namespace: Some("kube-system".to_string()),
            ..params()
        };
        assert!(evaluate(Some(&scenario_a()), &other).is_none());

        let same = UnschedulablePodParams {
            namespace: Some("default".to_string()),
            ..params()
        };
        assert!(evaluate(Some(&scenario_a()), &same).is_some());
    }

    #[test]
    fn test_missing_or_malformed_timestamps_are_quiet() {
        let mut event = scenario_a();
        event.last_timestamp = None;
        assert!(evaluate(Some(&event), &params()).is_none());

        let mut event = scenario_a();
        event.first_timestamp = Some("2024-01-01T00:00:00+00:00".to_string());
        assert!(evaluate(Some(&event), &params()).is_none());
    }

    #[test]
    fn test_long_span_rendering() {
        let event = create_test_event("web-1", "2024-01-02T02:05:00Z", "");
        let finding = evaluate(Some(&event), &params()).unwrap();
        assert_eq!(finding.enrichments[0].text(), "For the past 1 day, 2:05:00 hours");
    }

    #[test]
    fn test_check_reports_rejecting_predicate() {
        let evaluator = UnschedulablePodEvaluator::new(params());

        let event = create_test_event("airflow-sensor-7", "2024-01-01T00:31:00Z", "");
        match evaluator.check(Some(&event)) {
            Verdict::Skip { predicate, reason } => {
                assert_eq!(predicate, "NameNotExcluded");
                assert!(reason.contains("airflow-sensor-7"));
            }
            other => panic!("expected skip, got {:?}", other),
        }

        let event = create_test_event("web-1", "2024-01-01T00:20:00Z", "");
        assert!(matches!(
            evaluator.check(Some(&event)),
            Verdict::Skip { ref predicate, .. } if predicate == "PersistedPastGrace"
        ));
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let event = scenario_a();
        let evaluator = UnschedulablePodEvaluator::new(params());

        let first = evaluator.evaluate(Some(&event));
        let second = evaluator.evaluate(Some(&event));
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(event, scenario_a());
    }

    #[test]
    fn test_run_action_registers_on_sink() {
        let mut sink: Vec<Finding> = Vec::new();

        assert!(run_action(&scenario_a(), &mut sink, &params()));
        assert_eq!(sink.len(), 1);

        let none: Option<EventRecord> = None;
        assert!(!run_action(&none, &mut sink, &params()));

        let quiet = create_test_event("web-1", "2024-01-01T00:20:00Z", "");
        assert!(!run_action(&quiet, &mut sink, &params()));
        assert_eq!(sink.len(), 1);
    }
}
