use crate::{PodwatchError, Result};
use k8s_openapi::api::core::v1::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format of `firstTimestamp`/`lastTimestamp` on core/v1 Events
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Reason attached to a Kubernetes event
///
/// Well-known reasons get their own variant; anything else is carried
/// through verbatim so the wire value survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventReason {
    FailedScheduling,
    Scheduled,
    Preempted,
    BackOff,
    Unhealthy,
    Other(String),
}

impl EventReason {
    /// The reason as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Self::FailedScheduling => "FailedScheduling",
            Self::Scheduled => "Scheduled",
            Self::Preempted => "Preempted",
            Self::BackOff => "BackOff",
            Self::Unhealthy => "Unhealthy",
            Self::Other(reason) => reason,
        }
    }
}

impl From<String> for EventReason {
    fn from(value: String) -> Self {
        match value.as_str() {
            "FailedScheduling" => Self::FailedScheduling,
            "Scheduled" => Self::Scheduled,
            "Preempted" => Self::Preempted,
            "BackOff" => Self::BackOff,
            "Unhealthy" => Self::Unhealthy,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for EventReason {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EventReason> for String {
    fn from(value: EventReason) -> Self {
        match value {
            EventReason::Other(reason) => reason,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of the object an event refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    Pod,
    Node,
    Deployment,
    ReplicaSet,
    StatefulSet,
    DaemonSet,
    Job,
    Other(String),
}

impl ObjectKind {
    /// The kind as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pod => "Pod",
            Self::Node => "Node",
            Self::Deployment => "Deployment",
            Self::ReplicaSet => "ReplicaSet",
            Self::StatefulSet => "StatefulSet",
            Self::DaemonSet => "DaemonSet",
            Self::Job => "Job",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for ObjectKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pod" => Self::Pod,
            "Node" => Self::Node,
            "Deployment" => Self::Deployment,
            "ReplicaSet" => Self::ReplicaSet,
            "StatefulSet" => Self::StatefulSet,
            "DaemonSet" => Self::DaemonSet,
            "Job" => Self::Job,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ObjectKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ObjectKind> for String {
    fn from(value: ObjectKind) -> Self {
        match value {
            ObjectKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the object an event is about (`involvedObject`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectReference {
    /// Create a reference to a namespaced object
    pub fn new(kind: ObjectKind, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            name: Some(name.into()),
            namespace: Some(namespace.into()),
        }
    }
}

/// The subset of a core/v1 Event consumed by podwatch rules
///
/// Timestamps are kept as raw strings: a malformed timestamp must not
/// fail deserialization of the whole event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<EventReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub involved_object: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        let reference = &event.involved_object;
        let involved_object = if reference.kind.is_none()
            && reference.name.is_none()
            && reference.namespace.is_none()
        {
            None
        } else {
            Some(ObjectReference {
                kind: reference.kind.clone().map(ObjectKind::from),
                name: reference.name.clone(),
                namespace: reference.namespace.clone(),
            })
        };

        Self {
            reason: event.reason.clone().map(EventReason::from),
            involved_object,
            first_timestamp: event
                .first_timestamp
                .as_ref()
                .map(|t| t.0.format(EVENT_TIMESTAMP_FORMAT).to_string()),
            last_timestamp: event
                .last_timestamp
                .as_ref()
                .map(|t| t.0.format(EVENT_TIMESTAMP_FORMAT).to_string()),
            message: event.message.clone(),
        }
    }
}

/// Parse a JSON or YAML document holding events
///
/// Accepts a single Event object, a sequence of Events, or an EventList
/// (`{"items": [...]}`). An empty document yields no events.
pub fn events_from_document(data: &str) -> Result<Vec<EventRecord>> {
    let document: serde_yaml::Value = serde_yaml::from_str(data).map_err(|e| {
        PodwatchError::serialization_error(
            format!("Failed to parse event document: {}", e),
            Some(Box::new(e)),
        )
    })?;

    let items = match document {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        serde_yaml::Value::Sequence(items) => items,
        serde_yaml::Value::Mapping(mut mapping) => match mapping.remove("items") {
            Some(serde_yaml::Value::Sequence(items)) => items,
            Some(serde_yaml::Value::Null) => Vec::new(),
            Some(_) => {
                return Err(PodwatchError::invalid_event_document(
                    "'items' must be a list of events",
                ))
            }
            None => vec![serde_yaml::Value::Mapping(mapping)],
        },
        _ => {
            return Err(PodwatchError::invalid_event_document(
                "expected an object or a list at the top level",
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_yaml::from_value(item).map_err(|e| {
                PodwatchError::serialization_error(
                    format!("Failed to decode event #{}: {}", idx, e),
                    Some(Box::new(e)),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

    #[test]
    fn test_reason_wire_values() {
        assert_eq!(EventReason::from("FailedScheduling"), EventReason::FailedScheduling);
        assert_eq!(
            EventReason::from("FailedMount"),
            EventReason::Other("FailedMount".to_string())
        );
        assert_eq!(String::from(EventReason::FailedScheduling), "FailedScheduling");
        assert_eq!(EventReason::Other("Evicted".to_string()).to_string(), "Evicted");
    }

    #[test]
    fn test_kind_is_case_sensitive() {
        assert_eq!(ObjectKind::from("Pod"), ObjectKind::Pod);
        assert_eq!(ObjectKind::from("pod"), ObjectKind::Other("pod".to_string()));
    }

    #[test]
    fn test_deserialize_event_record() {
        let event: EventRecord = serde_json::from_value(serde_json::json!({
            "reason": "FailedScheduling",
            "involvedObject": {"kind": "Pod", "name": "web-1", "namespace": "default", "uid": "abc"},
            "firstTimestamp": "2024-01-01T00:00:00Z",
            "lastTimestamp": "not-a-time",
            "message": "0/3 nodes available",
            "count": 12
        }))
        .unwrap();

        assert_eq!(event.reason, Some(EventReason::FailedScheduling));
        let reference = event.involved_object.unwrap();
        assert_eq!(reference.kind, Some(ObjectKind::Pod));
        assert_eq!(reference.name.as_deref(), Some("web-1"));
        assert_eq!(event.last_timestamp.as_deref(), Some("not-a-time"));
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let event = EventRecord {
            reason: Some(EventReason::FailedScheduling),
            involved_object: Some(ObjectReference::new(ObjectKind::Pod, "web-1", "default")),
            ..Default::default()
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["reason"], "FailedScheduling");
        assert_eq!(value["involvedObject"]["kind"], "Pod");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_from_k8s_event() {
        let mut event = Event::default();
        event.reason = Some("FailedScheduling".to_string());
        event.involved_object.kind = Some("Pod".to_string());
        event.involved_object.name = Some("web-1".to_string());
        event.involved_object.namespace = Some("default".to_string());
        event.first_timestamp = Some(Time(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        event.last_timestamp = Some(Time(Utc.with_ymd_and_hms(2024, 1, 1, 0, 31, 0).unwrap()));

        let record = EventRecord::from(&event);
        assert_eq!(record.reason, Some(EventReason::FailedScheduling));
        assert_eq!(record.first_timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(record.last_timestamp.as_deref(), Some("2024-01-01T00:31:00Z"));
        assert!(record.message.is_none());
    }

    #[test]
    fn test_from_k8s_event_without_reference() {
        let record = EventRecord::from(&Event::default());
        assert!(record.involved_object.is_none());
        assert!(record.reason.is_none());
    }

    #[test]
    fn test_events_from_single_object() {
        let events = events_from_document(r#"{"reason": "Scheduled"}"#).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].reason, Some(EventReason::Scheduled));
    }

    #[test]
    fn test_events_from_event_list() {
        let doc = r#"
apiVersion: v1
kind: EventList
items:
  - reason: FailedScheduling
    involvedObject: {kind: Pod, name: web-1, namespace: default}
  - reason: Pulled
"#;
        let events = events_from_document(doc).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].reason, Some(EventReason::Other("Pulled".to_string())));
    }

    #[test]
    fn test_events_from_array_and_empty() {
        let events = events_from_document(r#"[{"reason": "BackOff"}, {}]"#).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], EventRecord::default());

        assert!(events_from_document("").unwrap().is_empty());
    }

    #[test]
    fn test_events_from_invalid_document() {
        assert!(matches!(
            events_from_document("42"),
            Err(PodwatchError::InvalidEventDocument { .. })
        ));
        assert!(matches!(
            events_from_document("items: 3"),
            Err(PodwatchError::InvalidEventDocument { .. })
        ));
        assert!(matches!(
            events_from_document("[1, 2]"),
            Err(PodwatchError::SerializationError { .. })
        ));
    }
}
