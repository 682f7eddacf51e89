use crate::event::EventRecord;
use crate::finding::Finding;

/// Capability that hands an action the event it was triggered by
///
/// Returning `None` means the trigger fired without an event attached.
pub trait EventSource {
    /// The event being processed, if any
    fn event(&self) -> Option<&EventRecord>;
}

/// Capability that receives findings produced by an action
pub trait FindingSink {
    /// Register a finding with the host
    fn add_finding(&mut self, finding: Finding);
}

impl EventSource for EventRecord {
    fn event(&self) -> Option<&EventRecord> {
        Some(self)
    }
}

impl EventSource for Option<EventRecord> {
    fn event(&self) -> Option<&EventRecord> {
        self.as_ref()
    }
}

impl FindingSink for Vec<Finding> {
    fn add_finding(&mut self, finding: Finding) {
        self.push(finding);
    }
}
