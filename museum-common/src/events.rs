//! Edit-log event bus
//!
//! Every row written to `edit_logs` is also broadcast here so supervisors
//! watching the SSE stream see edits as they happen.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::db::EditLogEntry;

/// Kind of record an employee edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditType {
    Artifact,
    Event,
    Exhibit,
}

impl EditType {
    /// Value stored in `edit_logs.edit_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            EditType::Artifact => "artifact",
            EditType::Event => "event",
            EditType::Exhibit => "exhibit",
        }
    }

    /// Table and key column holding the edited record
    pub fn target_table(&self) -> (&'static str, &'static str) {
        match self {
            EditType::Artifact => ("artifacts", "artid"),
            EditType::Event => ("events", "evid"),
            EditType::Exhibit => ("exhibits", "exid"),
        }
    }
}

/// Events broadcast by the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MuseumEvent {
    /// An employee edit was written to the audit trail
    EditRecorded { entry: EditLogEntry },
}

impl MuseumEvent {
    /// SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            MuseumEvent::EditRecorded { .. } => "EditRecorded",
        }
    }

    /// Supervisor the event is addressed to
    pub fn supervisor_email(&self) -> &str {
        match self {
            MuseumEvent::EditRecorded { entry } => &entry.semail,
        }
    }
}

/// Broadcast channel for [`MuseumEvent`]s
///
/// Slow subscribers lose the oldest events rather than blocking writers.
pub struct EventBus {
    tx: broadcast::Sender<MuseumEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<MuseumEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: MuseumEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(semail: &str) -> EditLogEntry {
        EditLogEntry {
            edit_id: 1,
            eemail: "emp@museum.org".to_string(),
            semail: semail.to_string(),
            edit_type: "artifact".to_string(),
            target_id: 7,
            edit_time: "2024-05-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_edit_type_targets() {
        assert_eq!(EditType::Artifact.target_table(), ("artifacts", "artid"));
        assert_eq!(EditType::Exhibit.as_str(), "exhibit");
    }

    #[tokio::test]
    async fn test_subscribers_receive_emitted_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit_lossy(MuseumEvent::EditRecorded { entry: entry("sup@museum.org") });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "EditRecorded");
        assert_eq!(event.supervisor_email(), "sup@museum.org");
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.emit_lossy(MuseumEvent::EditRecorded { entry: entry("sup@museum.org") });

        // Later subscribers only see later events
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(MuseumEvent::EditRecorded {
            entry: entry("sup@museum.org"),
        })
        .unwrap();
        assert_eq!(json["type"], "EditRecorded");
        assert_eq!(json["entry"]["type"], "artifact");
    }
}
