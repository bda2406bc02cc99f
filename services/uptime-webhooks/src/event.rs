//! State-change events and the bus they travel on

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::resource::ResourceRef;

/// The kind of state transition a resource went through
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Up,
    Down,
    Paused,
    Restarted,
    /// Anything else the event producer emits; carried through untouched
    Unrecognized(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Up => "up",
            EventKind::Down => "down",
            EventKind::Paused => "paused",
            EventKind::Restarted => "restarted",
            EventKind::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s {
            "up" => EventKind::Up,
            "down" => EventKind::Down,
            "paused" => EventKind::Paused,
            "restarted" => EventKind::Restarted,
            other => EventKind::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        EventKind::from(s.as_str())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A persisted state change for one monitored resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChangeEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub resource_ref: ResourceRef,
}

impl StateChangeEvent {
    pub fn new(kind: EventKind, timestamp: DateTime<Utc>, resource_ref: ResourceRef) -> Self {
        Self {
            kind,
            timestamp,
            resource_ref,
        }
    }
}

const DEFAULT_BUS_CAPACITY: usize = 256;

/// Fan-out channel the storage layer publishes state changes on
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StateChangeEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to every current listener.
    ///
    /// Never blocks and never fails the publisher. Returns the number of
    /// listeners the event was handed to.
    pub fn publish(&self, event: StateChangeEvent) -> usize {
        match self.sender.send(event) {
            Ok(listeners) => listeners,
            Err(_) => {
                tracing::debug!("State change published with no listeners");
                0
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub(crate) fn receiver(&self) -> broadcast::Receiver<StateChangeEvent> {
        self.sender.subscribe()
    }
}
