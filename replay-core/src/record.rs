//! Typed telemetry records

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single position report from an agent
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionSample {
    /// Agent that reported this position
    pub agent_id: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Report time in unix milliseconds
    pub timestamp_ms: i64,
    /// Size of the payload the agent was carrying, in bytes
    pub payload_size: u64,
}

impl PositionSample {
    /// Creates a new position sample
    pub fn new(
        agent_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        timestamp_ms: i64,
        payload_size: u64,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            latitude,
            longitude,
            timestamp_ms,
            payload_size,
        }
    }
}

/// Kind of a status event.
///
/// Only three tags carry meaning; anything else is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    StartSearch,
    StopSearch,
    ImageReceived,
    Other(String),
}

impl EventKind {
    /// Parses a raw event tag
    pub fn parse(tag: &str) -> Self {
        match tag {
            "startSearch" => Self::StartSearch,
            "stopSearch" => Self::StopSearch,
            "imageReceived" => Self::ImageReceived,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the raw tag as it appears in the logs
    pub fn as_str(&self) -> &str {
        match self {
            Self::StartSearch => "startSearch",
            Self::StopSearch => "stopSearch",
            Self::ImageReceived => "imageReceived",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this event marks a payload moving between agents
    pub fn is_relay(&self) -> bool {
        matches!(self, Self::ImageReceived)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete status event
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusEvent {
    /// Agent that emitted the event (the sender, for relays)
    pub from_agent_id: String,
    /// Receiving agent, only set for relays
    pub to_agent_id: Option<String>,
    /// Event time in unix milliseconds
    pub timestamp_ms: i64,
    pub kind: EventKind,
}

impl StatusEvent {
    /// Creates a new status event. An empty `to_agent_id` is treated as absent.
    pub fn new(
        from_agent_id: impl Into<String>,
        to_agent_id: Option<String>,
        timestamp_ms: i64,
        kind: EventKind,
    ) -> Self {
        Self {
            from_agent_id: from_agent_id.into(),
            to_agent_id: to_agent_id.filter(|to| !to.is_empty()),
            timestamp_ms,
            kind,
        }
    }
}

impl std::fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} : {} : {}",
            self.from_agent_id,
            self.to_agent_id.as_deref().unwrap_or(""),
            self.kind,
            self.timestamp_ms
        )
    }
}

/// A classified telemetry record
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Position(PositionSample),
    Event(StatusEvent),
}

impl Record {
    /// Ordering key shared by both record kinds
    pub fn timestamp_ms(&self) -> i64 {
        match self {
            Self::Position(p) => p.timestamp_ms,
            Self::Event(e) => e.timestamp_ms,
        }
    }
}
