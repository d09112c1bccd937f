//! Per-agent timelines answering point-in-time queries

use crate::frame::{AgentPoint, RelayAssociation, StatusColor};
use crate::record::{EventKind, PositionSample, StatusEvent};

/// Chronologically sorted position and event streams of one agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTimeline {
    agent_id: String,
    positions: Vec<PositionSample>,
    events: Vec<StatusEvent>,
    /// Indices into `events` of relay events, in timestamp order
    relays: Vec<usize>,
}

impl AgentTimeline {
    /// Creates a new timeline, sorting both streams by timestamp.
    ///
    /// The sort is stable: records sharing a timestamp keep their log order,
    /// so the last of them is the one `position_at`/`status_at` report.
    pub fn new(
        agent_id: impl Into<String>,
        mut positions: Vec<PositionSample>,
        mut events: Vec<StatusEvent>,
    ) -> Self {
        let agent_id = agent_id.into();

        if !positions.is_sorted_by_key(|p| p.timestamp_ms) {
            tracing::debug!(agent = %agent_id, "position samples out of order, sorting");
            positions.sort_by_key(|p| p.timestamp_ms);
        }
        if !events.is_sorted_by_key(|e| e.timestamp_ms) {
            tracing::debug!(agent = %agent_id, "status events out of order, sorting");
            events.sort_by_key(|e| e.timestamp_ms);
        }

        let relays = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind.is_relay())
            .map(|(i, _)| i)
            .collect();

        Self {
            agent_id,
            positions,
            events,
            relays,
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn positions(&self) -> &[PositionSample] {
        &self.positions
    }

    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    /// Earliest position sample
    pub fn first_position(&self) -> Option<&PositionSample> {
        self.positions.first()
    }

    /// Latest position sample
    pub fn last_position(&self) -> Option<&PositionSample> {
        self.positions.last()
    }

    /// Whether this agent never reported a position
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Latest position sample at or before `timestamp_ms`
    pub fn position_at(&self, timestamp_ms: i64) -> Option<&PositionSample> {
        let idx = self
            .positions
            .partition_point(|p| p.timestamp_ms <= timestamp_ms);
        idx.checked_sub(1).map(|i| &self.positions[i])
    }

    /// Status derived from the latest event at or before `timestamp_ms`.
    ///
    /// Only meaningful once `position_at` returns a sample.
    pub fn status_at(&self, timestamp_ms: i64) -> StatusColor {
        let idx = self.events.partition_point(|e| e.timestamp_ms <= timestamp_ms);
        match idx.checked_sub(1).map(|i| &self.events[i].kind) {
            None | Some(EventKind::StopSearch) => StatusColor::Idle,
            Some(EventKind::StartSearch) => StatusColor::Searching,
            Some(_) => StatusColor::Active,
        }
    }

    /// Point of this agent at `timestamp_ms`, absent before its first sample
    pub fn point_at(&self, timestamp_ms: i64) -> Option<AgentPoint> {
        let position = self.position_at(timestamp_ms)?;
        Some(AgentPoint {
            agent_id: self.agent_id.clone(),
            latitude: position.latitude,
            longitude: position.longitude,
            status: self.status_at(timestamp_ms),
        })
    }

    /// Relay association of the relay event closest to `timestamp_ms`.
    ///
    /// Searches the whole stream, so an event slightly after the instant can
    /// match. Ties go to the earlier event. Returns `None` unless the distance
    /// is strictly below `window_ms`.
    pub fn relay_near(&self, timestamp_ms: i64, window_ms: i64) -> Option<RelayAssociation> {
        let event = self.nearest_relay(timestamp_ms)?;
        if event.timestamp_ms.abs_diff(timestamp_ms) >= window_ms.max(0) as u64 {
            return None;
        }
        let to = event.to_agent_id.as_ref()?;
        Some(RelayAssociation::new(event.from_agent_id.clone(), to.clone()))
    }

    fn nearest_relay(&self, timestamp_ms: i64) -> Option<&StatusEvent> {
        let relay_ts = |i: usize| self.events[self.relays[i]].timestamp_ms;

        let split = self.relays.partition_point(|&e| self.events[e].timestamp_ms < timestamp_ms);

        // Earliest relay sharing the timestamp of the last one before the instant
        let before = split.checked_sub(1).map(|i| {
            let ts = relay_ts(i);
            self.relays.partition_point(|&e| self.events[e].timestamp_ms < ts)
        });
        let after = (split < self.relays.len()).then_some(split);

        let chosen = match (before, after) {
            (Some(b), Some(a)) => {
                let before_diff = relay_ts(b).abs_diff(timestamp_ms);
                let after_diff = relay_ts(a).abs_diff(timestamp_ms);
                if before_diff <= after_diff {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };

        Some(&self.events[self.relays[chosen]])
    }
}
