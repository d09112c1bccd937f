//! Frame data structures handed to renderers

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status classification of an agent at a query instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatusColor {
    Idle,
    Searching,
    Active,
}

impl StatusColor {
    /// Color name used by renderers
    pub fn color_name(self) -> &'static str {
        match self {
            Self::Idle => "gray",
            Self::Searching => "blue",
            Self::Active => "red",
        }
    }

    /// RGBA value used by raster renderers
    pub fn rgba(self) -> [u8; 4] {
        match self {
            Self::Idle => [128, 128, 128, 255],
            Self::Searching => [0, 0, 255, 255],
            Self::Active => [255, 0, 0, 255],
        }
    }
}

/// Where an agent is and what it is doing at one instant
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentPoint {
    pub agent_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: StatusColor,
}

/// A payload moving from one agent to another near an instant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelayAssociation {
    pub from_agent_id: String,
    pub to_agent_id: String,
}

impl RelayAssociation {
    /// Creates a new relay association
    pub fn new(from_agent_id: impl Into<String>, to_agent_id: impl Into<String>) -> Self {
        Self {
            from_agent_id: from_agent_id.into(),
            to_agent_id: to_agent_id.into(),
        }
    }
}

/// Immutable snapshot of every live agent at one query instant.
///
/// Points follow the collection's agent order, relays follow the order of
/// the agents that produced them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Query instant in unix milliseconds
    pub timestamp_ms: i64,
    pub points: Vec<AgentPoint>,
    pub relays: Vec<RelayAssociation>,
}

impl Frame {
    /// Creates a new frame
    pub fn new(timestamp_ms: i64, points: Vec<AgentPoint>, relays: Vec<RelayAssociation>) -> Self {
        Self {
            timestamp_ms,
            points,
            relays,
        }
    }

    /// Gets the point of an agent, if it is present in this frame
    pub fn point(&self, agent_id: &str) -> Option<&AgentPoint> {
        self.points.iter().find(|p| p.agent_id == agent_id)
    }

    /// Relays whose sender and receiver both have a point in this frame,
    /// paired with those points
    pub fn drawable_relays(&self) -> Vec<(&AgentPoint, &AgentPoint)> {
        self.relays
            .iter()
            .filter_map(|relay| {
                let sender = self.point(&relay.from_agent_id)?;
                let receiver = self.point(&relay.to_agent_id)?;
                Some((sender, receiver))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, status: StatusColor) -> AgentPoint {
        AgentPoint {
            agent_id: id.to_string(),
            latitude: 1.0,
            longitude: 2.0,
            status,
        }
    }

    #[test]
    fn test_drawable_relays_skip_missing_endpoints() {
        let frame = Frame::new(
            0,
            vec![point("a", StatusColor::Active), point("b", StatusColor::Idle)],
            vec![
                RelayAssociation::new("a", "b"),
                RelayAssociation::new("a", "ghost"),
                RelayAssociation::new("ghost", "b"),
            ],
        );

        let drawable = frame.drawable_relays();
        assert_eq!(drawable.len(), 1);
        assert_eq!(drawable[0].0.agent_id, "a");
        assert_eq!(drawable[0].1.agent_id, "b");
        // Undrawable associations stay in the frame itself
        assert_eq!(frame.relays.len(), 3);
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(StatusColor::Idle.color_name(), "gray");
        assert_eq!(StatusColor::Searching.color_name(), "blue");
        assert_eq!(StatusColor::Active.color_name(), "red");
    }
}
