//! Collection of all agent timelines and its global extent

use crate::timeline::AgentTimeline;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Latitude/longitude extent of every recorded position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl SpatialBounds {
    /// Latitude span in degrees
    pub fn latitude_span(&self) -> f64 {
        self.max_latitude - self.min_latitude
    }

    /// Longitude span in degrees
    pub fn longitude_span(&self) -> f64 {
        self.max_longitude - self.min_longitude
    }
}

/// Every agent timeline of a replay, ordered by agent id
#[derive(Debug, Clone, Default)]
pub struct TimelineCollection {
    timelines: Vec<AgentTimeline>,
}

impl TimelineCollection {
    /// Creates a new collection. Agent ids must be unique.
    pub fn new(mut timelines: Vec<AgentTimeline>) -> Result<Self> {
        timelines.sort_by(|a, b| a.agent_id().cmp(b.agent_id()));
        if let Some(pair) = timelines
            .windows(2)
            .find(|w| w[0].agent_id() == w[1].agent_id())
        {
            return Err(Error::DuplicateAgent(pair[0].agent_id().to_string()));
        }
        Ok(Self { timelines })
    }

    /// Gets the timeline of an agent
    pub fn get(&self, agent_id: &str) -> Option<&AgentTimeline> {
        self.timelines
            .binary_search_by(|t| t.agent_id().cmp(agent_id))
            .ok()
            .map(|i| &self.timelines[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AgentTimeline> {
        self.timelines.iter()
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Earliest first-position timestamp across all agents
    pub fn global_start_time(&self) -> Result<i64> {
        self.check_non_empty()?;
        Ok(self
            .timelines
            .iter()
            .filter_map(|t| t.first_position())
            .map(|p| p.timestamp_ms)
            .min()
            .unwrap_or_default())
    }

    /// Latest last-position timestamp across all agents
    pub fn global_end_time(&self) -> Result<i64> {
        self.check_non_empty()?;
        Ok(self
            .timelines
            .iter()
            .filter_map(|t| t.last_position())
            .map(|p| p.timestamp_ms)
            .max()
            .unwrap_or_default())
    }

    /// `(global_start_time, global_end_time)`
    pub fn time_range(&self) -> Result<(i64, i64)> {
        Ok((self.global_start_time()?, self.global_end_time()?))
    }

    /// Extent of every position of every agent
    pub fn spatial_bounds(&self) -> Result<SpatialBounds> {
        self.check_non_empty()?;
        let mut bounds = SpatialBounds {
            min_latitude: f64::INFINITY,
            max_latitude: f64::NEG_INFINITY,
            min_longitude: f64::INFINITY,
            max_longitude: f64::NEG_INFINITY,
        };
        for position in self.timelines.iter().flat_map(|t| t.positions()) {
            bounds.min_latitude = bounds.min_latitude.min(position.latitude);
            bounds.max_latitude = bounds.max_latitude.max(position.latitude);
            bounds.min_longitude = bounds.min_longitude.min(position.longitude);
            bounds.max_longitude = bounds.max_longitude.max(position.longitude);
        }
        Ok(bounds)
    }

    /// Global extent needs at least one agent and a position for every agent
    fn check_non_empty(&self) -> Result<()> {
        if self.timelines.is_empty() {
            return Err(Error::EmptyInput("timeline collection has no agents".into()));
        }
        if let Some(empty) = self.timelines.iter().find(|t| t.is_empty()) {
            return Err(Error::EmptyInput(format!(
                "agent '{}' has no position samples",
                empty.agent_id()
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TimelineCollection {
    type Item = &'a AgentTimeline;
    type IntoIter = std::slice::Iter<'a, AgentTimeline>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
