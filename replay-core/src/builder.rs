//! Frame reconstruction over a timeline collection

use crate::collection::TimelineCollection;
use crate::config::ReplayConfig;
use crate::frame::Frame;
use crate::sampler::FrameSampler;
use crate::Result;

/// Builds one frame per query instant from a timeline collection
#[derive(Debug, Clone)]
pub struct FrameBuilder<'a> {
    collection: &'a TimelineCollection,
    config: ReplayConfig,
    sampler: FrameSampler,
}

impl<'a> FrameBuilder<'a> {
    /// Creates a new frame builder.
    ///
    /// Fails on an invalid configuration or when the collection has no
    /// global time range.
    pub fn new(collection: &'a TimelineCollection, config: ReplayConfig) -> Result<Self> {
        config.validate()?;
        let (start_ms, end_ms) = collection.time_range()?;
        let sampler = FrameSampler::new(start_ms, end_ms, config.step_ms)?;
        Ok(Self {
            collection,
            config,
            sampler,
        })
    }

    /// Query instants spanning the collection's time range
    pub fn instants(&self) -> FrameSampler {
        self.sampler.clone()
    }

    /// Number of frames `frames` yields
    pub fn frame_count(&self) -> usize {
        self.instants().len()
    }

    /// Builds the frame at a single instant
    pub fn frame_at(&self, timestamp_ms: i64) -> Frame {
        let points = self
            .collection
            .iter()
            .filter_map(|timeline| timeline.point_at(timestamp_ms))
            .collect();

        let relays = self
            .collection
            .iter()
            .filter_map(|timeline| timeline.relay_near(timestamp_ms, self.config.relay_window_ms))
            .filter(|relay| {
                let known = self.collection.get(&relay.to_agent_id).is_some();
                if !known {
                    tracing::trace!(
                        from = %relay.from_agent_id,
                        to = %relay.to_agent_id,
                        timestamp_ms,
                        "dropping relay to unknown agent"
                    );
                }
                known
            })
            .collect();

        Frame::new(timestamp_ms, points, relays)
    }

    /// Lazily builds every frame in time order
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.instants().map(move |t| self.frame_at(t))
    }

    /// Builds every frame up front
    pub fn build_all(&self) -> Vec<Frame> {
        let frames: Vec<Frame> = self.frames().collect();
        tracing::debug!(
            frames = frames.len(),
            agents = self.collection.len(),
            "built replay frames"
        );
        frames
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{RelayAssociation, StatusColor};
    use crate::record::{EventKind, PositionSample, StatusEvent};
    use crate::timeline::AgentTimeline;
    use crate::Error;

    fn two_agent_collection() -> TimelineCollection {
        let a = AgentTimeline::new(
            "A",
            vec![PositionSample::new("A", 10.0, 20.0, 0, 0)],
            vec![
                StatusEvent::new("A", None, 0, EventKind::StartSearch),
                StatusEvent::new("A", Some("B".into()), 5_000, EventKind::ImageReceived),
            ],
        );
        let b = AgentTimeline::new(
            "B",
            vec![
                PositionSample::new("B", 11.0, 21.0, 0, 0),
                PositionSample::new("B", 11.0, 21.0, 10_000, 0),
            ],
            vec![],
        );
        TimelineCollection::new(vec![b, a]).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let collection = two_agent_collection();
        let builder = FrameBuilder::new(&collection, ReplayConfig::default()).unwrap();

        let frames = builder.build_all();
        assert_eq!(frames.len(), 2);

        let first = &frames[0];
        assert_eq!(first.timestamp_ms, 0);
        assert_eq!(first.point("A").unwrap().status, StatusColor::Searching);
        assert_eq!(first.point("B").unwrap().status, StatusColor::Idle);
        assert_eq!(first.relays, vec![RelayAssociation::new("A", "B")]);

        // |10000 - 5000| is still inside the window
        assert_eq!(frames[1].timestamp_ms, 10_000);
        assert_eq!(frames[1].relays.len(), 1);
    }

    #[test]
    fn test_agent_absent_before_first_sample() {
        let late = AgentTimeline::new("late", vec![PositionSample::new("late", 1.0, 1.0, 20_000, 0)], vec![]);
        let early = AgentTimeline::new("early", vec![PositionSample::new("early", 2.0, 2.0, 0, 0)], vec![]);
        let collection = TimelineCollection::new(vec![late, early]).unwrap();
        let builder = FrameBuilder::new(&collection, ReplayConfig::default()).unwrap();

        let frames = builder.build_all();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].points.len(), 1);
        assert!(frames[0].point("late").is_none());
        assert_eq!(frames[2].points.len(), 2);
    }

    #[test]
    fn test_duplicate_relays_from_distinct_agents_kept() {
        let make = |id: &str| {
            AgentTimeline::new(
                id,
                vec![PositionSample::new(id, 0.0, 0.0, 0, 0)],
                vec![StatusEvent::new(id, Some("base".into()), 0, EventKind::ImageReceived)],
            )
        };
        let base = AgentTimeline::new("base", vec![PositionSample::new("base", 1.0, 1.0, 50_000, 0)], vec![]);
        let collection = TimelineCollection::new(vec![make("x"), make("y"), base]).unwrap();
        let builder = FrameBuilder::new(&collection, ReplayConfig::default()).unwrap();

        let frame = builder.frame_at(0);
        assert_eq!(
            frame.relays,
            vec![RelayAssociation::new("x", "base"), RelayAssociation::new("y", "base")]
        );
        // "base" has no position yet at t=0, so neither relay is drawable
        assert!(frame.drawable_relays().is_empty());
    }

    #[test]
    fn test_relay_to_unknown_agent_dropped() {
        let a = AgentTimeline::new(
            "A",
            vec![PositionSample::new("A", 0.0, 0.0, 0, 0)],
            vec![StatusEvent::new("A", Some("ghost".into()), 0, EventKind::ImageReceived)],
        );
        let collection = TimelineCollection::new(vec![a]).unwrap();
        let builder = FrameBuilder::new(&collection, ReplayConfig::default()).unwrap();

        let frame = builder.frame_at(0);
        assert_eq!(frame.points.len(), 1);
        assert!(frame.relays.is_empty());
    }

    #[test]
    fn test_frame_count_on_extreme_range() {
        let timeline = AgentTimeline::new(
            "a",
            vec![
                PositionSample::new("a", 0.0, 0.0, i64::MIN, 0),
                PositionSample::new("a", 0.0, 0.0, i64::MAX, 0),
            ],
            vec![],
        );
        let collection = TimelineCollection::new(vec![timeline]).unwrap();
        let config = ReplayConfig {
            step_ms: 1,
            ..Default::default()
        };
        let builder = FrameBuilder::new(&collection, config).unwrap();
        assert_eq!(builder.frame_count(), usize::MAX);
    }

    #[test]
    fn test_rebuild_is_identical() {
        let collection = two_agent_collection();
        let config = ReplayConfig {
            step_ms: 1_000,
            relay_window_ms: 2_000,
        };
        let first = FrameBuilder::new(&collection, config).unwrap().build_all();
        let second = FrameBuilder::new(&collection, config).unwrap().build_all();
        assert_eq!(first, second);
        assert_eq!(first.len(), 11);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let collection = two_agent_collection();
        let config = ReplayConfig {
            step_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            FrameBuilder::new(&collection, config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_collection_fails() {
        let collection = TimelineCollection::new(vec![]).unwrap();
        assert!(matches!(
            FrameBuilder::new(&collection, ReplayConfig::default()),
            Err(Error::EmptyInput(_))
        ));
    }
}
