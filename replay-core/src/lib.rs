//! Replay Core Library
//!
//! This library reconstructs a time-stepped replay of agent telemetry:
//! where every agent was, what it was doing, and which agents were relaying
//! payloads to each other, at fixed query instants.

pub mod builder;
pub mod collection;
pub mod config;
pub mod frame;
pub mod ingest;
pub mod record;
pub mod sampler;
pub mod timeline;

pub use builder::FrameBuilder;
pub use collection::{SpatialBounds, TimelineCollection};
pub use config::ReplayConfig;
pub use frame::{AgentPoint, Frame, RelayAssociation, StatusColor};
pub use ingest::{ingest, Ingested, RawRecord, RejectedRecord};
pub use record::{EventKind, PositionSample, Record, StatusEvent};
pub use sampler::FrameSampler;
pub use timeline::AgentTimeline;

/// Result type for replay-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for replay-core operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("All {count} records of agent '{agent}' are malformed")]
    AllRecordsMalformed { agent: String, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate agent: {0}")]
    DuplicateAgent(String),
}
