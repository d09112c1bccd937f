//! Replay Logs Library
//!
//! This library discovers and parses per-agent JSON telemetry logs and turns
//! them into a [`replay_core::TimelineCollection`]. It also provides the tool
//! that concatenates per-day log files into one file per agent.

pub mod combine;
pub mod source;

pub use combine::{combine_logs, combine_subdirectories, CombineSummary};
pub use source::{discover_logs, load_collection, read_log_file, AgentLog, AgentReport, LoadReport, LoadedLogs};

use std::path::PathBuf;

/// Result type for replay-logs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for replay-logs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Replay core error: {0}")]
    Core(#[from] replay_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Log file is not a JSON array: {}", .0.display())]
    NotAnArray(PathBuf),
}
