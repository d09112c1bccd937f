//! Agent log discovery and parsing

use crate::{Error, Result};
use replay_core::{ingest, RawRecord, TimelineCollection};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One agent log as read from disk, records not yet classified
#[derive(Debug)]
pub struct AgentLog {
    /// Agent name, taken from the file stem
    pub name: String,
    pub path: PathBuf,
    /// Decoded records; elements that could not be decoded are kept as errors
    pub records: Vec<replay_core::Result<RawRecord>>,
}

/// Ingestion outcome for one agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReport {
    pub name: String,
    pub positions: usize,
    pub events: usize,
    pub rejected: usize,
}

/// What happened while loading a log directory
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub agents: Vec<AgentReport>,
    /// Files that could not be turned into a timeline, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

impl LoadReport {
    /// Total number of records dropped across all loaded agents
    pub fn total_rejected(&self) -> usize {
        self.agents.iter().map(|a| a.rejected).sum()
    }
}

/// A loaded timeline collection together with its load report
#[derive(Debug)]
pub struct LoadedLogs {
    pub collection: TimelineCollection,
    pub report: LoadReport,
}

/// Lists every `*.json` file directly inside `dir`, sorted by path
pub fn discover_logs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Reads one agent log.
///
/// The file must hold a JSON array. Elements are decoded one by one so a bad
/// element never takes the rest of the file down with it.
pub fn read_log_file(path: impl AsRef<Path>) -> Result<AgentLog> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file = File::open(path)?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    let serde_json::Value::Array(elements) = value else {
        return Err(Error::NotAnArray(path.to_path_buf()));
    };

    let records = elements.into_iter().map(decode_record).collect();

    Ok(AgentLog {
        name,
        path: path.to_path_buf(),
        records,
    })
}

fn decode_record(value: serde_json::Value) -> replay_core::Result<RawRecord> {
    if !value.is_object() {
        return Err(replay_core::Error::MalformedRecord {
            reason: "record is not a JSON object".into(),
        });
    }
    serde_json::from_value(value).map_err(|e| replay_core::Error::MalformedRecord {
        reason: e.to_string(),
    })
}

/// Loads every agent log in `dir` into a timeline collection.
///
/// Files that cannot be read or whose records are all malformed are skipped
/// and listed in the report. Fails only when no agent survives.
pub fn load_collection(dir: impl AsRef<Path>) -> Result<LoadedLogs> {
    let mut report = LoadReport::default();
    let mut timelines = Vec::new();

    for path in discover_logs(&dir)? {
        let ingested =
            read_log_file(&path).and_then(|log| ingest(&log.name, log.records).map_err(Error::from));
        match ingested {
            Ok(ingested) => {
                let timeline = &ingested.timeline;
                if timeline.is_empty() {
                    tracing::warn!(agent = timeline.agent_id(), "agent has no position samples");
                }
                report.agents.push(AgentReport {
                    name: timeline.agent_id().to_string(),
                    positions: timeline.positions().len(),
                    events: timeline.events().len(),
                    rejected: ingested.rejected.len(),
                });
                timelines.push(ingested.timeline);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping log file");
                report.skipped.push((path, e.to_string()));
            }
        }
    }

    if timelines.is_empty() {
        return Err(replay_core::Error::EmptyInput(format!(
            "no agent logs could be loaded from {}",
            dir.as_ref().display()
        ))
        .into());
    }

    let collection = TimelineCollection::new(timelines)?;
    tracing::info!(
        agents = collection.len(),
        skipped = report.skipped.len(),
        rejected = report.total_rejected(),
        "loaded agent logs"
    );

    Ok(LoadedLogs { collection, report })
}
