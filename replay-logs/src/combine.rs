//! Concatenation of per-day log files into one file per agent
//!
//! Agents write `logs*.json` files (one JSON array each) into their own
//! directory. The replay reads one file per agent, so those arrays are
//! concatenated, in file name order, into `<agent>.json`.

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of combining one agent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub records: usize,
}

/// Concatenates every `logs*.json` array in `input_dir` into `output_file`.
///
/// Files that cannot be read or parsed are skipped with a warning. Returns the
/// number of records written.
pub fn combine_logs(input_dir: impl AsRef<Path>, output_file: impl AsRef<Path>) -> Result<usize> {
    let input_dir = input_dir.as_ref();
    let output_file = output_file.as_ref();
    if !input_dir.is_dir() {
        return Err(Error::NotADirectory(input_dir.to_path_buf()));
    }

    let mut combined: Vec<serde_json::Value> = Vec::new();
    for path in daily_logs(input_dir)? {
        match read_array(&path) {
            Ok(records) => combined.extend(records),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read daily log, skipping");
            }
        }
    }

    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(output_file)?);
    serde_json::to_writer_pretty(&mut writer, &combined)?;
    writer.flush()?;

    Ok(combined.len())
}

/// Runs [`combine_logs`] for every subdirectory of `parent_dir`, writing
/// `<output_dir>/<subdirectory>.json`.
pub fn combine_subdirectories(
    parent_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<Vec<CombineSummary>> {
    let parent_dir = parent_dir.as_ref();
    let output_dir = output_dir.as_ref();
    if !parent_dir.is_dir() {
        return Err(Error::NotADirectory(parent_dir.to_path_buf()));
    }

    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(parent_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    let mut summaries = Vec::with_capacity(subdirs.len());
    for input_dir in subdirs {
        let Some(name) = input_dir.file_name() else {
            continue;
        };
        let output_file = output_dir.join(format!("{}.json", name.to_string_lossy()));
        let records = combine_logs(&input_dir, &output_file)?;
        tracing::info!(
            input = %input_dir.display(),
            output = %output_file.display(),
            records,
            "combined agent logs"
        );
        summaries.push(CombineSummary {
            input_dir,
            output_file,
            records,
        });
    }

    Ok(summaries)
}

fn daily_logs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_daily_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("logs") && n.ends_with(".json"));
        if is_daily_log && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn read_array(path: &Path) -> Result<Vec<serde_json::Value>> {
    let file = File::open(path)?;
    match serde_json::from_reader(BufReader::new(file))? {
        serde_json::Value::Array(records) => Ok(records),
        _ => Err(Error::NotAnArray(path.to_path_buf())),
    }
}
