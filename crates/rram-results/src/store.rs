//! Run storage API.
//!
//! Layout: `<root>/<run_id>/manifest.json` and `<root>/<run_id>/timeseries.jsonl`.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::{RunManifest, StepRecord};
use crate::{ResultsError, ResultsResult};

const MANIFEST_FILE: &str = "manifest.json";
const TIMESERIES_FILE: &str = "timeseries.jsonl";

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> ResultsResult<Self> {
        let root_dir = root_dir.into();
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> ResultsResult<PathBuf> {
        let valid = !run_id.is_empty()
            && run_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ResultsError::InvalidRunId {
                run_id: run_id.to_string(),
            });
        }
        Ok(self.root_dir.join(run_id))
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id)
            .map(|dir| dir.join(MANIFEST_FILE).exists())
            .unwrap_or(false)
    }

    pub fn save_run(&self, manifest: &RunManifest, records: &[StepRecord]) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id)?;
        fs::create_dir_all(&run_dir)?;

        let mut out = BufWriter::new(fs::File::create(run_dir.join(TIMESERIES_FILE))?);
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        // Manifest last: its presence marks the run as complete on disk.
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        debug!(run_id = %manifest.run_id, records = records.len(), "saved run");
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id)?.join(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        debug!(run_id, "loaded manifest");
        Ok(manifest)
    }

    pub fn load_timeseries(&self, run_id: &str) -> ResultsResult<Vec<StepRecord>> {
        let timeseries_path = self.run_dir(run_id)?.join(TIMESERIES_FILE);

        if !timeseries_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let reader = BufReader::new(fs::File::open(timeseries_path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                records.push(serde_json::from_str(&line)?);
            }
        }

        debug!(run_id, records = records.len(), "loaded timeseries");
        Ok(records)
    }

    /// Stored runs, optionally filtered by bench, oldest first.
    pub fn list_runs(&self, bench: Option<&str>) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                match self.load_manifest(&run_id) {
                    Ok(manifest) if bench.is_none_or(|b| manifest.bench == b) => {
                        runs.push(manifest)
                    }
                    _ => {}
                }
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id)?;
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
            debug!(run_id, "deleted run");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_run_ids() {
        let store = RunStore::new(std::env::temp_dir().join("rram_results_ids")).unwrap();
        for bad in ["", "..", "a/b", "../x", "a\\b"] {
            assert!(matches!(
                store.load_manifest(bad),
                Err(ResultsError::InvalidRunId { .. })
            ));
            assert!(!store.has_run(bad));
        }
    }

    #[test]
    fn missing_run_is_not_found() {
        let store = RunStore::new(std::env::temp_dir().join("rram_results_missing")).unwrap();
        assert!(matches!(
            store.load_timeseries("deadbeef"),
            Err(ResultsError::RunNotFound { .. })
        ));
        assert!(store.delete_run("deadbeef").is_ok());
    }
}
