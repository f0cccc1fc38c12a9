//! Motif reports.
//!
//! A [`MotifReport`] is one pretty-printed JSON document per population
//! and mining strategy. [`ReportWriter`] is a JSON Lines sink that several
//! runs can append records to; appends are serialized behind a mutex.

use crate::motif::MotifRecord;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use stitchmine_core::{Error, Result, timestamp_now};
use stitchmine_graph::{NullModelKind, NullPopulation, SkippedReference};
use stitchmine_miner::MinerStrategy;

// ============================================================================
// Report document
// ============================================================================

/// Reference graphs left out of one null population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NullGap {
    /// Null-model family.
    pub kind: NullModelKind,
    /// Draws per contributing reference graph.
    pub bootstraps: usize,
    /// Total draws.
    pub draws: usize,
    /// Reference graphs that produced no draws.
    pub skipped: Vec<SkippedReference>,
}

impl NullGap {
    /// Summarise a generated null population.
    pub fn of(null: &NullPopulation) -> Self {
        Self {
            kind: null.kind,
            bootstraps: null.bootstraps,
            draws: null.draw_count(),
            skipped: null.skipped.clone(),
        }
    }
}

/// Evaluated motifs for one population and mining strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotifReport {
    /// Evaluated population name.
    pub population: String,
    /// Mining strategy.
    pub strategy: MinerStrategy,
    /// Backend that produced the patterns.
    pub backend: String,
    /// Whether edge colors gated matching.
    pub match_colors: bool,
    /// Number of observed graphs.
    pub graphs: usize,
    /// Generator seed, when null models were drawn.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Null populations and their gaps.
    #[serde(default)]
    pub null_models: Vec<NullGap>,
    /// When the report was written (unix timestamp).
    pub built_at: String,
    /// Version of the writer.
    pub builder_version: String,
    /// One record per motif, in miner output order.
    pub motifs: Vec<MotifRecord>,
}

impl MotifReport {
    /// An empty report stamped with the current time and crate version.
    pub fn new(
        population: impl Into<String>,
        strategy: MinerStrategy,
        backend: impl Into<String>,
        match_colors: bool,
        graphs: usize,
    ) -> Self {
        Self {
            population: population.into(),
            strategy,
            backend: backend.into(),
            match_colors,
            graphs,
            seed: None,
            null_models: Vec::new(),
            built_at: timestamp_now(),
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
            motifs: Vec::new(),
        }
    }

    /// Default file name, `<population>_<strategy>.json`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.population, self.strategy)
    }
}

/// Write `report` as pretty-printed JSON, creating parent directories.
pub fn save_report(path: impl AsRef<Path>, report: &MotifReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| Error::serialization(format!("failed to serialize report: {e}")))?;
    std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;
    log::info!(
        "Saved {} motif record(s) to {}",
        report.motifs.len(),
        path.display()
    );
    Ok(())
}

/// Read a report written by [`save_report`].
pub fn load_report(path: impl AsRef<Path>) -> Result<MotifReport> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    serde_json::from_str(&json).map_err(|e| {
        Error::serialization(format!("failed to parse report {}: {e}", path.display()))
    })
}

// ============================================================================
// Shared record sink
// ============================================================================

/// One line of a record sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordLine {
    /// Evaluated population name.
    pub population: String,
    /// Mining strategy.
    pub strategy: MinerStrategy,
    /// The motif record.
    #[serde(flatten)]
    pub record: MotifRecord,
}

/// Append-only JSON Lines sink for motif records.
///
/// Clones share the underlying file. Each record is written and flushed
/// under the lock, so lines from concurrent writers never interleave.
#[derive(Clone)]
pub struct ReportWriter {
    path: PathBuf,
    file: Arc<Mutex<BufWriter<File>>>,
}

impl ReportWriter {
    /// Create or truncate the sink at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io_with_path(e, path))?;
        Ok(Self::from_file(path, file))
    }

    /// Open the sink at `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::io_with_path(e, path))?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: &Path, file: File) -> Self {
        Self {
            path: path.to_path_buf(),
            file: Arc::new(Mutex::new(BufWriter::new(file))),
        }
    }

    /// Path of the sink file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub fn write(&self, population: &str, strategy: MinerStrategy, record: &MotifRecord) -> Result<()> {
        let line = RecordLine {
            population: population.to_string(),
            strategy,
            record: record.clone(),
        };
        let json = serde_json::to_string(&line)
            .map_err(|e| Error::serialization(format!("failed to serialize record: {e}")))?;

        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(file, "{json}")
            .and_then(|()| file.flush())
            .map_err(|e| Error::io_with_path(e, &self.path))
    }

    /// Append every record of `report`.
    pub fn write_report(&self, report: &MotifReport) -> Result<()> {
        for record in &report.motifs {
            self.write(&report.population, report.strategy, record)?;
        }
        Ok(())
    }
}

/// Read every line of a record sink.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RecordLine>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io_with_path(e, path))?;
    let mut lines = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::io_with_path(e, path))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed = serde_json::from_str(&line)
            .map_err(|e| Error::format(i + 1, format!("bad record: {e}")).in_file(path))?;
        lines.push(parsed);
    }
    Ok(lines)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motif::{Motif, MotifEvaluation};
    use stitchmine_graph::{Edge, Graph};
    use tempfile::TempDir;

    fn record(support: f64) -> MotifRecord {
        let graph = Graph::from_edges(2, false, [Edge::new(0, 1)]).unwrap();
        let mut motif = Motif::new(graph, support);
        motif
            .attach(MotifEvaluation {
                graph_occurrences: vec![true, true],
                graph_labels: vec!["a".into(), "b".into()],
                ..Default::default()
            })
            .unwrap();
        motif.record().unwrap()
    }

    fn report() -> MotifReport {
        let mut report = MotifReport::new("tiktok", MinerStrategy::Undirected, "gspan", false, 2);
        report.motifs = vec![record(2.0), record(1.0)];
        report
    }

    #[test]
    fn test_file_name() {
        assert_eq!(report().file_name(), "tiktok_undirected.json");
    }

    #[test]
    fn test_save_and_load_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("r.json");
        let original = report();

        save_report(&path, &original).unwrap();
        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded, original);
        assert_eq!(loaded.builder_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_load_report_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_report(&path).is_err());
    }

    #[test]
    fn test_writer_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        let writer = ReportWriter::create(&path).unwrap();
        writer.write_report(&report()).unwrap();

        let lines = read_records(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].population, "tiktok");
        assert_eq!(lines[0].strategy, MinerStrategy::Undirected);
        assert_eq!(lines[1].record.fsm_support, 1.0);
    }

    #[test]
    fn test_writer_append_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        ReportWriter::create(&path)
            .unwrap()
            .write("a", MinerStrategy::Directed, &record(1.0))
            .unwrap();
        ReportWriter::append(&path)
            .unwrap()
            .write("b", MinerStrategy::Directed, &record(2.0))
            .unwrap();

        let lines = read_records(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].population, "b");
    }

    #[test]
    fn test_concurrent_writes_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        let writer = ReportWriter::create(&path).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let writer = writer.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        writer
                            .write(&format!("p{i}"), MinerStrategy::Undirected, &record(i as f64))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = read_records(&path).unwrap();
        assert_eq!(lines.len(), 100);
        for line in lines {
            assert_eq!(line.population, format!("p{}", line.record.fsm_support as usize));
        }
    }

    #[test]
    fn test_read_records_bad_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        std::fs::write(&path, "{\"population\": 1}\n").unwrap();
        let err = read_records(&path).unwrap_err();
        assert!(err.is_format());
    }
}
