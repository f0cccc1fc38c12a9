//! Edge-list input.
//!
//! Observed graphs arrive as comma-separated `source,target[,color]` rows,
//! one file per hashtag. A row whose endpoint is the literal `None` records
//! a video without a stitch source and contributes no edge. Vertices are
//! numbered in order of first appearance and keep their original ids as
//! labels.

use crate::population::{Population, PopulationKind};
use crate::validation::validate_graph;
use crate::{Color, Edge, Graph};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use stitchmine_core::{Error, Result};

/// Endpoint token marking a missing vertex.
pub const MISSING_TOKEN: &str = "None";

/// Extension of edge-list files picked up by [`load_edge_dir`].
pub const EDGE_FILE_EXTENSION: &str = "txt";

/// Parse a directed edge list.
pub fn parse_edge_list<R: Read>(reader: R, name: Option<String>) -> Result<Graph> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut dropped = 0usize;

    for row in csv.records() {
        let record = row.map_err(csv_error)?;
        let line = record_line(&record);
        if record.iter().all(str::is_empty) {
            continue;
        }
        if !(2..=3).contains(&record.len()) {
            return Err(Error::format(
                line,
                format!("edge row has {} fields, expected 2 or 3", record.len()),
            ));
        }

        let (source, target) = (&record[0], &record[1]);
        if source.contains(MISSING_TOKEN) || target.contains(MISSING_TOKEN) {
            dropped += 1;
            continue;
        }

        let color = match record.get(2) {
            Some(token) if !token.is_empty() => Some(
                token
                    .parse::<Color>()
                    .map_err(|_| Error::format(line, format!("invalid edge color '{token}'")))?,
            ),
            _ => None,
        };

        let mut vertex = |id: &str| -> usize {
            *index.entry(id.to_string()).or_insert_with(|| {
                labels.push(id.to_string());
                labels.len() - 1
            })
        };
        let s = vertex(source);
        let t = vertex(target);
        edges.push(Edge {
            source: s,
            target: t,
            color,
        });
    }

    if dropped > 0 {
        log::debug!("Dropped {dropped} row(s) with a missing endpoint");
    }

    let graph = Graph::from_edges(labels.len(), true, edges)?.with_labels(labels)?;
    Ok(match name {
        Some(name) => graph.with_name(name),
        None => graph,
    })
}

/// Load one edge-list file, naming the graph after the file.
pub fn load_edge_list(path: &Path) -> Result<Graph> {
    let file = std::fs::File::open(path).map_err(|e| Error::io_with_path(e, path))?;
    let graph = parse_edge_list(file, graph_name_from_path(path)).map_err(|e| e.in_file(path))?;

    let report = validate_graph(&graph);
    for warning in &report.warnings {
        log::debug!("{}: [{}] {}", path.display(), warning.code, warning.message);
    }
    Ok(graph)
}

/// Graph name for an edge file: the stem up to the first `_`.
///
/// `dance_edges.txt` names the graph `dance`.
pub fn graph_name_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    stem.split('_').next().map(str::to_string)
}

/// Edge files in `dir`, sorted by path.
pub fn edge_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io_with_path(e, dir))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io_with_path(e, dir))?.path();
        if path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(EDGE_FILE_EXTENSION)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every edge file in `dir` as one population.
pub fn load_edge_dir(dir: &Path, name: &str, kind: PopulationKind) -> Result<Population> {
    let files = edge_files(dir)?;
    if files.is_empty() {
        return Err(Error::not_found(format!(
            "no .{EDGE_FILE_EXTENSION} edge files in {}",
            dir.display()
        )));
    }

    let graphs = files
        .iter()
        .map(|path| load_edge_list(path))
        .collect::<Result<Vec<_>>>()?;

    log::info!("Loaded {} graph(s) from {}", graphs.len(), dir.display());
    Ok(Population::new(name, kind, graphs))
}

fn record_line(record: &StringRecord) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or_default()
}

fn csv_error(err: csv::Error) -> Error {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or_default();
    Error::format(line, err.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_first_appearance_order() {
        let text = "700,500\n500,900\n700,900\n";
        let graph = parse_edge_list(text.as_bytes(), None).unwrap();
        assert!(graph.is_directed());
        assert_eq!(graph.labels(), ["700", "500", "900"]);
        assert_eq!(
            graph.edges(),
            &[Edge::new(0, 1), Edge::new(1, 2), Edge::new(0, 2)]
        );
    }

    #[test]
    fn test_parse_drops_missing_endpoint() {
        let text = "1,None\n2,1\nNone,3\n";
        let graph = parse_edge_list(text.as_bytes(), None).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_parse_colors_and_whitespace() {
        let text = "a, b, 2\nb ,c\n";
        let graph = parse_edge_list(text.as_bytes(), Some("tag".into())).unwrap();
        assert_eq!(graph.name.as_deref(), Some("tag"));
        assert_eq!(graph.edges(), &[Edge::colored(0, 1, 2), Edge::new(1, 2)]);
    }

    #[test]
    fn test_parse_bad_row() {
        let err = parse_edge_list("1,2\n3\n".as_bytes(), None).unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
        assert!(parse_edge_list("1,2,red\n".as_bytes(), None).is_err());
    }

    #[test]
    fn test_parse_empty() {
        let graph = parse_edge_list("".as_bytes(), None).unwrap();
        assert_eq!(graph.vertex_count(), 0);
    }

    #[test]
    fn test_graph_name_from_path() {
        assert_eq!(
            graph_name_from_path(Path::new("/d/dance_edges.txt")).as_deref(),
            Some("dance")
        );
        assert_eq!(graph_name_from_path(Path::new("plain.txt")).as_deref(), Some("plain"));
    }

    #[test]
    fn test_load_edge_dir_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("zeta_edges.txt"), "1,2\n").unwrap();
        std::fs::write(dir.path().join("alpha_edges.txt"), "1,2\n2,3\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let population = load_edge_dir(dir.path(), "tiktok", PopulationKind::Observed).unwrap();
        assert_eq!(population.labels(), vec!["alpha", "zeta"]);
        assert_eq!(population.graphs()[0].edge_count(), 2);
    }

    #[test]
    fn test_load_edge_dir_empty() {
        let dir = TempDir::new().unwrap();
        let err = load_edge_dir(dir.path(), "x", PopulationKind::Observed).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_edge_list_tags_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad_edges.txt");
        std::fs::write(&path, "1,2,300\n").unwrap();
        let err = load_edge_list(&path).unwrap_err();
        assert!(err.to_string().contains("bad_edges.txt"));
    }
}
