//! Population persistence.
//!
//! Populations are stored as pretty-printed JSON so intermediate pipeline
//! stages (loaded observations, null draws) can be inspected and reused by
//! later commands. Loading re-checks every graph, since deserialized graphs
//! bypass the endpoint checks of the graph API.

use crate::population::{Population, PopulationKind};
use crate::validation::validate_graph;
use crate::Graph;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stitchmine_core::{Error, Result, timestamp_now};

// ============================================================================
// Serializable types
// ============================================================================

/// Serializable representation of a population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SerializedPopulation {
    /// Population name.
    pub name: String,
    /// Generation recipe.
    pub kind: PopulationKind,
    /// All graphs in order.
    pub graphs: Vec<Graph>,
    /// Optional metadata about the population.
    #[serde(default)]
    pub metadata: Option<PopulationMetadata>,
}

/// Metadata about a persisted population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationMetadata {
    /// When the population was written (unix timestamp).
    pub built_at: String,
    /// Version of the writer.
    pub builder_version: String,
    /// Directory or file the graphs were loaded from.
    #[serde(default)]
    pub source: Option<String>,
    /// RNG seed, for null-model draws.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Draws per reference graph, for null-model draws.
    #[serde(default)]
    pub bootstraps: Option<usize>,
}

impl Default for PopulationMetadata {
    fn default() -> Self {
        Self {
            built_at: timestamp_now(),
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
            source: None,
            seed: None,
            bootstraps: None,
        }
    }
}

// ============================================================================
// Save / Load
// ============================================================================

/// Save a population to a JSON file.
pub fn save_population(
    population: &Population,
    path: impl AsRef<Path>,
    metadata: Option<PopulationMetadata>,
) -> Result<()> {
    let serialized = SerializedPopulation {
        name: population.name.clone(),
        kind: population.kind,
        graphs: population.graphs().to_vec(),
        metadata,
    };

    let json = serde_json::to_string_pretty(&serialized)
        .map_err(|e| Error::serialization(format!("Failed to serialize population: {e}")))?;

    std::fs::write(path.as_ref(), json).map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    log::debug!(
        "Saved population '{}' ({} graphs) to {}",
        population.name,
        population.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Load a population from a JSON file.
pub fn load_population(path: impl AsRef<Path>) -> Result<Population> {
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| Error::io_with_path(e, path.as_ref()))?;

    load_population_from_str(&json)
}

/// Load a population from a JSON string.
pub fn load_population_from_str(json: &str) -> Result<Population> {
    let serialized: SerializedPopulation = serde_json::from_str(json)
        .map_err(|e| Error::serialization(format!("Failed to parse population JSON: {e}")))?;

    for (index, graph) in serialized.graphs.iter().enumerate() {
        validate_graph(graph).into_result().map_err(|e| {
            Error::invalid_graph(format!("graph {index} of '{}': {e}", serialized.name))
        })?;
    }

    Ok(Population::new(
        serialized.name,
        serialized.kind,
        serialized.graphs,
    ))
}

/// Read only the metadata of a saved population.
pub fn load_metadata(path: impl AsRef<Path>) -> Result<Option<PopulationMetadata>> {
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    let serialized: SerializedPopulation = serde_json::from_str(&json)
        .map_err(|e| Error::serialization(format!("Failed to parse population JSON: {e}")))?;
    Ok(serialized.metadata)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;
    use tempfile::TempDir;

    fn population() -> Population {
        let graph = Graph::from_edges(3, true, [Edge::colored(0, 1, 1), Edge::new(1, 2)])
            .unwrap()
            .with_name("dance");
        Population::new("tiktok", PopulationKind::Observed, vec![graph, Graph::directed(1)])
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        save_population(&population(), &path, None).unwrap();

        let loaded = load_population(&path).unwrap();
        assert_eq!(loaded, population());
    }

    #[test]
    fn test_metadata_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf.json");
        let metadata = PopulationMetadata {
            seed: Some(42),
            bootstraps: Some(10),
            ..Default::default()
        };
        save_population(&population(), &path, Some(metadata)).unwrap();

        let loaded = load_metadata(&path).unwrap().unwrap();
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.bootstraps, Some(10));
        assert_eq!(loaded.builder_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_load_rejects_invalid_graph() {
        let json = r#"{"name": "p", "kind": "observed", "graphs": [
            {"directed": true, "vertex_count": 1, "edges": [{"source": 0, "target": 1}]}
        ]}"#;
        let err = load_population_from_str(json).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));
    }

    #[test]
    fn test_load_malformed_json() {
        let err = load_population_from_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_population("/nonexistent/pop.json").unwrap_err();
        assert!(matches!(err, Error::IoWithPath { .. }));
    }
}
