//! Graph statistics and degree sequences.
//!
//! Degree sequences drive the configuration null model; the summary
//! statistics back `stitchmine inspect` and the pipeline logs.

use crate::Graph;
use serde::{Deserialize, Serialize};
use stitchmine_core::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Summary statistics about a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphStats {
    /// Graph name, if any.
    pub name: Option<String>,
    /// Whether edges are directed.
    pub directed: bool,
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of edges.
    pub edge_count: usize,
    /// Edges from a vertex to itself.
    pub self_loop_count: usize,
    /// Edges repeating an earlier edge's endpoints.
    pub multi_edge_count: usize,
    /// Number of weakly connected components.
    pub component_count: usize,
    /// Vertex count of the largest weakly connected component.
    pub largest_component_size: usize,
    /// Vertices without any edges.
    pub isolated_count: usize,
    /// Average edges per vertex (in + out).
    pub avg_degree: f32,
    /// Maximum in-degree.
    pub max_in_degree: usize,
    /// Maximum out-degree.
    pub max_out_degree: usize,
    /// Whether any edge carries a color.
    pub colored: bool,
}

/// Per-vertex degrees of a graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegreeSequence {
    /// In- and out-degree per vertex.
    Directed {
        /// In-degree per vertex.
        in_degrees: Vec<usize>,
        /// Out-degree per vertex.
        out_degrees: Vec<usize>,
    },
    /// Total degree per vertex (self-loops count twice).
    Undirected {
        /// Degree per vertex.
        degrees: Vec<usize>,
    },
}

impl DegreeSequence {
    /// Degree sequence of `graph`.
    pub fn of(graph: &Graph) -> Self {
        if graph.is_directed() {
            Self::Directed {
                in_degrees: graph.in_degrees(),
                out_degrees: graph.out_degrees(),
            }
        } else {
            Self::Undirected {
                degrees: graph.out_degrees(),
            }
        }
    }

    /// Build a directed sequence, checking that both lists line up.
    pub fn directed(in_degrees: Vec<usize>, out_degrees: Vec<usize>) -> Result<Self> {
        if in_degrees.len() != out_degrees.len() {
            return Err(Error::null_model(format!(
                "{} in-degrees but {} out-degrees",
                in_degrees.len(),
                out_degrees.len()
            )));
        }
        Ok(Self::Directed {
            in_degrees,
            out_degrees,
        })
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Directed { in_degrees, .. } => in_degrees.len(),
            Self::Undirected { degrees } => degrees.len(),
        }
    }

    /// Whether the sequence describes directed edges.
    pub fn is_directed(&self) -> bool {
        matches!(self, Self::Directed { .. })
    }

    /// `(in, out)` pairs sorted, for multiset comparison.
    ///
    /// Undirected sequences report `(degree, degree)`.
    pub fn sorted_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = match self {
            Self::Directed {
                in_degrees,
                out_degrees,
            } => in_degrees
                .iter()
                .copied()
                .zip(out_degrees.iter().copied())
                .collect(),
            Self::Undirected { degrees } => degrees.iter().map(|&d| (d, d)).collect(),
        };
        pairs.sort_unstable();
        pairs
    }

    /// Check that stubs can be paired: equal in/out totals, or an even
    /// undirected total.
    pub fn check_feasible(&self) -> Result<()> {
        match self {
            Self::Directed {
                in_degrees,
                out_degrees,
            } => {
                let total_in: usize = in_degrees.iter().sum();
                let total_out: usize = out_degrees.iter().sum();
                if total_in != total_out {
                    return Err(Error::null_model(format!(
                        "in-degree total {total_in} differs from out-degree total {total_out}"
                    )));
                }
            }
            Self::Undirected { degrees } => {
                let total: usize = degrees.iter().sum();
                if total % 2 != 0 {
                    return Err(Error::null_model(format!(
                        "odd degree total {total} cannot be paired"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Compute summary statistics for a graph.
pub fn compute_stats(graph: &Graph) -> GraphStats {
    let vertex_count = graph.vertex_count();
    let edge_count = graph.edge_count();
    let in_degrees = graph.in_degrees();
    let out_degrees = graph.out_degrees();

    let components = graph.components();
    let largest_component_size = components.iter().map(Vec::len).max().unwrap_or(0);

    let isolated_count = (0..vertex_count)
        .filter(|&v| in_degrees[v] == 0 && out_degrees[v] == 0)
        .count();

    let total_degree = if graph.is_directed() {
        in_degrees.iter().sum::<usize>() + out_degrees.iter().sum::<usize>()
    } else {
        out_degrees.iter().sum::<usize>()
    };
    let avg_degree = if vertex_count > 0 {
        total_degree as f32 / vertex_count as f32
    } else {
        0.0
    };

    GraphStats {
        name: graph.name.clone(),
        directed: graph.is_directed(),
        vertex_count,
        edge_count,
        self_loop_count: graph.self_loop_count(),
        multi_edge_count: graph.multi_edge_count(),
        component_count: components.len(),
        largest_component_size,
        isolated_count,
        avg_degree,
        max_in_degree: in_degrees.iter().copied().max().unwrap_or(0),
        max_out_degree: out_degrees.iter().copied().max().unwrap_or(0),
        colored: graph.is_colored(),
    }
}

/// Get a quick summary of graph size.
pub fn quick_summary(graph: &Graph) -> String {
    format!(
        "{} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;

    fn create_test_graph() -> Graph {
        Graph::from_edges(
            5,
            true,
            [
                Edge::new(0, 1),
                Edge::new(1, 2),
                Edge::new(0, 2),
                Edge::new(2, 3),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_compute_stats_basic_counts() {
        let stats = compute_stats(&create_test_graph());
        assert_eq!(stats.vertex_count, 5);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.largest_component_size, 4);
        assert_eq!(stats.isolated_count, 1);
        assert!(!stats.colored);
    }

    #[test]
    fn test_compute_stats_avg_degree() {
        // 4 edges: each contributes 1 in-degree and 1 out-degree = 8 total degree
        // 5 vertices: avg = 8/5 = 1.6
        let stats = compute_stats(&create_test_graph());
        assert!((stats.avg_degree - 1.6).abs() < 0.01);
    }

    #[test]
    fn test_compute_stats_max_degrees() {
        let stats = compute_stats(&create_test_graph());
        assert_eq!(stats.max_out_degree, 2);
        assert_eq!(stats.max_in_degree, 2);
    }

    #[test]
    fn test_compute_stats_empty_graph() {
        let stats = compute_stats(&Graph::directed(0));
        assert_eq!(stats.vertex_count, 0);
        assert_eq!(stats.component_count, 0);
        assert_eq!(stats.largest_component_size, 0);
        assert_eq!(stats.avg_degree, 0.0);
    }

    #[test]
    fn test_quick_summary() {
        assert_eq!(quick_summary(&create_test_graph()), "5 vertices, 4 edges");
    }

    #[test]
    fn test_degree_sequence_directed() {
        let seq = DegreeSequence::of(&create_test_graph());
        assert!(seq.is_directed());
        assert_eq!(seq.vertex_count(), 5);
        assert_eq!(
            seq,
            DegreeSequence::Directed {
                in_degrees: vec![0, 1, 2, 1, 0],
                out_degrees: vec![2, 1, 1, 0, 0],
            }
        );
        assert!(seq.check_feasible().is_ok());
    }

    #[test]
    fn test_degree_sequence_sorted_pairs() {
        let seq = DegreeSequence::of(&create_test_graph());
        assert_eq!(
            seq.sorted_pairs(),
            vec![(0, 0), (0, 2), (1, 0), (1, 1), (2, 1)]
        );
    }

    #[test]
    fn test_degree_sequence_infeasible() {
        let odd = DegreeSequence::Undirected {
            degrees: vec![1, 1, 1],
        };
        assert!(odd.check_feasible().unwrap_err().is_null_model());

        let unbalanced = DegreeSequence::directed(vec![1, 0], vec![0, 0]).unwrap();
        assert!(unbalanced.check_feasible().is_err());

        assert!(DegreeSequence::directed(vec![1], vec![0, 1]).is_err());
    }

    #[test]
    fn test_graph_stats_serialization() {
        let stats = compute_stats(&create_test_graph());
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: GraphStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.vertex_count, stats.vertex_count);
        assert_eq!(parsed.edge_count, stats.edge_count);
    }
}
