//! Graph validation and integrity checking.
//!
//! Graphs that arrive from outside the process (JSON populations, edge
//! lists) bypass [`Graph::add_edge`]'s endpoint check, so loaders run
//! [`validate_graph`] before handing them to the pipeline.

use crate::Graph;
use serde::{Deserialize, Serialize};
use stitchmine_core::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Result of graph validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the graph is valid (no critical issues).
    pub valid: bool,
    /// Critical issues that must be fixed.
    pub errors: Vec<ValidationIssue>,
    /// Non-critical issues (warnings).
    pub warnings: Vec<ValidationIssue>,
    /// Informational findings.
    pub info: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Add an error (marks graph as invalid).
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Add an informational finding.
    pub fn add_info(&mut self, issue: ValidationIssue) {
        self.info.push(issue);
    }

    /// Total issue count (errors + warnings).
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Turn the first error into an [`Error::InvalidGraph`].
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(issue) => Err(Error::invalid_graph(format!(
                "[{}] {}",
                issue.code, issue.message
            ))),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A validation issue found in a graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue type/code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Affected vertex indices.
    pub vertices: Vec<usize>,
    /// Affected edge positions.
    pub edges: Vec<usize>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Attach affected vertices.
    pub fn with_vertices(mut self, vertices: Vec<usize>) -> Self {
        self.vertices = vertices;
        self
    }

    /// Attach affected edge positions.
    pub fn with_edges(mut self, edges: Vec<usize>) -> Self {
        self.edges = edges;
        self
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate a graph.
///
/// Checks for:
/// - Edge endpoints outside `0..vertex_count` (error)
/// - Vertex label count not matching the vertex count (error)
/// - Self-loops and parallel edges (warning)
/// - Edges with and without colors in the same graph (warning)
/// - Isolated vertices (info)
pub fn validate_graph(graph: &Graph) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_endpoints(graph, &mut result);
    check_labels(graph, &mut result);
    check_self_loops(graph, &mut result);
    check_multi_edges(graph, &mut result);
    check_mixed_colors(graph, &mut result);
    check_isolated(graph, &mut result);

    result
}

/// Quick check if a graph has any validation errors.
pub fn is_valid(graph: &Graph) -> bool {
    validate_graph(graph).valid
}

// ============================================================================
// Individual checks
// ============================================================================

fn check_endpoints(graph: &Graph, result: &mut ValidationResult) {
    let n = graph.vertex_count();
    let dangling: Vec<usize> = graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.source >= n || e.target >= n)
        .map(|(i, _)| i)
        .collect();

    if !dangling.is_empty() {
        result.add_error(
            ValidationIssue::new(
                "UNDECLARED_VERTEX",
                format!(
                    "{} edge(s) reference vertices outside 0..{n}",
                    dangling.len()
                ),
            )
            .with_edges(dangling),
        );
    }
}

fn check_labels(graph: &Graph, result: &mut ValidationResult) {
    let labels = graph.labels().len();
    if labels != 0 && labels != graph.vertex_count() {
        result.add_error(ValidationIssue::new(
            "LABEL_COUNT",
            format!(
                "{labels} label(s) for {} vertices",
                graph.vertex_count()
            ),
        ));
    }
}

fn check_self_loops(graph: &Graph, result: &mut ValidationResult) {
    let loops: Vec<usize> = graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_loop())
        .map(|(i, _)| i)
        .collect();

    if !loops.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "SELF_LOOPS",
                format!("{} edge(s) are self-loops", loops.len()),
            )
            .with_edges(loops),
        );
    }
}

fn check_multi_edges(graph: &Graph, result: &mut ValidationResult) {
    let count = graph.multi_edge_count();
    if count > 0 {
        result.add_warning(ValidationIssue::new(
            "PARALLEL_EDGES",
            format!("{count} edge(s) repeat an earlier edge"),
        ));
    }
}

fn check_mixed_colors(graph: &Graph, result: &mut ValidationResult) {
    let uncolored: Vec<usize> = graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.color.is_none())
        .map(|(i, _)| i)
        .collect();

    if graph.is_colored() && !uncolored.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "MIXED_COLORS",
                format!(
                    "{} uncolored edge(s) in a colored graph will match as color 0",
                    uncolored.len()
                ),
            )
            .with_edges(uncolored),
        );
    }
}

fn check_isolated(graph: &Graph, result: &mut ValidationResult) {
    let n = graph.vertex_count();
    let mut touched = vec![false; n];
    for edge in graph.edges() {
        if edge.source < n {
            touched[edge.source] = true;
        }
        if edge.target < n {
            touched[edge.target] = true;
        }
    }
    let isolated: Vec<usize> = (0..n).filter(|&v| !touched[v]).collect();

    if !isolated.is_empty() {
        result.add_info(
            ValidationIssue::new(
                "ISOLATED_VERTICES",
                format!("{} vertex(es) have no edges", isolated.len()),
            )
            .with_vertices(isolated),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;

    #[test]
    fn test_valid_graph() {
        let graph = Graph::from_edges(2, true, [Edge::new(0, 1)]).unwrap();
        let result = validate_graph(&graph);
        assert!(result.valid);
        assert_eq!(result.total_issues(), 0);
        assert!(is_valid(&graph));
    }

    #[test]
    fn test_undeclared_vertex_from_json() {
        let json = r#"{"name": null, "directed": true, "vertex_count": 2,
            "edges": [{"source": 0, "target": 5}]}"#;
        let graph: Graph = serde_json::from_str(json).unwrap();
        let result = validate_graph(&graph);
        assert!(!result.valid);
        assert_eq!(result.errors[0].code, "UNDECLARED_VERTEX");
        assert_eq!(result.errors[0].edges, vec![0]);
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_label_count_mismatch_from_json() {
        let json = r#"{"directed": false, "vertex_count": 2, "labels": ["a"], "edges": []}"#;
        let graph: Graph = serde_json::from_str(json).unwrap();
        assert!(!is_valid(&graph));
    }

    #[test]
    fn test_warnings() {
        let graph = Graph::from_edges(
            3,
            true,
            [Edge::new(0, 0), Edge::colored(0, 1, 1), Edge::new(0, 1)],
        )
        .unwrap();
        let result = validate_graph(&graph);
        assert!(result.valid);
        let codes: Vec<&str> = result.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["SELF_LOOPS", "PARALLEL_EDGES", "MIXED_COLORS"]);
        assert_eq!(result.info[0].vertices, vec![2]);
    }

    #[test]
    fn test_into_result_ok() {
        assert!(validate_graph(&Graph::undirected(3)).into_result().is_ok());
    }
}
