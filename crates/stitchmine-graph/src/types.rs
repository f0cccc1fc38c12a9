//! Core graph types.
//!
//! A [`Graph`] has contiguous vertex indices `0..n`, a list of directed or
//! undirected [`Edge`]s, and a handful of optional annotations: a name
//! (usually the hashtag or dataset the graph was built from), a scalar
//! support (set for mined patterns), and the transaction ids the miner
//! reported for a pattern.

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stitchmine_core::{Error, Result};

/// Categorical edge attribute (sentiment class in the stitch graphs).
pub type Color = u8;

/// Color written for edges that carry no color.
pub const NEUTRAL_COLOR: Color = 0;

// ============================================================================
// Edge
// ============================================================================

/// An edge between two vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source vertex index.
    pub source: usize,
    /// Target vertex index.
    pub target: usize,
    /// Optional categorical attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Edge {
    /// Create an uncolored edge.
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            color: None,
        }
    }

    /// Create a colored edge.
    pub fn colored(source: usize, target: usize, color: Color) -> Self {
        Self {
            source,
            target,
            color: Some(color),
        }
    }

    /// Set the edge color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// The edge color, or [`NEUTRAL_COLOR`] when absent.
    pub fn color_or_neutral(&self) -> Color {
        self.color.unwrap_or(NEUTRAL_COLOR)
    }

    /// Whether the edge connects a vertex to itself.
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }

    /// Endpoints ordered so that `(u, v)` and `(v, u)` compare equal.
    pub fn undirected_key(&self) -> (usize, usize) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

// ============================================================================
// Graph
// ============================================================================

/// A directed or undirected multigraph over vertices `0..vertex_count`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name (hashtag, dataset or pattern id).
    #[serde(default)]
    pub name: Option<String>,
    /// Whether edges are directed.
    pub directed: bool,
    vertex_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
    edges: Vec<Edge>,
    /// Support reported by a miner, when this graph is a mined pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,
    /// Ids of the transactions the miner found this pattern in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<usize>>,
}

impl Graph {
    /// Create a graph with `vertex_count` isolated vertices.
    pub fn new(vertex_count: usize, directed: bool) -> Self {
        Self {
            name: None,
            directed,
            vertex_count,
            labels: Vec::new(),
            edges: Vec::new(),
            support: None,
            transactions: None,
        }
    }

    /// Create a directed graph with `vertex_count` isolated vertices.
    pub fn directed(vertex_count: usize) -> Self {
        Self::new(vertex_count, true)
    }

    /// Create an undirected graph with `vertex_count` isolated vertices.
    pub fn undirected(vertex_count: usize) -> Self {
        Self::new(vertex_count, false)
    }

    /// Build a graph from an edge list, checking every endpoint.
    pub fn from_edges(
        vertex_count: usize,
        directed: bool,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self> {
        let mut graph = Self::new(vertex_count, directed);
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Set the graph name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the graph support.
    pub fn with_support(mut self, support: f64) -> Self {
        self.support = Some(support);
        self
    }

    /// Attach vertex labels (one per vertex).
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.vertex_count {
            return Err(Error::invalid_graph(format!(
                "{} labels for {} vertices",
                labels.len(),
                self.vertex_count
            )));
        }
        self.labels = labels;
        Ok(self)
    }

    /// Append an isolated vertex and return its index.
    pub fn add_vertex(&mut self) -> usize {
        self.vertex_count += 1;
        if !self.labels.is_empty() {
            self.labels.push(String::new());
        }
        self.vertex_count - 1
    }

    /// Append an edge. Both endpoints must already exist.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        if edge.source >= self.vertex_count || edge.target >= self.vertex_count {
            return Err(Error::invalid_graph(format!(
                "edge {} -> {} references a vertex outside 0..{}",
                edge.source, edge.target, self.vertex_count
            )));
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges (parallel edges counted individually).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Vertex labels; empty when the graph carries none.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of a single vertex.
    pub fn label(&self, vertex: usize) -> Option<&str> {
        self.labels.get(vertex).map(String::as_str)
    }

    /// Whether edges are directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Whether any edge carries a color.
    pub fn is_colored(&self) -> bool {
        self.edges.iter().any(|e| e.color.is_some())
    }

    /// Per-edge colors, or `None` when the graph is uncolored.
    pub fn edge_colors(&self) -> Option<Vec<Color>> {
        self.is_colored()
            .then(|| self.edges.iter().map(Edge::color_or_neutral).collect())
    }

    /// Out-degree of every vertex (total degree for undirected graphs).
    pub fn out_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.vertex_count];
        for edge in &self.edges {
            degrees[edge.source] += 1;
            if !self.directed {
                degrees[edge.target] += 1;
            }
        }
        degrees
    }

    /// In-degree of every vertex (total degree for undirected graphs).
    pub fn in_degrees(&self) -> Vec<usize> {
        if !self.directed {
            return self.out_degrees();
        }
        let mut degrees = vec![0; self.vertex_count];
        for edge in &self.edges {
            degrees[edge.target] += 1;
        }
        degrees
    }

    /// Number of self-loops.
    pub fn self_loop_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_loop()).count()
    }

    /// Number of edges that repeat an earlier edge's endpoints.
    pub fn multi_edge_count(&self) -> usize {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter(|e| !seen.insert(self.endpoint_key(e)))
            .count()
    }

    fn endpoint_key(&self, edge: &Edge) -> (usize, usize) {
        if self.directed {
            (edge.source, edge.target)
        } else {
            edge.undirected_key()
        }
    }

    /// Undirected view where each directed edge becomes one undirected edge.
    ///
    /// Reciprocal edges `u -> v` and `v -> u` become two parallel
    /// undirected edges. Undirected graphs are returned as a clone.
    pub fn to_undirected(&self) -> Graph {
        let mut graph = self.clone();
        graph.directed = false;
        graph
    }

    /// A copy with every edge color removed.
    pub fn without_colors(&self) -> Graph {
        let edges = self
            .edges
            .iter()
            .map(|e| Edge::new(e.source, e.target))
            .collect();
        Graph {
            edges,
            ..self.clone()
        }
    }

    /// Remove self-loops and collapse parallel edges.
    ///
    /// The first edge between a pair of vertices is kept, with its color.
    pub fn simplify(&self) -> Graph {
        self.simplify_with(true, true)
    }

    /// Remove self-loops and/or collapse parallel edges.
    pub fn simplify_with(&self, remove_loops: bool, collapse_multi_edges: bool) -> Graph {
        let mut seen = HashSet::new();
        let edges = self
            .edges
            .iter()
            .filter(|e| !(remove_loops && e.is_loop()))
            .filter(|e| !collapse_multi_edges || seen.insert(self.endpoint_key(e)))
            .copied()
            .collect();
        Graph {
            edges,
            ..self.clone()
        }
    }

    /// Weakly connected components, each as a sorted vertex list.
    ///
    /// Components are ordered by their smallest vertex.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::<usize>::new(self.vertex_count);
        for edge in &self.edges {
            sets.union(edge.source, edge.target);
        }

        let mut root_slot: Vec<Option<usize>> = vec![None; self.vertex_count];
        let mut components: Vec<Vec<usize>> = Vec::new();
        for vertex in 0..self.vertex_count {
            let root = sets.find(vertex);
            match root_slot[root] {
                Some(slot) => components[slot].push(vertex),
                None => {
                    root_slot[root] = Some(components.len());
                    components.push(vec![vertex]);
                }
            }
        }
        components
    }

    /// The largest weakly connected component as its own graph.
    ///
    /// Ties go to the component containing the smallest vertex index.
    /// Vertices keep their relative order.
    pub fn largest_component(&self) -> Graph {
        let mut best: Vec<usize> = Vec::new();
        for component in self.components() {
            if component.len() > best.len() {
                best = component;
            }
        }
        self.induced_subgraph(&best)
    }

    /// Subgraph induced by `vertices`, renumbered in the given order.
    ///
    /// Unknown or repeated vertices are ignored.
    pub fn induced_subgraph(&self, vertices: &[usize]) -> Graph {
        let mut index: Vec<Option<usize>> = vec![None; self.vertex_count];
        let mut kept = Vec::new();
        for &v in vertices {
            if v < self.vertex_count && index[v].is_none() {
                index[v] = Some(kept.len());
                kept.push(v);
            }
        }

        let edges = self
            .edges
            .iter()
            .filter_map(|e| match (index[e.source], index[e.target]) {
                (Some(s), Some(t)) => Some(Edge {
                    source: s,
                    target: t,
                    color: e.color,
                }),
                _ => None,
            })
            .collect();

        let labels = if self.labels.is_empty() {
            Vec::new()
        } else {
            kept.iter().map(|&v| self.labels[v].clone()).collect()
        };

        Graph {
            name: self.name.clone(),
            directed: self.directed,
            vertex_count: kept.len(),
            labels,
            edges,
            support: self.support,
            transactions: self.transactions.clone(),
        }
    }

    /// Rename vertex `v` to `permutation[v]`.
    pub fn relabel(&self, permutation: &[usize]) -> Result<Graph> {
        let mut seen = vec![false; self.vertex_count];
        if permutation.len() != self.vertex_count
            || permutation
                .iter()
                .any(|&p| p >= self.vertex_count || std::mem::replace(&mut seen[p], true))
        {
            return Err(Error::invalid_graph(format!(
                "relabeling is not a permutation of 0..{}",
                self.vertex_count
            )));
        }

        let edges = self
            .edges
            .iter()
            .map(|e| Edge {
                source: permutation[e.source],
                target: permutation[e.target],
                color: e.color,
            })
            .collect();

        let labels = if self.labels.is_empty() {
            Vec::new()
        } else {
            let mut labels = vec![String::new(); self.vertex_count];
            for (v, label) in self.labels.iter().enumerate() {
                labels[permutation[v]] = label.clone();
            }
            labels
        };

        Ok(Graph {
            edges,
            labels,
            ..self.clone()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
