//! Color-aware subgraph matching.
//!
//! A motif occurs in a target when there is an injective vertex map under
//! which every motif edge lands on a distinct target edge with the same
//! endpoints (and direction, when both graphs are directed). Extra target
//! edges are allowed. Parallel motif edges need as many parallel target
//! edges.
//!
//! When either graph is undirected, both are compared through their
//! undirected views, the same rule the gSpan encoder applies. Colors are
//! compared only when the caller asks for it and both graphs carry colors;
//! an uncolored edge in a colored graph compares as [`NEUTRAL_COLOR`].
//!
//! [`NEUTRAL_COLOR`]: crate::NEUTRAL_COLOR

use crate::{Color, Graph};
use std::collections::HashMap;
use stitchmine_core::{Error, Result};

const UNMAPPED: usize = usize::MAX;

// ============================================================================
// Adjacency index
// ============================================================================

/// Edge multiset keyed by endpoint pair, plus neighbor lists and degrees.
#[derive(Clone, Debug)]
struct Adjacency {
    directed: bool,
    edges: HashMap<(usize, usize), Vec<Color>>,
    neighbors: Vec<Vec<usize>>,
    out_degree: Vec<usize>,
    in_degree: Vec<usize>,
    edge_count: usize,
}

impl Adjacency {
    fn new(graph: &Graph, directed: bool) -> Self {
        let n = graph.vertex_count();
        let mut edges: HashMap<(usize, usize), Vec<Color>> = HashMap::new();
        let mut neighbors = vec![Vec::new(); n];
        let mut out_degree = vec![0; n];
        let mut in_degree = vec![0; n];

        for edge in graph.edges() {
            let key = if directed {
                (edge.source, edge.target)
            } else {
                edge.undirected_key()
            };
            edges.entry(key).or_default().push(edge.color_or_neutral());

            out_degree[edge.source] += 1;
            in_degree[edge.target] += 1;
            if !directed {
                out_degree[edge.target] += 1;
                in_degree[edge.source] += 1;
            }
            if !edge.is_loop() {
                neighbors[edge.source].push(edge.target);
                neighbors[edge.target].push(edge.source);
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            directed,
            edges,
            neighbors,
            out_degree,
            in_degree,
            edge_count: graph.edge_count(),
        }
    }

    fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    fn key(&self, u: usize, v: usize) -> (usize, usize) {
        if self.directed || u <= v { (u, v) } else { (v, u) }
    }

    fn colors(&self, u: usize, v: usize) -> &[Color] {
        self.edges
            .get(&self.key(u, v))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn check_endpoints(graph: &Graph, role: &str) -> Result<()> {
    let n = graph.vertex_count();
    match graph
        .edges()
        .iter()
        .find(|e| e.source >= n || e.target >= n)
    {
        Some(edge) => Err(Error::matching(format!(
            "{role} edge {} -> {} references a vertex outside 0..{n}",
            edge.source, edge.target
        ))),
        None => Ok(()),
    }
}

// ============================================================================
// Prepared target
// ============================================================================

/// A target graph indexed once for repeated matching.
///
/// Evaluators match many motifs against the same population; preparing
/// each target once avoids rebuilding its adjacency per motif.
#[derive(Clone, Debug)]
pub struct PreparedTarget {
    directed: Option<Adjacency>,
    undirected: Adjacency,
    colored: bool,
}

impl PreparedTarget {
    /// Index `target`.
    ///
    /// Fails with [`Error::Match`] when an edge references an undeclared
    /// vertex.
    pub fn new(target: &Graph) -> Result<Self> {
        check_endpoints(target, "target")?;
        Ok(Self {
            directed: target
                .is_directed()
                .then(|| Adjacency::new(target, true)),
            undirected: Adjacency::new(target, false),
            colored: target.is_colored(),
        })
    }

    /// Whether `motif` occurs in this target.
    pub fn occurs(&self, motif: &Graph, match_colors: bool) -> Result<bool> {
        Ok(self.find_embedding(motif, match_colors)?.is_some())
    }

    /// An embedding of `motif`, as the target vertex of each motif vertex.
    pub fn find_embedding(&self, motif: &Graph, match_colors: bool) -> Result<Option<Vec<usize>>> {
        check_endpoints(motif, "motif")?;

        let target = match (&self.directed, motif.is_directed()) {
            (Some(directed), true) => directed,
            _ => &self.undirected,
        };
        let pattern = Adjacency::new(motif, target.directed);
        let compare_colors = match_colors && self.colored && motif.is_colored();

        Ok(Search::new(&pattern, target, compare_colors).run())
    }
}

/// Whether `motif` occurs in `target`.
///
/// `match_colors` requires matched edges to carry equal colors when both
/// graphs are colored.
pub fn occurs(motif: &Graph, target: &Graph, match_colors: bool) -> Result<bool> {
    PreparedTarget::new(target)?.occurs(motif, match_colors)
}

/// An embedding of `motif` into `target`, if one exists.
pub fn find_embedding(
    motif: &Graph,
    target: &Graph,
    match_colors: bool,
) -> Result<Option<Vec<usize>>> {
    PreparedTarget::new(target)?.find_embedding(motif, match_colors)
}

// ============================================================================
// Backtracking search
// ============================================================================

struct Search<'a> {
    pattern: &'a Adjacency,
    target: &'a Adjacency,
    compare_colors: bool,
    /// Motif vertices in matching order.
    order: Vec<usize>,
    /// Earlier-ordered neighbor whose image seeds the candidates.
    anchor: Vec<Option<usize>>,
    mapping: Vec<usize>,
    used: Vec<bool>,
}

impl<'a> Search<'a> {
    fn new(pattern: &'a Adjacency, target: &'a Adjacency, compare_colors: bool) -> Self {
        let (order, anchor) = matching_order(pattern);
        Self {
            pattern,
            target,
            compare_colors,
            order,
            anchor,
            mapping: vec![UNMAPPED; pattern.vertex_count()],
            used: vec![false; target.vertex_count()],
        }
    }

    fn run(mut self) -> Option<Vec<usize>> {
        if self.pattern.vertex_count() > self.target.vertex_count()
            || self.pattern.edge_count > self.target.edge_count
        {
            return None;
        }
        if self.extend(0) {
            Some(self.mapping)
        } else {
            None
        }
    }

    fn extend(&mut self, depth: usize) -> bool {
        if depth == self.order.len() {
            return true;
        }
        let vertex = self.order[depth];

        let candidates: Vec<usize> = match self.anchor[depth] {
            Some(anchor) => self.target.neighbors[self.mapping[anchor]].clone(),
            None => (0..self.target.vertex_count()).collect(),
        };

        for candidate in candidates {
            if self.used[candidate] || !self.feasible(vertex, candidate) {
                continue;
            }
            self.mapping[vertex] = candidate;
            self.used[candidate] = true;
            if self.extend(depth + 1) {
                return true;
            }
            self.mapping[vertex] = UNMAPPED;
            self.used[candidate] = false;
        }
        false
    }

    /// Whether `vertex -> candidate` keeps every edge to already-mapped
    /// vertices (and any self-loop on `vertex`) embeddable.
    fn feasible(&self, vertex: usize, candidate: usize) -> bool {
        if self.pattern.out_degree[vertex] > self.target.out_degree[candidate]
            || self.pattern.in_degree[vertex] > self.target.in_degree[candidate]
        {
            return false;
        }

        if !self.edges_fit(vertex, vertex, candidate, candidate) {
            return false;
        }

        self.pattern.neighbors[vertex].iter().all(|&other| {
            let image = self.mapping[other];
            if image == UNMAPPED {
                return true;
            }
            if !self.edges_fit(vertex, other, candidate, image) {
                return false;
            }
            !self.pattern.directed || self.edges_fit(other, vertex, image, candidate)
        })
    }

    fn edges_fit(&self, u: usize, v: usize, image_u: usize, image_v: usize) -> bool {
        let need = self.pattern.colors(u, v);
        if need.is_empty() {
            return true;
        }
        let have = self.target.colors(image_u, image_v);
        if need.len() > have.len() {
            return false;
        }
        if !self.compare_colors {
            return true;
        }
        need.iter().all(|color| {
            let needed = need.iter().filter(|c| *c == color).count();
            let available = have.iter().filter(|c| *c == color).count();
            needed <= available
        })
    }
}

/// Order motif vertices so that each one (after the first of its
/// component) has an already-ordered neighbor, preferring vertices with the
/// most ordered neighbors and then the highest degree.
fn matching_order(pattern: &Adjacency) -> (Vec<usize>, Vec<Option<usize>>) {
    let n = pattern.vertex_count();
    let degree = |v: usize| pattern.out_degree[v] + pattern.in_degree[v];
    let mut placed = vec![false; n];
    let mut links = vec![0usize; n];
    let mut order = Vec::with_capacity(n);
    let mut anchor = Vec::with_capacity(n);

    while order.len() < n {
        let next = (0..n)
            .filter(|&v| !placed[v])
            .max_by_key(|&v| (links[v], degree(v), std::cmp::Reverse(v)));
        let Some(next) = next else { break };

        anchor.push(
            pattern.neighbors[next]
                .iter()
                .copied()
                .find(|&w| placed[w]),
        );
        order.push(next);
        placed[next] = true;
        for &w in &pattern.neighbors[next] {
            links[w] += 1;
        }
    }

    (order, anchor)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Edge;
    use proptest::prelude::*;

    fn graph(n: usize, directed: bool, edges: &[(usize, usize)]) -> Graph {
        Graph::from_edges(n, directed, edges.iter().map(|&(s, t)| Edge::new(s, t))).unwrap()
    }

    fn colored(n: usize, directed: bool, edges: &[(usize, usize, Color)]) -> Graph {
        Graph::from_edges(
            n,
            directed,
            edges.iter().map(|&(s, t, c)| Edge::colored(s, t, c)),
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_in_cycle() {
        let cycle = graph(3, true, &[(0, 1), (1, 2), (2, 0)]);
        let triangle = graph(3, false, &[(0, 1), (1, 2), (0, 2)]);
        assert!(occurs(&triangle, &cycle, false).unwrap());
        assert!(occurs(&cycle, &cycle, false).unwrap());
    }

    #[test]
    fn test_direction_respected_when_both_directed() {
        let path = graph(3, true, &[(0, 1), (1, 2)]);
        let out_star = graph(3, true, &[(0, 1), (0, 2)]);
        assert!(!occurs(&out_star, &path, false).unwrap());
        // The undirected view of the path is a path, which has a 2-star.
        assert!(occurs(&out_star.to_undirected(), &path, false).unwrap());
    }

    #[test]
    fn test_non_induced() {
        let path = graph(3, false, &[(0, 1), (1, 2)]);
        let triangle = graph(3, false, &[(0, 1), (1, 2), (2, 0)]);
        assert!(occurs(&path, &triangle, false).unwrap());
        assert!(!occurs(&triangle, &path, false).unwrap());
    }

    #[test]
    fn test_color_gating() {
        let motif = colored(3, false, &[(0, 1, 1), (1, 2, 2)]);
        let target = colored(3, false, &[(0, 1, 1), (1, 2, 1)]);
        assert!(!occurs(&motif, &target, true).unwrap());
        assert!(occurs(&motif, &target, false).unwrap());
    }

    #[test]
    fn test_colors_ignored_when_target_uncolored() {
        let motif = colored(2, false, &[(0, 1, 2)]);
        let target = graph(2, false, &[(0, 1)]);
        assert!(occurs(&motif, &target, true).unwrap());
    }

    #[test]
    fn test_parallel_edges_need_multiplicity() {
        let double = graph(2, false, &[(0, 1), (1, 0)]);
        let single = graph(2, true, &[(0, 1)]);
        let reciprocal = graph(2, true, &[(0, 1), (1, 0)]);
        assert!(!occurs(&double, &single, false).unwrap());
        assert!(occurs(&double, &reciprocal, false).unwrap());
    }

    #[test]
    fn test_self_loop() {
        let loop_motif = graph(1, true, &[(0, 0)]);
        assert!(!occurs(&loop_motif, &graph(2, true, &[(0, 1)]), false).unwrap());
        assert!(occurs(&loop_motif, &graph(2, true, &[(0, 1), (1, 1)]), false).unwrap());
    }

    #[test]
    fn test_too_large_motif() {
        let edge = graph(2, false, &[(0, 1)]);
        assert!(!occurs(&graph(3, false, &[]), &edge, false).unwrap());
        assert!(occurs(&Graph::undirected(0), &edge, false).unwrap());
    }

    #[test]
    fn test_disconnected_motif() {
        let two_edges = graph(4, false, &[(0, 1), (2, 3)]);
        let path = graph(4, false, &[(0, 1), (1, 2), (2, 3)]);
        let star = graph(4, false, &[(0, 1), (0, 2), (0, 3)]);
        assert!(occurs(&two_edges, &path, false).unwrap());
        assert!(!occurs(&two_edges, &star, false).unwrap());
    }

    #[test]
    fn test_embedding_is_injective_and_valid() {
        let motif = graph(3, true, &[(0, 1), (1, 2)]);
        let target = graph(5, true, &[(4, 3), (3, 0), (2, 2)]);
        let embedding = find_embedding(&motif, &target, false).unwrap().unwrap();
        assert_eq!(embedding, vec![4, 3, 0]);
    }

    #[test]
    fn test_prepared_target_reuse() {
        let target = PreparedTarget::new(&graph(3, true, &[(0, 1), (1, 2), (2, 0)])).unwrap();
        assert!(target.occurs(&graph(2, true, &[(0, 1)]), false).unwrap());
        assert!(!target.occurs(&graph(2, true, &[(0, 1), (1, 0)]), false).unwrap());
    }

    #[test]
    fn test_invalid_graph_is_match_error() {
        let json = r#"{"directed": true, "vertex_count": 1, "edges": [{"source": 0, "target": 3}]}"#;
        let broken: Graph = serde_json::from_str(json).unwrap();
        let err = occurs(&graph(1, true, &[]), &broken, false).unwrap_err();
        assert!(matches!(err, Error::Match(_)));
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    fn target_and_permutation() -> impl Strategy<Value = (Graph, Vec<usize>)> {
        (1usize..7)
            .prop_flat_map(|n| {
                (
                    Just(n),
                    prop::collection::vec((0..n, 0..n, 0u8..3), 0..12),
                    Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                    any::<bool>(),
                )
            })
            .prop_map(|(n, edges, permutation, directed)| {
                let graph = Graph::from_edges(
                    n,
                    directed,
                    edges.into_iter().map(|(s, t, c)| Edge::colored(s, t, c)),
                )
                .unwrap();
                (graph, permutation)
            })
    }

    fn small_motif() -> impl Strategy<Value = Graph> {
        (1usize..4)
            .prop_flat_map(|n| {
                (
                    Just(n),
                    prop::collection::vec((0..n, 0..n, 0u8..3), 0..4),
                    any::<bool>(),
                )
            })
            .prop_map(|(n, edges, directed)| {
                Graph::from_edges(
                    n,
                    directed,
                    edges.into_iter().map(|(s, t, c)| Edge::colored(s, t, c)),
                )
                .unwrap()
            })
    }

    proptest! {
        #[test]
        fn test_occurs_invariant_under_relabeling(
            (target, permutation) in target_and_permutation(),
            motif in small_motif(),
            match_colors in any::<bool>(),
        ) {
            let relabeled = target.relabel(&permutation).unwrap();
            prop_assert_eq!(
                occurs(&motif, &target, match_colors).unwrap(),
                occurs(&motif, &relabeled, match_colors).unwrap()
            );
        }

        #[test]
        fn test_edge_subset_occurs_in_graph(
            (target, _permutation) in target_and_permutation(),
            keep in 0usize..12,
        ) {
            let kept = target.edges().iter().take(keep).copied();
            let motif = Graph::from_edges(target.vertex_count(), target.is_directed(), kept).unwrap();
            prop_assert!(occurs(&motif, &target, true).unwrap());
        }
    }
}
