//! Mined motifs and their evaluation records.
//!
//! A [`Motif`] is a pattern decoded from miner output together with the
//! support the miner reported for it. Evaluation attaches a
//! [`MotifEvaluation`] exactly once; [`MotifRecord`] is the flattened,
//! persisted form.

use serde::{Deserialize, Serialize};
use stitchmine_core::{Error, Result};
use stitchmine_graph::{Color, Edge, Graph, NullModelKind};

// ============================================================================
// Evaluation
// ============================================================================

/// Supports of one motif across the evaluated populations.
///
/// `None` means the population was not evaluated, which is distinct from a
/// support of zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotifEvaluation {
    /// Whether the motif occurs in each observed graph, in population order.
    pub graph_occurrences: Vec<bool>,
    /// Names of the observed graphs, in population order.
    pub graph_labels: Vec<String>,
    /// Number of cross-platform graphs containing the motif.
    pub cross_platform_support: Option<usize>,
    /// Fraction of configuration-model draws containing the motif.
    pub null_support_configuration: Option<f64>,
    /// Fraction of Erdős–Rényi draws containing the motif.
    pub null_support_erdos_renyi: Option<f64>,
    /// Configuration-model hits divided by the draws per reference graph.
    pub null_expected_configuration: Option<f64>,
    /// Erdős–Rényi hits divided by the draws per reference graph.
    pub null_expected_erdos_renyi: Option<f64>,
}

impl MotifEvaluation {
    /// Number of observed graphs containing the motif.
    pub fn graph_support(&self) -> usize {
        self.graph_occurrences.iter().filter(|&&hit| hit).count()
    }

    /// Indices of the observed graphs containing the motif.
    pub fn graph_indices(&self) -> Vec<usize> {
        self.graph_occurrences
            .iter()
            .enumerate()
            .filter_map(|(i, &hit)| hit.then_some(i))
            .collect()
    }

    /// Labels of the observed graphs containing the motif.
    pub fn matched_labels(&self) -> Vec<String> {
        self.graph_indices()
            .into_iter()
            .filter_map(|i| self.graph_labels.get(i).cloned())
            .collect()
    }

    /// Null support for `kind`.
    pub fn null_support(&self, kind: NullModelKind) -> Option<f64> {
        match kind {
            NullModelKind::Configuration => self.null_support_configuration,
            NullModelKind::ErdosRenyi => self.null_support_erdos_renyi,
        }
    }

    /// Null expectation for `kind`, in observed-graph units.
    pub fn null_expected(&self, kind: NullModelKind) -> Option<f64> {
        match kind {
            NullModelKind::Configuration => self.null_expected_configuration,
            NullModelKind::ErdosRenyi => self.null_expected_erdos_renyi,
        }
    }

    /// Record the null results for `kind`.
    pub fn set_null(&mut self, kind: NullModelKind, support: Option<f64>, expected: Option<f64>) {
        match kind {
            NullModelKind::Configuration => {
                self.null_support_configuration = support;
                self.null_expected_configuration = expected;
            }
            NullModelKind::ErdosRenyi => {
                self.null_support_erdos_renyi = support;
                self.null_expected_erdos_renyi = expected;
            }
        }
    }
}

// ============================================================================
// Motif
// ============================================================================

/// A mined pattern awaiting or carrying its evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Motif {
    /// Pattern topology, colors and direction.
    pub graph: Graph,
    /// Support reported by the miner.
    pub fsm_support: f64,
    evaluation: Option<MotifEvaluation>,
}

impl Motif {
    /// Create an unevaluated motif.
    pub fn new(graph: Graph, fsm_support: f64) -> Self {
        Self {
            graph,
            fsm_support,
            evaluation: None,
        }
    }

    /// A motif from a decoded miner pattern.
    ///
    /// The support comes from the pattern's header or support line, falling
    /// back to the number of listed transactions. Returns `None` when the
    /// pattern carries neither.
    pub fn from_pattern(pattern: Graph) -> Option<Self> {
        if let (Some(support), Some(ids)) = (pattern.support, &pattern.transactions)
            && support != ids.len() as f64
        {
            log::warn!(
                "Pattern support {support} disagrees with its {} listed transaction(s); \
                 check pipeline.support_placement",
                ids.len()
            );
        }
        let support = pattern
            .support
            .or_else(|| pattern.transactions.as_ref().map(|t| t.len() as f64))?;
        Some(Self::new(pattern, support))
    }

    /// Motifs for all patterns that carry a support.
    pub fn from_patterns(patterns: Vec<Graph>) -> Vec<Self> {
        let total = patterns.len();
        let motifs: Vec<Self> = patterns.into_iter().filter_map(Self::from_pattern).collect();
        if motifs.len() < total {
            log::warn!(
                "Dropped {} pattern(s) without a support value",
                total - motifs.len()
            );
        }
        motifs
    }

    /// The attached evaluation, if any.
    pub fn evaluation(&self) -> Option<&MotifEvaluation> {
        self.evaluation.as_ref()
    }

    /// Whether an evaluation is attached.
    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    /// Attach an evaluation. A motif is evaluated once.
    pub fn attach(&mut self, evaluation: MotifEvaluation) -> Result<()> {
        if self.evaluation.is_some() {
            return Err(Error::matching("motif already carries an evaluation"));
        }
        self.evaluation = Some(evaluation);
        Ok(())
    }

    /// The persisted form, once evaluated.
    pub fn record(&self) -> Option<MotifRecord> {
        let evaluation = self.evaluation.as_ref()?;
        Some(MotifRecord {
            vertices: (0..self.graph.vertex_count()).collect(),
            edges: self
                .graph
                .edges()
                .iter()
                .map(|e| (e.source, e.target))
                .collect(),
            edge_colors: self.graph.edge_colors(),
            directed: self.graph.is_directed(),
            fsm_support: self.fsm_support,
            graph_occurrences: evaluation.graph_occurrences.clone(),
            graph_indices: evaluation.graph_indices(),
            graph_labels: evaluation.matched_labels(),
            graph_support: evaluation.graph_support(),
            cross_platform_support: evaluation.cross_platform_support,
            null_support_configuration: evaluation.null_support_configuration,
            null_support_erdos_renyi: evaluation.null_support_erdos_renyi,
            null_expected_configuration: evaluation.null_expected_configuration,
            null_expected_erdos_renyi: evaluation.null_expected_erdos_renyi,
        })
    }
}

// ============================================================================
// Persisted record
// ============================================================================

/// One evaluated motif as written to reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotifRecord {
    /// Vertex indices of the motif.
    pub vertices: Vec<usize>,
    /// Edges as `(source, target)` pairs.
    pub edges: Vec<(usize, usize)>,
    /// Per-edge colors, `null` for uncolored motifs.
    pub edge_colors: Option<Vec<Color>>,
    /// Whether the motif is directed.
    #[serde(default)]
    pub directed: bool,
    /// Support reported by the miner.
    pub fsm_support: f64,
    /// Occurrence in each observed graph.
    pub graph_occurrences: Vec<bool>,
    /// Indices of the observed graphs containing the motif.
    pub graph_indices: Vec<usize>,
    /// Names of the observed graphs containing the motif.
    pub graph_labels: Vec<String>,
    /// Number of observed graphs containing the motif.
    pub graph_support: usize,
    /// Number of cross-platform graphs containing the motif.
    pub cross_platform_support: Option<usize>,
    /// Fraction of configuration-model draws containing the motif: hits
    /// divided by every successful draw, so always in `[0, 1]`.
    ///
    /// Not the per-graph "hits summed over draws, divided by B" figure;
    /// that one is [`Self::null_expected_configuration`].
    pub null_support_configuration: Option<f64>,
    /// Fraction of Erdős–Rényi draws containing the motif, in `[0, 1]`.
    ///
    /// The hits-divided-by-B figure is [`Self::null_expected_erdos_renyi`].
    pub null_support_erdos_renyi: Option<f64>,
    /// Configuration-model hits summed over all draws, divided by the
    /// bootstrap count B. Expressed in graphs, comparable with
    /// `graph_support`.
    #[serde(default)]
    pub null_expected_configuration: Option<f64>,
    /// Erdős–Rényi hits summed over all draws, divided by B.
    #[serde(default)]
    pub null_expected_erdos_renyi: Option<f64>,
}

impl MotifRecord {
    /// Rebuild the motif graph described by this record.
    pub fn to_graph(&self) -> Result<Graph> {
        if let Some(colors) = &self.edge_colors
            && colors.len() != self.edges.len()
        {
            return Err(Error::invalid_graph(format!(
                "motif record has {} edge color(s) for {} edge(s)",
                colors.len(),
                self.edges.len()
            )));
        }
        let edges = self.edges.iter().enumerate().map(|(i, &(s, t))| {
            match self.edge_colors.as_ref().and_then(|c| c.get(i)) {
                Some(&color) => Edge::colored(s, t, color),
                None => Edge::new(s, t),
            }
        });
        Graph::from_edges(self.vertices.len(), self.directed, edges)
    }
}

// ============================================================================
// Tests
// ============================================================================
