//! Randomised comparison graphs.
//!
//! Two null models answer "could degree sequence or density alone explain
//! this motif?":
//!
//! - [`NullModelKind::Configuration`]: stub matching over the reference
//!   graph's (in, out)-degree sequence, then simplification
//! - [`NullModelKind::ErdosRenyi`]: `G(n, m)` over simple graphs with the
//!   reference graph's vertex and edge counts
//!
//! The generator takes an explicit seed. Each call to
//! [`NullModelGenerator::generate`] starts a fresh RNG from that seed, so a
//! (seed, kind, population) triple always yields the same draws.

use crate::population::{Population, PopulationKind};
use crate::stats::DegreeSequence;
use crate::{Edge, Graph};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, seq::index};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stitchmine_core::{Error, Result};

/// Default number of draws per reference graph.
pub const DEFAULT_BOOTSTRAPS: usize = 10;

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

// ============================================================================
// Kinds
// ============================================================================

/// A null-model family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullModelKind {
    /// Degree-sequence-preserving configuration model.
    Configuration,
    /// Erdős–Rényi `G(n, m)`.
    ErdosRenyi,
}

impl NullModelKind {
    /// All kinds in reporting order.
    pub const ALL: [NullModelKind; 2] = [Self::Configuration, Self::ErdosRenyi];

    /// Population kind of the draws.
    pub fn population_kind(&self) -> PopulationKind {
        match self {
            Self::Configuration => PopulationKind::ConfigurationModel,
            Self::ErdosRenyi => PopulationKind::ErdosRenyi,
        }
    }

    /// Configuration-file spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::ErdosRenyi => "erdos_renyi",
        }
    }
}

impl fmt::Display for NullModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NullModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "configuration" | "conf" => Ok(Self::Configuration),
            "erdos_renyi" | "er" => Ok(Self::ErdosRenyi),
            other => Err(Error::config(format!(
                "unknown null model '{other}' (expected configuration or erdos_renyi)"
            ))),
        }
    }
}

// ============================================================================
// Single draws
// ============================================================================

/// Draw a multigraph with exactly the given degree sequence.
///
/// Directed sequences pair a shuffled list of in-stubs with the out-stubs;
/// undirected sequences shuffle all stubs and join consecutive pairs. The
/// result may contain self-loops and parallel edges.
pub fn configuration_model<R: Rng + ?Sized>(
    degrees: &DegreeSequence,
    rng: &mut R,
) -> Result<Graph> {
    degrees.check_feasible()?;
    let n = degrees.vertex_count();

    match degrees {
        DegreeSequence::Directed {
            in_degrees,
            out_degrees,
        } => {
            let out_stubs = stubs(out_degrees);
            let mut in_stubs = stubs(in_degrees);
            in_stubs.shuffle(rng);
            Graph::from_edges(
                n,
                true,
                out_stubs
                    .into_iter()
                    .zip(in_stubs)
                    .map(|(s, t)| Edge::new(s, t)),
            )
        }
        DegreeSequence::Undirected { degrees } => {
            let mut all = stubs(degrees);
            all.shuffle(rng);
            Graph::from_edges(
                n,
                false,
                all.chunks_exact(2).map(|pair| Edge::new(pair[0], pair[1])),
            )
        }
    }
}

fn stubs(degrees: &[usize]) -> Vec<usize> {
    degrees
        .iter()
        .enumerate()
        .flat_map(|(v, &d)| std::iter::repeat_n(v, d))
        .collect()
}

/// Draw a simple graph uniformly among those with `n` vertices and `m`
/// edges.
///
/// Edges are sampled without replacement from all `n(n-1)` ordered pairs
/// (directed) or `n(n-1)/2` unordered pairs (undirected).
pub fn erdos_renyi<R: Rng + ?Sized>(
    n: usize,
    m: usize,
    directed: bool,
    rng: &mut R,
) -> Result<Graph> {
    let slots = n.saturating_sub(1);
    let pairs = if directed {
        n.checked_mul(slots)
    } else {
        n.checked_mul(slots).map(|p| p / 2)
    }
    .ok_or_else(|| Error::null_model(format!("{n} vertices overflow the pair count")))?;

    if m > pairs {
        return Err(Error::null_model(format!(
            "{m} edges do not fit in a simple graph with {n} vertices ({pairs} pairs)"
        )));
    }

    let mut chosen = index::sample(rng, pairs, m).into_vec();
    chosen.sort_unstable();

    let edges = chosen.into_iter().map(|k| {
        if directed {
            let source = k / slots;
            let offset = k % slots;
            let target = if offset >= source { offset + 1 } else { offset };
            Edge::new(source, target)
        } else {
            let (source, target) = unordered_pair(n, k);
            Edge::new(source, target)
        }
    });

    Graph::from_edges(n, directed, edges)
}

/// The `k`-th pair `(u, v)` with `u < v`, in row-major order.
fn unordered_pair(n: usize, mut k: usize) -> (usize, usize) {
    let mut u = 0;
    while k >= n - 1 - u {
        k -= n - 1 - u;
        u += 1;
    }
    (u, u + 1 + k)
}

// ============================================================================
// Generator
// ============================================================================

/// A reference graph that produced no draws.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkippedReference {
    /// Index of the graph in the reference population.
    pub index: usize,
    /// Graph name, if any.
    pub name: Option<String>,
    /// Why generation failed.
    pub reason: String,
}

/// Draws for one reference population.
#[derive(Clone, Debug)]
pub struct NullPopulation {
    /// Null-model family.
    pub kind: NullModelKind,
    /// Draws per contributing reference graph.
    pub bootstraps: usize,
    /// All draws, grouped by reference graph.
    pub population: Population,
    /// Reference graph index of each draw.
    pub origins: Vec<usize>,
    /// Number of graphs in the reference population.
    pub references: usize,
    /// Reference graphs excluded because generation failed.
    pub skipped: Vec<SkippedReference>,
}

impl NullPopulation {
    /// Reference graphs that contributed draws.
    pub fn contributing(&self) -> usize {
        self.references - self.skipped.len()
    }

    /// Total number of draws.
    pub fn draw_count(&self) -> usize {
        self.population.len()
    }
}

/// Bootstrapped null-model generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullModelGenerator {
    /// Draws per reference graph.
    pub bootstraps: usize,
    /// RNG seed.
    pub seed: u64,
    /// Keep parallel edges in configuration-model draws (loops are still
    /// removed).
    pub keep_multi_edges: bool,
}

impl Default for NullModelGenerator {
    fn default() -> Self {
        Self {
            bootstraps: DEFAULT_BOOTSTRAPS,
            seed: DEFAULT_SEED,
            keep_multi_edges: false,
        }
    }
}

impl NullModelGenerator {
    /// Create a generator.
    pub fn new(bootstraps: usize, seed: u64) -> Self {
        Self {
            bootstraps,
            seed,
            keep_multi_edges: false,
        }
    }

    /// Keep parallel edges in configuration-model draws.
    pub fn with_multi_edges(mut self, keep: bool) -> Self {
        self.keep_multi_edges = keep;
        self
    }

    /// One simplified draw for `reference`.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        kind: NullModelKind,
        reference: &Graph,
        rng: &mut R,
    ) -> Result<Graph> {
        let graph = match kind {
            NullModelKind::Configuration => {
                let raw = configuration_model(&DegreeSequence::of(reference), rng)?;
                raw.simplify_with(true, !self.keep_multi_edges)
            }
            NullModelKind::ErdosRenyi => erdos_renyi(
                reference.vertex_count(),
                reference.edge_count(),
                reference.is_directed(),
                rng,
            )?,
        };
        Ok(match &reference.name {
            Some(name) => graph.with_name(name.clone()),
            None => graph,
        })
    }

    /// `bootstraps` draws for every graph of `reference`.
    ///
    /// A reference graph whose draws fail is logged, excluded and recorded
    /// in [`NullPopulation::skipped`]; the remaining graphs still
    /// contribute.
    pub fn generate(&self, kind: NullModelKind, reference: &Population) -> NullPopulation {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.generate_with_rng(kind, reference, &mut rng)
    }

    /// Like [`generate`](Self::generate), drawing from a caller-owned RNG.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        kind: NullModelKind,
        reference: &Population,
        rng: &mut R,
    ) -> NullPopulation {
        let mut draws = Vec::with_capacity(reference.len() * self.bootstraps);
        let mut origins = Vec::with_capacity(reference.len() * self.bootstraps);
        let mut skipped = Vec::new();

        for (index, graph) in reference.graphs().iter().enumerate() {
            let batch: Result<Vec<Graph>> = (0..self.bootstraps)
                .map(|_| self.draw(kind, graph, rng))
                .collect();
            match batch {
                Ok(batch) => {
                    origins.extend(std::iter::repeat_n(index, batch.len()));
                    draws.extend(batch);
                }
                Err(e) => {
                    log::warn!(
                        "Skipping {kind} draws for graph {index} ({}): {e}",
                        graph.name.as_deref().unwrap_or("unnamed")
                    );
                    skipped.push(SkippedReference {
                        index,
                        name: graph.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Generated {} {kind} draw(s) for {} ({} reference graph(s) skipped)",
            draws.len(),
            reference.name,
            skipped.len()
        );

        NullPopulation {
            kind,
            bootstraps: self.bootstraps,
            population: Population::new(
                format!("{}_{}", reference.name, kind.population_kind().slug()),
                kind.population_kind(),
                draws,
            ),
            origins,
            references: reference.len(),
            skipped,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
