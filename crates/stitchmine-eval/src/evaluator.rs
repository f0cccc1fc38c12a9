//! Support computation for mined motifs.
//!
//! Every population is prepared once (adjacency indexes per graph) and then
//! shared read-only across motifs. With parallelism enabled, motifs are
//! evaluated on the rayon pool and their evaluations attached afterwards,
//! so workers never share mutable state.

use crate::motif::{Motif, MotifEvaluation};
use rayon::prelude::*;
use stitchmine_core::Result;
use stitchmine_graph::{Graph, NullModelKind, NullPopulation, Population, PreparedTarget};

// ============================================================================
// Prepared populations
// ============================================================================

/// A population with a matching index built for every graph.
struct PreparedPopulation {
    name: String,
    labels: Vec<String>,
    targets: Vec<PreparedTarget>,
}

impl PreparedPopulation {
    fn new(population: &Population) -> Result<Self> {
        let targets = population
            .graphs()
            .iter()
            .map(PreparedTarget::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: population.name.clone(),
            labels: population.labels(),
            targets,
        })
    }

    fn occurrences(&self, motif: &Graph, match_colors: bool) -> Result<Vec<bool>> {
        self.targets
            .iter()
            .map(|target| target.occurs(motif, match_colors))
            .collect()
    }

    fn hits(&self, motif: &Graph, match_colors: bool) -> Result<usize> {
        Ok(self
            .occurrences(motif, match_colors)?
            .into_iter()
            .filter(|&hit| hit)
            .count())
    }
}

struct PreparedNull {
    kind: NullModelKind,
    bootstraps: usize,
    draws: PreparedPopulation,
}

// ============================================================================
// Evaluator
// ============================================================================

/// Scores motifs against observed, cross-platform and null populations.
///
/// Reports raw supports only. No significance threshold is applied.
pub struct Evaluator {
    observed: PreparedPopulation,
    cross_platform: Option<PreparedPopulation>,
    nulls: Vec<PreparedNull>,
    match_colors: bool,
    parallel: bool,
}

impl Evaluator {
    /// An evaluator over the observed population.
    ///
    /// `match_colors` requires matched edges to agree on color wherever
    /// both motif and target are colored.
    pub fn new(observed: &Population, match_colors: bool) -> Result<Self> {
        Ok(Self {
            observed: PreparedPopulation::new(observed)?,
            cross_platform: None,
            nulls: Vec::new(),
            match_colors,
            parallel: true,
        })
    }

    /// Also count occurrences in an independent population.
    pub fn with_cross_platform(mut self, population: &Population) -> Result<Self> {
        self.cross_platform = Some(PreparedPopulation::new(population)?);
        Ok(self)
    }

    /// Also measure null support against `null`'s draws.
    ///
    /// A second population of the same kind replaces the first.
    pub fn with_null(mut self, null: &NullPopulation) -> Result<Self> {
        let prepared = PreparedNull {
            kind: null.kind,
            bootstraps: null.bootstraps,
            draws: PreparedPopulation::new(&null.population)?,
        };
        self.nulls.retain(|n| n.kind != null.kind);
        self.nulls.push(prepared);
        Ok(self)
    }

    /// Evaluate motifs in parallel (default) or one at a time.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Name of the observed population.
    pub fn observed_name(&self) -> &str {
        &self.observed.name
    }

    /// Number of observed graphs.
    pub fn observed_len(&self) -> usize {
        self.observed.targets.len()
    }

    /// Null-model kinds this evaluator measures.
    pub fn null_kinds(&self) -> Vec<NullModelKind> {
        self.nulls.iter().map(|n| n.kind).collect()
    }

    /// Supports of `motif` across every configured population.
    pub fn evaluate(&self, motif: &Graph) -> Result<MotifEvaluation> {
        let mut evaluation = MotifEvaluation {
            graph_occurrences: self.observed.occurrences(motif, self.match_colors)?,
            graph_labels: self.observed.labels.clone(),
            ..Default::default()
        };

        if let Some(cross) = &self.cross_platform {
            evaluation.cross_platform_support = Some(cross.hits(motif, self.match_colors)?);
        }

        for null in &self.nulls {
            let draws = null.draws.targets.len();
            if draws == 0 {
                log::warn!(
                    "No {} draws in {}; null support left empty",
                    null.kind,
                    null.draws.name
                );
                continue;
            }
            let hits = null.draws.hits(motif, self.match_colors)?;
            let support = hits as f64 / draws as f64;
            let expected = (null.bootstraps > 0).then(|| hits as f64 / null.bootstraps as f64);
            evaluation.set_null(null.kind, Some(support), expected);
        }

        Ok(evaluation)
    }

    /// Evaluate every motif and attach the results.
    ///
    /// Nothing is attached unless every motif evaluates successfully.
    pub fn evaluate_motifs(&self, motifs: &mut [Motif]) -> Result<()> {
        let evaluations: Vec<MotifEvaluation> = if self.parallel {
            motifs
                .par_iter()
                .map(|m| self.evaluate(&m.graph))
                .collect::<Result<Vec<_>>>()?
        } else {
            motifs
                .iter()
                .map(|m| self.evaluate(&m.graph))
                .collect::<Result<Vec<_>>>()?
        };

        for (motif, evaluation) in motifs.iter_mut().zip(evaluations) {
            motif.attach(evaluation)?;
        }

        log::info!(
            "Evaluated {} motif(s) against {} ({} graph(s))",
            motifs.len(),
            self.observed.name,
            self.observed.targets.len()
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
