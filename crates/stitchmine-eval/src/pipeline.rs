//! The configurable mining and evaluation run.
//!
//! One [`PipelineSpec`] names which population selections to mine, with
//! which strategies, whether edge colors count, which null models to draw
//! and whether to score a cross-platform population. For every selection
//! the pipeline:
//!
//! 1. simplifies the observed graphs and takes the selection (whole graphs
//!    or largest components)
//! 2. draws the null populations from the selected graphs
//! 3. mines the selection with each strategy's backend
//! 4. evaluates the mined motifs and writes one report per strategy
//!
//! Null draws are regenerated on every run. A failed run leaves no
//! resumable state.

use crate::evaluator::Evaluator;
use crate::motif::Motif;
use crate::report::{MotifReport, NullGap, ReportWriter, save_report};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use stitchmine_core::{Error, Result};
use stitchmine_graph::{
    DecodeOptions, NullModelGenerator, NullModelKind, Population, SupportPlacement,
};
use stitchmine_miner::{MinerStrategy, MiningBackend, mine};

// ============================================================================
// Configuration
// ============================================================================

/// Which graphs of a population are mined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationSelection {
    /// Whole simplified graphs.
    Graph,
    /// Largest weakly connected component of each simplified graph.
    Lcc,
}

impl PopulationSelection {
    /// Both selections in reporting order.
    pub const ALL: [PopulationSelection; 2] = [Self::Graph, Self::Lcc];

    /// Configuration-file spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Lcc => "lcc",
        }
    }

    /// Apply the selection to an already simplified population.
    pub fn select(&self, population: &Population) -> Population {
        match self {
            Self::Graph => population.clone(),
            Self::Lcc => population.largest_components(),
        }
    }
}

impl fmt::Display for PopulationSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PopulationSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "graph" => Ok(Self::Graph),
            "lcc" => Ok(Self::Lcc),
            other => Err(Error::config(format!(
                "unknown population selection '{other}' (expected graph or lcc)"
            ))),
        }
    }
}

/// Everything that varies between pipeline runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSpec {
    /// Population selections to mine.
    pub populations: Vec<PopulationSelection>,
    /// Mining strategies to run on each selection.
    pub strategies: Vec<MinerStrategy>,
    /// Mine and match with edge colors.
    pub match_colors: bool,
    /// Null models to draw for each selection.
    pub null_models: Vec<NullModelKind>,
    /// Score motifs against the cross-platform population.
    pub cross_platform: bool,
    /// Placement rule for supports in gSpan miner output. `gSpan -o -i`
    /// writes each pattern's support on its own header.
    pub support_placement: SupportPlacement,
    /// Evaluate motifs on the rayon pool.
    pub parallel: bool,
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self {
            populations: PopulationSelection::ALL.to_vec(),
            strategies: MinerStrategy::ALL.to_vec(),
            match_colors: false,
            null_models: NullModelKind::ALL.to_vec(),
            cross_platform: false,
            support_placement: SupportPlacement::OwnHeader,
            parallel: true,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Populations a run works on.
#[derive(Clone, Debug)]
pub struct PipelineInputs {
    /// Observed graphs as loaded.
    pub observed: Population,
    /// Independently sourced graphs, if available.
    pub cross_platform: Option<Population>,
}

/// A configured pipeline.
pub struct Pipeline {
    spec: PipelineSpec,
    generator: NullModelGenerator,
    backends: HashMap<MinerStrategy, Box<dyn MiningBackend>>,
    work_dir: PathBuf,
    sink: Option<ReportWriter>,
}

impl Pipeline {
    /// A pipeline writing transaction files and reports under `work_dir`.
    pub fn new(spec: PipelineSpec, generator: NullModelGenerator, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            generator,
            backends: HashMap::new(),
            work_dir: work_dir.into(),
            sink: None,
        }
    }

    /// Mine `strategy` with `backend`.
    pub fn with_backend(mut self, strategy: MinerStrategy, backend: Box<dyn MiningBackend>) -> Self {
        self.backends.insert(strategy, backend);
        self
    }

    /// Also append every record to `sink`.
    pub fn with_sink(mut self, sink: ReportWriter) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The run configuration.
    pub fn spec(&self) -> &PipelineSpec {
        &self.spec
    }

    /// Directory for transaction files and reports.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Check that the configuration can run.
    pub fn validate(&self) -> Result<()> {
        if self.spec.populations.is_empty() {
            return Err(Error::config("pipeline selects no populations"));
        }
        if self.spec.strategies.is_empty() {
            return Err(Error::config("pipeline runs no mining strategies"));
        }
        for strategy in &self.spec.strategies {
            let backend = self.backend(*strategy)?;
            if backend.format() != strategy.format() {
                return Err(Error::config(format!(
                    "{} backend reads {} transactions but the {strategy} strategy needs {}",
                    backend.name(),
                    backend.format(),
                    strategy.format()
                )));
            }
        }
        Ok(())
    }

    fn backend(&self, strategy: MinerStrategy) -> Result<&dyn MiningBackend> {
        self.backends
            .get(&strategy)
            .map(|b| b.as_ref())
            .ok_or_else(|| Error::config(format!("no miner configured for the {strategy} strategy")))
    }

    /// Run every selection and strategy, returning the reports in order.
    pub async fn run(&self, inputs: &PipelineInputs) -> Result<Vec<MotifReport>> {
        self.validate()?;
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|e| Error::io_with_path(e, &self.work_dir))?;

        let observed = inputs.observed.simplified();
        let cross_platform = match (&inputs.cross_platform, self.spec.cross_platform) {
            (Some(population), true) => Some(population.simplified()),
            (None, true) => {
                log::warn!("Cross-platform scoring requested but no population was given");
                None
            }
            (_, false) => None,
        };

        let mut reports = Vec::new();
        for selection in &self.spec.populations {
            let population = selection.select(&observed);
            log::info!(
                "Evaluating {} ({selection}, {} graph(s))",
                population.name,
                population.len()
            );

            let nulls: Vec<_> = self
                .spec
                .null_models
                .iter()
                .map(|kind| self.generator.generate(*kind, &population))
                .collect();

            let mut evaluator =
                Evaluator::new(&population, self.spec.match_colors)?.parallel(self.spec.parallel);
            if let Some(cross) = &cross_platform {
                evaluator = evaluator.with_cross_platform(&selection.select(cross))?;
            }
            for null in &nulls {
                evaluator = evaluator.with_null(null)?;
            }

            let mining_input = if self.spec.match_colors {
                population.clone()
            } else {
                population.without_colors()
            };

            for strategy in &self.spec.strategies {
                let backend = self.backend(*strategy)?;
                let input = self.work_dir.join(format!(
                    "{}_{strategy}.{}",
                    population.name,
                    backend.format().extension()
                ));
                let options = DecodeOptions::with_support_placement(self.spec.support_placement);
                let run = mine(backend, mining_input.graphs(), &input, options).await?;

                let mut motifs = Motif::from_patterns(run.patterns);
                evaluator.evaluate_motifs(&mut motifs)?;

                let mut report = MotifReport::new(
                    &population.name,
                    *strategy,
                    run.backend,
                    self.spec.match_colors,
                    population.len(),
                );
                if !nulls.is_empty() {
                    report.seed = Some(self.generator.seed);
                }
                report.null_models = nulls.iter().map(NullGap::of).collect();
                report.motifs = motifs.iter().filter_map(Motif::record).collect();

                save_report(self.work_dir.join(report.file_name()), &report)?;
                if let Some(sink) = &self.sink {
                    sink.write_report(&report)?;
                }
                reports.push(report);
            }
        }
        Ok(reports)
    }
}

// ============================================================================
// Tests
// ============================================================================
