//! Handler functions for the pipeline commands.
//!
//! These functions implement `encode`, `mine`, `null-model`, `evaluate`,
//! `run` and `inspect`. Each loads what it needs from the configuration,
//! does its work through the library crates and prints a short summary.

use crate::config::StitchmineConfig;
use log::{debug, info};
use std::path::{Path, PathBuf};
use stitchmine_core::{Error, Result};
use stitchmine_eval::{
    Evaluator, Motif, MotifReport, NullGap, Pipeline, PipelineInputs, ReportWriter, save_report,
};
use stitchmine_graph::codec::{self, DecodeOptions};
use stitchmine_graph::loader::{EDGE_FILE_EXTENSION, load_edge_dir, load_edge_list};
use stitchmine_graph::persistence::{PopulationMetadata, load_population, save_population};
use stitchmine_graph::{
    Graph, NullModelKind, Population, PopulationKind, TransactionFormat, compute_stats,
    quick_summary, validate_graph,
};
use stitchmine_miner::{GSpanBackend, MinerStrategy, MiningBackend, MossBackend, mine};

// ============================================================================
// Option types
// ============================================================================

/// Which graphs of a loaded population a command works on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selection {
    /// Use largest components instead of whole graphs.
    pub lcc: bool,
    /// Keep edge colors.
    pub keep_colors: bool,
}

/// Options for `encode`.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Edge-list directory override.
    pub edges: Option<String>,
    /// Target format.
    pub format: TransactionFormat,
    /// Output file.
    pub output: PathBuf,
    /// Graph selection.
    pub selection: Selection,
}

/// Options for `mine`.
#[derive(Debug, Clone)]
pub struct MineOptions {
    /// Mining strategy.
    pub strategy: MinerStrategy,
    /// Edge-list directory override.
    pub edges: Option<String>,
    /// Graph selection.
    pub selection: Selection,
}

/// Options for `null-model`.
#[derive(Debug, Clone)]
pub struct NullModelOptions {
    /// Null-model family.
    pub kind: NullModelKind,
    /// Edge-list directory override.
    pub edges: Option<String>,
    /// Output file.
    pub output: PathBuf,
    /// Draws per reference graph override.
    pub bootstraps: Option<usize>,
    /// Seed override.
    pub seed: Option<u64>,
    /// Draw from largest components.
    pub lcc: bool,
}

/// Options for `evaluate`.
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    /// Miner output file.
    pub patterns: PathBuf,
    /// Pattern format.
    pub format: TransactionFormat,
    /// Edge-list directory override.
    pub edges: Option<String>,
    /// Cross-platform directory override.
    pub cross_platform: Option<String>,
    /// Null models to draw.
    pub null_models: Vec<NullModelKind>,
    /// Gate matching on edge colors.
    pub match_colors: bool,
    /// Evaluate against largest components.
    pub lcc: bool,
    /// Output report file.
    pub output: PathBuf,
}

/// Options for `run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Edge-list directory override.
    pub edges: Option<String>,
    /// Cross-platform directory override.
    pub cross_platform: Option<String>,
    /// Working directory override.
    pub work_dir: Option<String>,
    /// Shared JSON Lines record file.
    pub records: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the backend for `strategy` from its configuration section.
pub fn backend_for(config: &StitchmineConfig, strategy: MinerStrategy) -> Result<Box<dyn MiningBackend>> {
    Ok(match strategy {
        MinerStrategy::Undirected => Box::new(GSpanBackend::new(config.undirected_miner.clone())?),
        MinerStrategy::Directed => Box::new(MossBackend::new(config.directed_miner.clone())?),
    })
}

fn population_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graphs".to_string())
}

fn load_observed(config: &StitchmineConfig, edges: Option<&str>) -> Result<Population> {
    let dir = config.data.edges_dir(edges)?;
    let population = load_edge_dir(&dir, &population_name(&dir), PopulationKind::Observed)?;
    debug!("Loaded {} observed graph(s) from {}", population.len(), dir.display());
    Ok(population)
}

fn select(population: &Population, selection: Selection) -> Population {
    let simplified = population.simplified();
    let selected = if selection.lcc {
        simplified.largest_components()
    } else {
        simplified
    };
    if selection.keep_colors {
        selected
    } else {
        selected.without_colors()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Encode observed graphs as a transaction file.
pub fn handle_encode(config: &StitchmineConfig, options: EncodeOptions) -> Result<()> {
    let population = select(&load_observed(config, options.edges.as_deref())?, options.selection);
    codec::write_transactions(&options.output, population.graphs(), options.format)?;
    println!(
        "Encoded {} graph(s) as {} to {}",
        population.len(),
        options.format,
        options.output.display()
    );
    Ok(())
}

/// Mine observed graphs with one strategy.
pub async fn handle_mine(config: &StitchmineConfig, options: MineOptions) -> Result<()> {
    let population = select(&load_observed(config, options.edges.as_deref())?, options.selection);
    let backend = backend_for(config, options.strategy)?;

    let work_dir = config.data.work_dir(None);
    tokio::fs::create_dir_all(&work_dir)
        .await
        .map_err(|e| Error::io_with_path(e, &work_dir))?;
    let input = work_dir.join(format!(
        "{}_{}.{}",
        population.name,
        options.strategy,
        backend.format().extension()
    ));

    let decode = DecodeOptions::with_support_placement(config.pipeline.support_placement);
    let run = mine(backend.as_ref(), population.graphs(), &input, decode).await?;

    println!("Mined {} pattern(s) with {}", run.patterns.len(), run.backend);
    println!("  Input:  {}", run.input.display());
    println!("  Output: {}", run.output.display());
    Ok(())
}

/// Draw a null population and save it as JSON.
pub fn handle_null_model(config: &StitchmineConfig, options: NullModelOptions) -> Result<()> {
    let observed = load_observed(config, options.edges.as_deref())?;
    let reference = select(
        &observed,
        Selection {
            lcc: options.lcc,
            keep_colors: true,
        },
    );

    let mut generator = config.null_model.generator();
    if let Some(bootstraps) = options.bootstraps {
        generator.bootstraps = bootstraps;
    }
    if let Some(seed) = options.seed {
        generator.seed = seed;
    }

    let null = generator.generate(options.kind, &reference);
    let metadata = PopulationMetadata {
        source: Some(reference.name.clone()),
        seed: Some(generator.seed),
        bootstraps: Some(generator.bootstraps),
        ..Default::default()
    };
    save_population(&null.population, &options.output, Some(metadata))?;

    println!(
        "Drew {} {} graph(s) from {} reference graph(s) to {}",
        null.draw_count(),
        options.kind,
        null.contributing(),
        options.output.display()
    );
    for gap in &null.skipped {
        println!(
            "  Skipped graph {} ({}): {}",
            gap.index,
            gap.name.as_deref().unwrap_or("unnamed"),
            gap.reason
        );
    }
    Ok(())
}

/// Evaluate a miner output file and write a report.
pub fn handle_evaluate(config: &StitchmineConfig, options: EvaluateOptions) -> Result<()> {
    let selection = Selection {
        lcc: options.lcc,
        keep_colors: true,
    };
    let observed = select(&load_observed(config, options.edges.as_deref())?, selection);

    let decode = DecodeOptions::with_support_placement(config.pipeline.support_placement);
    let patterns = codec::read_transactions(&options.patterns, options.format, decode)?;
    let mut motifs = Motif::from_patterns(patterns);

    let mut evaluator = Evaluator::new(&observed, options.match_colors)?
        .parallel(config.pipeline.parallel);
    if let Some(dir) = config.data.cross_platform_dir(options.cross_platform.as_deref()) {
        let cross = load_edge_dir(&dir, &population_name(&dir), PopulationKind::CrossPlatform)?;
        evaluator = evaluator.with_cross_platform(&select(&cross, selection))?;
    }
    let generator = config.null_model.generator();
    let nulls: Vec<_> = options
        .null_models
        .iter()
        .map(|kind| generator.generate(*kind, &observed))
        .collect();
    for null in &nulls {
        evaluator = evaluator.with_null(null)?;
    }

    evaluator.evaluate_motifs(&mut motifs)?;

    let strategy = match options.format {
        TransactionFormat::GSpan => MinerStrategy::Undirected,
        TransactionFormat::Nel => MinerStrategy::Directed,
    };
    let mut report = MotifReport::new(
        &observed.name,
        strategy,
        options.patterns.display().to_string(),
        options.match_colors,
        observed.len(),
    );
    if !nulls.is_empty() {
        report.seed = Some(generator.seed);
    }
    report.null_models = nulls.iter().map(NullGap::of).collect();
    report.motifs = motifs.iter().filter_map(Motif::record).collect();
    save_report(&options.output, &report)?;

    println!(
        "Evaluated {} motif(s) against {} graph(s); report at {}",
        report.motifs.len(),
        report.graphs,
        options.output.display()
    );
    Ok(())
}

/// Run the configured pipeline.
pub async fn handle_run(config: &StitchmineConfig, options: RunOptions) -> Result<Vec<MotifReport>> {
    let observed = load_observed(config, options.edges.as_deref())?;
    let cross_platform = match config.data.cross_platform_dir(options.cross_platform.as_deref()) {
        Some(dir) if config.pipeline.cross_platform => Some(load_edge_dir(
            &dir,
            &population_name(&dir),
            PopulationKind::CrossPlatform,
        )?),
        _ => None,
    };

    let work_dir = config.data.work_dir(options.work_dir.as_deref());
    info!(
        "Running pipeline over '{}' in {}",
        observed.name,
        work_dir.display()
    );
    let mut pipeline = Pipeline::new(
        config.pipeline.clone(),
        config.null_model.generator(),
        &work_dir,
    );
    for strategy in &config.pipeline.strategies {
        pipeline = pipeline.with_backend(*strategy, backend_for(config, *strategy)?);
    }
    if let Some(records) = &options.records {
        pipeline = pipeline.with_sink(ReportWriter::append(records)?);
    }

    let reports = pipeline
        .run(&PipelineInputs {
            observed,
            cross_platform,
        })
        .await?;

    println!("Pipeline finished:");
    for report in &reports {
        println!(
            "  {:<32} {:>5} motif(s)  {}",
            format!("{} / {}", report.population, report.strategy),
            report.motifs.len(),
            work_dir.join(report.file_name()).display()
        );
    }
    Ok(reports)
}

/// Print a summary of every graph at `path`.
///
/// gSpan files are decoded with the configured support placement, so the
/// supports shown match what `evaluate` and `run` would use.
pub fn handle_inspect(config: &StitchmineConfig, path: &Path, validate: bool) -> Result<()> {
    let decode = DecodeOptions::with_support_placement(config.pipeline.support_placement);
    let graphs = load_any(path, decode)?;
    println!("{}: {} graph(s)", path.display(), graphs.len());

    let mut errors = 0;
    let mut warnings = 0;
    for (index, graph) in graphs.iter().enumerate() {
        let stats = compute_stats(graph);
        println!(
            "  [{index}] {:<24} {}  {} component(s), {} loop(s), {} parallel edge(s){}{}",
            graph.name.as_deref().unwrap_or("-"),
            quick_summary(graph),
            stats.component_count,
            stats.self_loop_count,
            stats.multi_edge_count,
            if stats.colored { ", colored" } else { "" },
            graph
                .support
                .map(|s| format!(", support {s}"))
                .unwrap_or_default()
        );

        let result = validate_graph(graph);
        errors += result.errors.len();
        warnings += result.warnings.len();
        if validate {
            for issue in result.errors.iter().chain(&result.warnings) {
                println!("      {}: {}", issue.code, issue.message);
            }
        }
    }

    println!("Validation: {errors} error(s), {warnings} warning(s)");
    Ok(())
}

fn load_any(path: &Path, decode: DecodeOptions) -> Result<Vec<Graph>> {
    if path.is_dir() {
        let population = load_edge_dir(path, &population_name(path), PopulationKind::Observed)?;
        return Ok(population.into_graphs());
    }
    if !path.exists() {
        return Err(Error::not_found(format!("{} does not exist", path.display())));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => Ok(load_population(path)?.into_graphs()),
        ext if ext == EDGE_FILE_EXTENSION => Ok(vec![load_edge_list(path)?]),
        "gspan" | "fp" => codec::read_transactions(path, TransactionFormat::GSpan, decode),
        "nel" | "moss" => codec::read_transactions(path, TransactionFormat::Nel, decode),
        other => Err(Error::config(format!(
            "cannot inspect '.{other}' files (expected a directory, .txt, .gspan, .nel or .json)"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
