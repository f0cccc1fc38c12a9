//! Stitchmine Eval: motif significance and the end-to-end pipeline.
//!
//! Mined patterns become [`Motif`]s, which the [`Evaluator`] scores
//! against the observed population, an optional cross-platform
//! population and bootstrapped null models (dependency level 3).
//!
//! # Modules
//!
//! - [`motif`]: motifs, their evaluations and persisted records
//! - [`evaluator`]: support computation across populations
//! - [`pipeline`]: the configurable load → mine → evaluate run
//! - [`report`]: motif report documents and the shared record sink

#![doc = include_str!("../README.md")]

pub mod evaluator;
pub mod motif;
pub mod pipeline;
pub mod report;

// Re-export key types at crate root for convenience
pub use evaluator::Evaluator;
pub use motif::{Motif, MotifEvaluation, MotifRecord};
pub use pipeline::{Pipeline, PipelineInputs, PipelineSpec, PopulationSelection};
pub use report::{
    MotifReport, NullGap, RecordLine, ReportWriter, load_report, read_records, save_report,
};
