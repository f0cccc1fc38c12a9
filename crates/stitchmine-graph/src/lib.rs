//! Stitchmine Graph: graph model, codecs, matching and null models.
//!
//! This crate holds everything the pipeline does to graphs that does not
//! involve an external process (dependency level 1).
//!
//! # Modules
//!
//! - [`types`]: `Graph`, `Edge` and edge colors
//! - [`population`]: named, ordered graph collections
//! - [`codec`]: transaction formats read and written by the miners
//! - [`matcher`]: color-aware subgraph isomorphism
//! - [`null_model`]: configuration-model and Erdős–Rényi draws
//! - [`loader`]: edge-list input
//! - [`persistence`]: JSON save/load of populations
//! - [`stats`]: degree sequences and summary statistics
//! - [`validation`]: graph integrity checks

#![doc = include_str!("../README.md")]

pub mod codec;
pub mod loader;
pub mod matcher;
pub mod null_model;
pub mod persistence;
pub mod population;
pub mod stats;
pub mod types;
pub mod validation;

// Re-export key types at crate root for convenience
pub use codec::{DecodeOptions, SupportPlacement, TransactionFormat};
pub use matcher::{PreparedTarget, occurs};
pub use null_model::{NullModelGenerator, NullModelKind, NullPopulation, SkippedReference};
pub use population::{Population, PopulationKind};
pub use stats::{DegreeSequence, GraphStats, compute_stats, quick_summary};
pub use types::{Color, Edge, Graph, NEUTRAL_COLOR};
pub use validation::{ValidationIssue, ValidationResult, validate_graph};
