//! Stitchmine Core: shared errors and utilities.
//!
//! This crate provides the foundational types used across all Stitchmine
//! crates. It has no internal Stitchmine dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`util`]: Path and timestamp helpers

#![doc = include_str!("../README.md")]

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use util::paths::{expand_tilde, with_suffix};
pub use util::time::timestamp_now;
