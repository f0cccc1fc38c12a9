//! Stitchmine Miner: adapters for external frequent-subgraph miners.
//!
//! Miners are opaque subprocesses. Each adapter implements
//! [`MiningBackend`], turning an encoded transaction file into a pattern
//! file in the same format (dependency level 2).
//!
//! # Modules
//!
//! - [`backend`]: the `MiningBackend` trait and `MinerStrategy`
//! - [`gspan`]: undirected gSpan adapter
//! - [`moss`]: directed MOSS adapter
//! - [`mining`]: encode → mine → decode driver
//! - [`process`]: subprocess execution

#![doc = include_str!("../README.md")]

pub mod backend;
pub mod gspan;
pub mod mining;
pub mod moss;
pub mod process;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export key types at crate root for convenience
pub use backend::{MinerStrategy, MiningBackend};
pub use gspan::{GSpanBackend, GSpanOptions};
pub use mining::{MiningRun, decode_output, mine, run_miner};
pub use moss::{MossBackend, MossOptions};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockBackend;
