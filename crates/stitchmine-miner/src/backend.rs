//! Mining backend abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use stitchmine_core::{Error, Result};
use stitchmine_graph::TransactionFormat;

/// Abstraction over external frequent-subgraph miners.
///
/// A backend reads one encoded transaction file and writes its patterns
/// to [`output_path`](Self::output_path). Mining is deterministic for a
/// given input and parameter set, so failures are reported, never retried.
#[async_trait]
pub trait MiningBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Transaction format the miner reads and writes.
    fn format(&self) -> TransactionFormat;

    /// Where the miner writes patterns for `input`.
    fn output_path(&self, input: &Path) -> PathBuf;

    /// Mine `input`, returning the output path.
    ///
    /// Fails with [`Error::MinerExecution`] when the miner cannot be
    /// started, exits unsuccessfully or writes no output file.
    async fn run(&self, input: &Path) -> Result<PathBuf>;
}

/// Which miner family a pipeline run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinerStrategy {
    /// Undirected mining over gSpan transactions.
    Undirected,
    /// Directed mining over NEL transactions.
    Directed,
}

impl MinerStrategy {
    /// Both strategies in reporting order.
    pub const ALL: [MinerStrategy; 2] = [Self::Undirected, Self::Directed];

    /// Transaction format used by the strategy's miner.
    pub fn format(&self) -> TransactionFormat {
        match self {
            Self::Undirected => TransactionFormat::GSpan,
            Self::Directed => TransactionFormat::Nel,
        }
    }

    /// Configuration-file spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undirected => "undirected",
            Self::Directed => "directed",
        }
    }
}

impl fmt::Display for MinerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MinerStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "undirected" | "gspan" => Ok(Self::Undirected),
            "directed" | "moss" => Ok(Self::Directed),
            other => Err(Error::config(format!(
                "unknown mining strategy '{other}' (expected undirected or directed)"
            ))),
        }
    }
}
