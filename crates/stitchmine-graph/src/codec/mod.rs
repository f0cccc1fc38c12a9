//! Transaction formats exchanged with the external miners.
//!
//! Two line-oriented formats are supported:
//!
//! - [`TransactionFormat::GSpan`]: blocks headed by `t # <index>`, read and
//!   written by the undirected miner
//! - [`TransactionFormat::Nel`]: node/edge lists closed by `g <index>`, read
//!   and written by the directed miner
//!
//! Decoding is strict: a malformed line aborts with [`Error::Format`]
//! carrying its 1-based line number. Empty input decodes to no graphs.

pub mod gspan;
pub mod nel;

use crate::Graph;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use stitchmine_core::{Error, Result};

// ============================================================================
// Options
// ============================================================================

/// A textual graph-transaction format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionFormat {
    /// Undirected blocks with 0-based indices (`t`, `v`, `e`, `x:` lines).
    GSpan,
    /// Directed node/edge lists with 1-based indices (`v`, `e`, `g`, `x`, `s` lines).
    Nel,
}

impl TransactionFormat {
    /// File extension used for encoded inputs.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::GSpan => "gspan",
            Self::Nel => "nel",
        }
    }
}

impl fmt::Display for TransactionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TransactionFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gspan" | "a" => Ok(Self::GSpan),
            "nel" | "b" => Ok(Self::Nel),
            other => Err(Error::config(format!(
                "unknown transaction format '{other}' (expected gspan or nel)"
            ))),
        }
    }
}

/// Which block a gSpan header's `* <support>` belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportPlacement {
    /// The support on block k+1's header belongs to block k. The last block
    /// takes its support from a trailing `t # -1 * <support>` line, if any.
    #[default]
    FollowingHeader,
    /// Each header's support belongs to its own block.
    OwnHeader,
}

/// Options for [`decode_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Placement rule for gSpan header supports.
    #[serde(default)]
    pub support_placement: SupportPlacement,
}

impl DecodeOptions {
    /// Options with the given support placement.
    pub fn with_support_placement(support_placement: SupportPlacement) -> Self {
        Self { support_placement }
    }
}

// ============================================================================
// Encode / decode
// ============================================================================

/// Encode graphs in the given format.
pub fn encode(graphs: &[Graph], format: TransactionFormat) -> String {
    match format {
        TransactionFormat::GSpan => gspan::encode(graphs),
        TransactionFormat::Nel => nel::encode(graphs),
    }
}

/// Decode graphs with default options.
pub fn decode(text: &str, format: TransactionFormat) -> Result<Vec<Graph>> {
    decode_with(text, format, DecodeOptions::default())
}

/// Decode graphs.
pub fn decode_with(
    text: &str,
    format: TransactionFormat,
    options: DecodeOptions,
) -> Result<Vec<Graph>> {
    match format {
        TransactionFormat::GSpan => gspan::decode(text, options.support_placement),
        TransactionFormat::Nel => nel::decode(text),
    }
}

/// Encode graphs and write them to `path`.
pub fn write_transactions(path: &Path, graphs: &[Graph], format: TransactionFormat) -> Result<()> {
    std::fs::write(path, encode(graphs, format)).map_err(|e| Error::io_with_path(e, path))?;
    log::debug!("Wrote {} {format} transaction(s) to {}", graphs.len(), path.display());
    Ok(())
}

/// Read and decode a transaction file.
///
/// Format errors are tagged with `path`.
pub fn read_transactions(
    path: &Path,
    format: TransactionFormat,
    options: DecodeOptions,
) -> Result<Vec<Graph>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let graphs = decode_with(&text, format, options).map_err(|e| e.in_file(path))?;
    log::debug!("Decoded {} graph(s) from {}", graphs.len(), path.display());
    Ok(graphs)
}

// ============================================================================
// Line helpers
// ============================================================================

/// Parse a token as a non-negative integer, reporting `what` on failure.
pub(crate) fn parse_token<T: FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| Error::format(line, format!("invalid {what} '{token}'")))
}

/// Parse a support token; integral and fractional values are both accepted.
pub(crate) fn parse_support(token: &str, line: usize) -> Result<f64> {
    let support: f64 = parse_token(token, line, "support")?;
    if !support.is_finite() || support < 0.0 {
        return Err(Error::format(line, format!("invalid support '{token}'")));
    }
    Ok(support)
}

// ============================================================================
// Tests
// ============================================================================
