//! Encode, mine, decode.

use crate::backend::MiningBackend;
use std::path::{Path, PathBuf};
use stitchmine_core::{Error, Result};
use stitchmine_graph::Graph;
use stitchmine_graph::codec::{self, DecodeOptions};

/// Files and patterns from one mining pass.
#[derive(Clone, Debug)]
pub struct MiningRun {
    /// Backend name.
    pub backend: String,
    /// Encoded transaction file given to the miner.
    pub input: PathBuf,
    /// File the miner wrote.
    pub output: PathBuf,
    /// Decoded patterns in output order.
    pub patterns: Vec<Graph>,
}

/// Run `backend` over an already-encoded `input` file.
pub async fn run_miner(backend: &dyn MiningBackend, input: &Path) -> Result<PathBuf> {
    if !input.is_file() {
        return Err(Error::miner(format!(
            "{} input {} does not exist",
            backend.name(),
            input.display()
        )));
    }
    backend.run(input).await
}

/// Decode a miner output file in the backend's format.
pub async fn decode_output(
    backend: &dyn MiningBackend,
    output: &Path,
    options: DecodeOptions,
) -> Result<Vec<Graph>> {
    let text = tokio::fs::read_to_string(output)
        .await
        .map_err(|e| Error::io_with_path(e, output))?;
    codec::decode_with(&text, backend.format(), options).map_err(|e| e.in_file(output))
}

/// Encode `graphs` to `input`, mine it and decode the patterns.
pub async fn mine(
    backend: &dyn MiningBackend,
    graphs: &[Graph],
    input: &Path,
    options: DecodeOptions,
) -> Result<MiningRun> {
    let text = codec::encode(graphs, backend.format());
    tokio::fs::write(input, text)
        .await
        .map_err(|e| Error::io_with_path(e, input))?;
    log::debug!(
        "Encoded {} graph(s) as {} to {}",
        graphs.len(),
        backend.format(),
        input.display()
    );

    let output = run_miner(backend, input).await?;
    let patterns = decode_output(backend, &output, options).await?;
    log::info!(
        "{} mined {} pattern(s) from {}",
        backend.name(),
        patterns.len(),
        input.display()
    );

    Ok(MiningRun {
        backend: backend.name().to_string(),
        input: input.to_path_buf(),
        output,
        patterns,
    })
}

// ============================================================================
// Tests
// ============================================================================
