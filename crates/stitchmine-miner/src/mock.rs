//! Mock mining backend for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stitchmine_core::{Error, Result, with_suffix};
use stitchmine_graph::TransactionFormat;
use tokio::sync::Mutex;

use crate::backend::MiningBackend;

/// Backend that writes canned miner output instead of running a process.
///
/// Clones share the recorded call list.
#[derive(Clone)]
pub struct MockBackend {
    format: TransactionFormat,
    output: Option<String>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockBackend {
    /// A backend that writes `output` for every input.
    pub fn new(format: TransactionFormat, output: impl Into<String>) -> Self {
        Self {
            format,
            output: Some(output.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend whose every run fails.
    pub fn failing(format: TransactionFormat) -> Self {
        Self {
            format,
            output: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inputs passed to [`MiningBackend::run`] so far.
    pub async fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl MiningBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn format(&self) -> TransactionFormat {
        self.format
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        with_suffix(input, ".mock")
    }

    async fn run(&self, input: &Path) -> Result<PathBuf> {
        self.calls.lock().await.push(input.to_path_buf());

        let Some(text) = &self.output else {
            return Err(Error::miner("mock miner configured to fail"));
        };
        let output = self.output_path(input);
        tokio::fs::write(&output, text)
            .await
            .map_err(|e| Error::io_with_path(e, &output))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_mock_writes_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("graph.gspan");
        let backend = MockBackend::new(TransactionFormat::GSpan, "t # 0\nv 0 0\n");

        let output = backend.run(&input).await.unwrap();
        assert_eq!(output, dir.path().join("graph.gspan.mock"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "t # 0\nv 0 0\n");
        assert_eq!(backend.calls().await, vec![input]);
    }

    #[tokio::test]
    async fn test_mock_failing() {
        let backend = MockBackend::failing(TransactionFormat::Nel);
        let clone = backend.clone();
        let err = backend.run(Path::new("x.nel")).await.unwrap_err();
        assert!(err.is_miner());
        assert_eq!(clone.calls().await.len(), 1);
    }
}
