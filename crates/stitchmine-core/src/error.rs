//! Error types for Stitchmine operations.
//!
//! This module provides the common `Error` type and `Result<T>` alias used
//! across all Stitchmine crates. Uses `thiserror` for derive macros.
//!
//! The variants follow the pipeline's failure taxonomy:
//!
//! - [`Error::Format`]: malformed transaction-file input (fatal for the run)
//! - [`Error::MinerExecution`]: the external miner failed or wrote nothing
//! - [`Error::NullModelGeneration`]: a reference graph admits no null draw
//!   (callers skip that graph and record the gap)
//! - [`Error::Match`]: a matcher contract violation

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in Stitchmine operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Malformed codec input.
    #[error("Format error{}: line {line}: {message}", .file.as_ref().map(|f| format!(" in {}", f.display())).unwrap_or_default())]
    Format {
        /// File the input came from, when known.
        file: Option<PathBuf>,
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The external miner failed or produced no output file.
    #[error("Miner execution failed: {0}")]
    MinerExecution(String),

    /// A null-model draw could not be generated for a reference graph.
    #[error("Null model generation failed: {0}")]
    NullModelGeneration(String),

    /// Matcher contract violation.
    #[error("Match error: {0}")]
    Match(String),

    /// A graph violates the graph model invariants.
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a format error for a 1-based line number.
    pub fn format(line: usize, msg: impl Into<String>) -> Self {
        Self::Format {
            file: None,
            line,
            message: msg.into(),
        }
    }

    /// Create a miner execution error.
    pub fn miner(msg: impl Into<String>) -> Self {
        Self::MinerExecution(msg.into())
    }

    /// Create a null model generation error.
    pub fn null_model(msg: impl Into<String>) -> Self {
        Self::NullModelGeneration(msg.into())
    }

    /// Create a matcher contract error.
    pub fn matching(msg: impl Into<String>) -> Self {
        Self::Match(msg.into())
    }

    /// Create an invalid graph error.
    pub fn invalid_graph(msg: impl Into<String>) -> Self {
        Self::InvalidGraph(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Wrap an I/O error.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Wrap an I/O error together with the path that caused it.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source: err,
        }
    }

    /// Attach the originating file to a format error.
    ///
    /// Other variants are returned unchanged.
    pub fn in_file(self, path: impl AsRef<Path>) -> Self {
        match self {
            Self::Format { line, message, .. } => Self::Format {
                file: Some(path.as_ref().to_path_buf()),
                line,
                message,
            },
            other => other,
        }
    }

    /// Whether this is a codec format error.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Whether this is a miner execution error.
    pub fn is_miner(&self) -> bool {
        matches!(self, Self::MinerExecution(_))
    }

    /// Whether this is a null model generation error.
    pub fn is_null_model(&self) -> bool {
        matches!(self, Self::NullModelGeneration(_))
    }
}

/// Result type alias using Stitchmine's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = Error::format(3, "expected 4 tokens");
        assert_eq!(err.to_string(), "Format error: line 3: expected 4 tokens");
        assert!(err.is_format());
    }

    #[test]
    fn test_format_error_in_file() {
        let err = Error::format(7, "bad edge").in_file("/data/graph.gspan");
        assert_eq!(
            err.to_string(),
            "Format error in /data/graph.gspan: line 7: bad edge"
        );
    }

    #[test]
    fn test_in_file_leaves_other_variants() {
        let err = Error::miner("exit status 1").in_file("/data/graph.nel");
        assert!(err.is_miner());
        assert_eq!(err.to_string(), "Miner execution failed: exit status 1");
    }

    #[test]
    fn test_io_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/tmp/x.fp");
        assert!(err.to_string().contains("/tmp/x.fp"));
    }

    #[test]
    fn test_io_from() {
        fn fails() -> Result<()> {
            Err(std::io::Error::other("boom"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(Error::Io(_))));
    }

    #[test]
    fn test_null_model_predicate() {
        assert!(Error::null_model("odd stub count").is_null_model());
        assert!(!Error::config("x").is_null_model());
    }
}
