//! Undirected mining with a gSpan executable.
//!
//! The miner is invoked as `<program> -f <input> -s <fraction> -o -i`:
//! `-o` writes the mined patterns and `-i` lists, per pattern, the ids of
//! the transactions containing it. Output goes to `<input>.fp`.

use crate::backend::MiningBackend;
use crate::process::{CommandSpec, execute};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stitchmine_core::{Error, Result, with_suffix};
use stitchmine_graph::TransactionFormat;

/// Suffix the miner appends to its input path.
pub const OUTPUT_SUFFIX: &str = ".fp";

/// Settings for [`GSpanBackend`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GSpanOptions {
    /// Executable name or path.
    pub program: PathBuf,
    /// Minimum support as a fraction of transactions, in `(0, 1]`.
    pub min_support: f64,
}

impl Default for GSpanOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from("gSpan"),
            min_support: 0.6,
        }
    }
}

/// Undirected miner adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct GSpanBackend {
    options: GSpanOptions,
}

impl GSpanBackend {
    /// Create an adapter, checking the support fraction.
    pub fn new(options: GSpanOptions) -> Result<Self> {
        let s = options.min_support;
        if !(s > 0.0 && s <= 1.0) {
            return Err(Error::config(format!(
                "undirected min_support must be a fraction in (0, 1], got {s}"
            )));
        }
        Ok(Self { options })
    }

    /// The adapter's settings.
    pub fn options(&self) -> &GSpanOptions {
        &self.options
    }

    /// The command that mines `input`.
    pub fn command(&self, input: &Path) -> CommandSpec {
        CommandSpec::new(&self.options.program)
            .arg("-f")
            .arg(input)
            .arg("-s")
            .arg(self.options.min_support.to_string())
            .arg("-o")
            .arg("-i")
    }
}

#[async_trait]
impl MiningBackend for GSpanBackend {
    fn name(&self) -> &str {
        "gspan"
    }

    fn format(&self) -> TransactionFormat {
        TransactionFormat::GSpan
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        with_suffix(input, OUTPUT_SUFFIX)
    }

    async fn run(&self, input: &Path) -> Result<PathBuf> {
        let output = self.output_path(input);
        execute(&self.command(input), &output).await?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_arguments() {
        let backend = GSpanBackend::new(GSpanOptions::default()).unwrap();
        let spec = backend.command(Path::new("/data/graph.gspan"));
        assert_eq!(spec.program, "gSpan");
        assert_eq!(
            spec.display_args(),
            vec!["-f", "/data/graph.gspan", "-s", "0.6", "-o", "-i"]
        );
    }

    #[test]
    fn test_output_path() {
        let backend = GSpanBackend::new(GSpanOptions::default()).unwrap();
        assert_eq!(
            backend.output_path(Path::new("/data/lcc.gspan")),
            PathBuf::from("/data/lcc.gspan.fp")
        );
        assert_eq!(backend.format(), TransactionFormat::GSpan);
    }

    #[test]
    fn test_rejects_bad_support() {
        for min_support in [0.0, -0.5, 1.5, f64::NAN] {
            let options = GSpanOptions {
                min_support,
                ..Default::default()
            };
            assert!(GSpanBackend::new(options).is_err(), "{min_support}");
        }
        let full = GSpanOptions {
            min_support: 1.0,
            ..Default::default()
        };
        assert!(GSpanBackend::new(full).is_ok());
    }
}
