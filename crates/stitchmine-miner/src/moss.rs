//! Directed mining with the MOSS jar.
//!
//! The miner runs on the JVM:
//!
//! ```text
//! java -Xmx<heap> -cp <jar> moss.Miner -inel -onel -x [-D] -m<min> -n<max>
//!     -s<percent> [-C] [-A] <input> <output>
//! ```
//!
//! `-D` treats edges as directed, `-C` lifts the restriction to closed
//! substructures and `-A` enables all extensions.

use crate::backend::MiningBackend;
use crate::process::{CommandSpec, execute};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stitchmine_core::{Error, Result, with_suffix};
use stitchmine_graph::TransactionFormat;

/// Suffix appended to the input path to name the output.
pub const OUTPUT_SUFFIX: &str = ".moss";

/// Settings for [`MossBackend`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MossOptions {
    /// Java executable.
    pub java: PathBuf,
    /// Path to the MOSS jar.
    pub jar: PathBuf,
    /// Entry point class.
    pub main_class: String,
    /// JVM maximum heap, as given to `-Xmx`.
    pub heap: String,
    /// Minimum support in percent of transactions.
    pub min_support_percent: u32,
    /// Minimum pattern size.
    pub min_size: usize,
    /// Maximum pattern size.
    pub max_size: usize,
    /// Treat edges as directed.
    pub directed: bool,
    /// Report only closed substructures.
    pub closed_only: bool,
    /// Generate all extensions.
    pub all_extensions: bool,
}

impl Default for MossOptions {
    fn default() -> Self {
        Self {
            java: PathBuf::from("java"),
            jar: PathBuf::from("moss.jar"),
            main_class: "moss.Miner".to_string(),
            heap: "6g".to_string(),
            min_support_percent: 10,
            min_size: 2,
            max_size: 4,
            directed: true,
            closed_only: false,
            all_extensions: true,
        }
    }
}

/// Directed miner adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MossBackend {
    options: MossOptions,
}

impl MossBackend {
    /// Create an adapter, checking support and size bounds.
    pub fn new(options: MossOptions) -> Result<Self> {
        if options.min_support_percent == 0 || options.min_support_percent > 100 {
            return Err(Error::config(format!(
                "directed min_support_percent must be in 1..=100, got {}",
                options.min_support_percent
            )));
        }
        if options.min_size == 0 || options.min_size > options.max_size {
            return Err(Error::config(format!(
                "directed pattern sizes must satisfy 1 <= min_size <= max_size, got {}..{}",
                options.min_size, options.max_size
            )));
        }
        if options.heap.trim().is_empty() {
            return Err(Error::config("directed miner heap must not be empty"));
        }
        Ok(Self { options })
    }

    /// The adapter's settings.
    pub fn options(&self) -> &MossOptions {
        &self.options
    }

    /// The command that mines `input` into `output`.
    pub fn command(&self, input: &Path, output: &Path) -> CommandSpec {
        let o = &self.options;
        CommandSpec::new(&o.java)
            .arg(format!("-Xmx{}", o.heap))
            .arg("-cp")
            .arg(&o.jar)
            .arg(&o.main_class)
            .arg("-inel")
            .arg("-onel")
            .arg("-x")
            .arg_if(o.directed, "-D")
            .arg(format!("-m{}", o.min_size))
            .arg(format!("-n{}", o.max_size))
            .arg(format!("-s{}", o.min_support_percent))
            .arg_if(!o.closed_only, "-C")
            .arg_if(o.all_extensions, "-A")
            .arg(input)
            .arg(output)
    }
}

#[async_trait]
impl MiningBackend for MossBackend {
    fn name(&self) -> &str {
        "moss"
    }

    fn format(&self) -> TransactionFormat {
        TransactionFormat::Nel
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        with_suffix(input, OUTPUT_SUFFIX)
    }

    async fn run(&self, input: &Path) -> Result<PathBuf> {
        let output = self.output_path(input);
        execute(&self.command(input, &output), &output).await?;
        Ok(output)
    }
}
