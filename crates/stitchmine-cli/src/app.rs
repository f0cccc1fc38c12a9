//! Stitchmine application: logging setup and command dispatch.

use crate::cli::{CliArgs, Command};
use crate::config::StitchmineConfig;
use crate::handlers::{
    self, EncodeOptions, EvaluateOptions, MineOptions, NullModelOptions, RunOptions, Selection,
};
use crate::config_handlers;
use std::path::PathBuf;
use stitchmine_core::Result;
use stitchmine_graph::{NullModelKind, TransactionFormat};
use stitchmine_miner::MinerStrategy;
use tracing_subscriber::EnvFilter;

// ============================================================================
// StitchmineCli
// ============================================================================

/// The `stitchmine` application.
pub struct StitchmineCli {
    name: String,
    config: StitchmineConfig,
    version: String,
}

impl StitchmineCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = StitchmineConfig::load(args.config.as_deref())?;
        tracing::debug!(
            path = ?StitchmineConfig::resolve_config_path(args.config.as_deref()),
            "configuration loaded"
        );
        Ok(Self::new("stitchmine", config))
    }

    /// Create a new application around an already loaded config.
    pub fn new(name: impl Into<String>, config: StitchmineConfig) -> Self {
        Self {
            name: name.into(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &StitchmineConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` if set, otherwise defaults based on verbosity flags.
    /// Library crates log through `log`; the subscriber picks those up too.
    pub fn init_logging(verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run one command.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        let Some(command) = args.command else {
            println!("{} {}; use --help for usage", self.name, self.version);
            return Ok(());
        };

        match command {
            Command::Encode {
                edges,
                format,
                output,
                lcc,
                keep_colors,
            } => handlers::handle_encode(
                &self.config,
                EncodeOptions {
                    edges,
                    format: format.parse::<TransactionFormat>()?,
                    output: PathBuf::from(output),
                    selection: Selection { lcc, keep_colors },
                },
            ),
            Command::Mine {
                strategy,
                edges,
                lcc,
                keep_colors,
            } => {
                let options = MineOptions {
                    strategy: strategy.parse::<MinerStrategy>()?,
                    edges,
                    selection: Selection { lcc, keep_colors },
                };
                handlers::handle_mine(&self.config, options).await
            }
            Command::NullModel {
                kind,
                edges,
                output,
                bootstraps,
                seed,
                lcc,
            } => handlers::handle_null_model(
                &self.config,
                NullModelOptions {
                    kind: kind.parse::<NullModelKind>()?,
                    edges,
                    output: PathBuf::from(output),
                    bootstraps,
                    seed,
                    lcc,
                },
            ),
            Command::Evaluate {
                patterns,
                format,
                edges,
                cross_platform,
                null_models,
                match_colors,
                lcc,
                output,
            } => {
                let null_models = null_models
                    .iter()
                    .map(|k| k.parse::<NullModelKind>())
                    .collect::<Result<Vec<_>>>()?;
                handlers::handle_evaluate(
                    &self.config,
                    EvaluateOptions {
                        patterns: PathBuf::from(patterns),
                        format: format.parse::<TransactionFormat>()?,
                        edges,
                        cross_platform,
                        null_models,
                        match_colors,
                        lcc,
                        output: PathBuf::from(output),
                    },
                )
            }
            Command::Run {
                edges,
                cross_platform,
                work_dir,
                records,
            } => {
                let options = RunOptions {
                    edges,
                    cross_platform,
                    work_dir,
                    records,
                };
                handlers::handle_run(&self.config, options).await.map(|_| ())
            }
            Command::Inspect { path, validate } => {
                handlers::handle_inspect(&self.config, &PathBuf::from(path), validate)
            }
            Command::Version => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Command::Config(cmd) => {
                config_handlers::handle_config_command(args.config.as_deref(), cmd.command)
            }
        }
    }
}

/// Entry point used by the binary.
///
/// `config` subcommands run before any configuration is loaded so that
/// `config init` and `config set` still work when the file is broken.
pub async fn run(args: CliArgs) -> Result<()> {
    StitchmineCli::init_logging(args.verbose, args.quiet);

    let args = match args.command {
        Some(Command::Config(cmd)) => {
            return config_handlers::handle_config_command(args.config.as_deref(), cmd.command);
        }
        command => CliArgs { command, ..args },
    };

    let app = StitchmineCli::from_args(&args)?;
    app.run(args).await
}

// ============================================================================
// Tests
// ============================================================================
