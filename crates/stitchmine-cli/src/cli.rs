//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Frequent subgraph mining and motif significance for interaction graphs.
#[derive(Parser, Debug)]
#[command(name = "stitchmine", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "STITCHMINE_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Stitchmine commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode an edge-list directory as miner transactions.
    Encode {
        /// Edge-list directory (defaults to data.edges_dir).
        #[arg(short, long)]
        edges: Option<String>,

        /// Transaction format: gspan or nel.
        #[arg(short, long, default_value = "gspan")]
        format: String,

        /// Output file.
        #[arg(short, long)]
        output: String,

        /// Encode largest components instead of whole graphs.
        #[arg(long)]
        lcc: bool,

        /// Keep edge colors (encoded as 0 otherwise).
        #[arg(long)]
        keep_colors: bool,
    },

    /// Run one mining strategy over an edge-list directory.
    Mine {
        /// Strategy: undirected or directed.
        #[arg(short, long, default_value = "undirected")]
        strategy: String,

        /// Edge-list directory (defaults to data.edges_dir).
        #[arg(short, long)]
        edges: Option<String>,

        /// Mine largest components instead of whole graphs.
        #[arg(long)]
        lcc: bool,

        /// Keep edge colors in the mined transactions.
        #[arg(long)]
        keep_colors: bool,
    },

    /// Draw and save a null-model population.
    NullModel {
        /// Null model: configuration or erdos_renyi.
        #[arg(short, long, default_value = "configuration")]
        kind: String,

        /// Edge-list directory of reference graphs (defaults to data.edges_dir).
        #[arg(short, long)]
        edges: Option<String>,

        /// Output JSON file.
        #[arg(short, long)]
        output: String,

        /// Draws per reference graph (defaults to null_model.bootstraps).
        #[arg(short, long)]
        bootstraps: Option<usize>,

        /// RNG seed (defaults to null_model.seed).
        #[arg(long)]
        seed: Option<u64>,

        /// Draw from largest components instead of whole graphs.
        #[arg(long)]
        lcc: bool,
    },

    /// Evaluate a miner pattern file against a population.
    Evaluate {
        /// Miner output file.
        #[arg(short, long)]
        patterns: String,

        /// Pattern format: gspan or nel.
        #[arg(short, long, default_value = "gspan")]
        format: String,

        /// Edge-list directory of observed graphs (defaults to data.edges_dir).
        #[arg(short, long)]
        edges: Option<String>,

        /// Cross-platform edge-list directory (defaults to data.cross_platform_dir).
        #[arg(long)]
        cross_platform: Option<String>,

        /// Null models to draw; repeat for several.
        #[arg(short = 'n', long = "null-model")]
        null_models: Vec<String>,

        /// Require matched edges to agree on color.
        #[arg(long)]
        match_colors: bool,

        /// Evaluate against largest components instead of whole graphs.
        #[arg(long)]
        lcc: bool,

        /// Output report file.
        #[arg(short, long)]
        output: String,
    },

    /// Run the configured pipeline end to end.
    Run {
        /// Edge-list directory (defaults to data.edges_dir).
        #[arg(short, long)]
        edges: Option<String>,

        /// Cross-platform edge-list directory (defaults to data.cross_platform_dir).
        #[arg(long)]
        cross_platform: Option<String>,

        /// Working directory (defaults to data.work_dir).
        #[arg(short, long)]
        work_dir: Option<String>,

        /// Also append every record to this JSON Lines file.
        #[arg(long)]
        records: Option<String>,
    },

    /// Summarise graphs in a directory, transaction file or population file.
    Inspect {
        /// Edge-list directory, `.txt` edge list, `.gspan`/`.nel` file or
        /// population `.json`.
        path: String,

        /// Print validation issues for every graph.
        #[arg(long)]
        validate: bool,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "null_model.bootstraps").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "undirected_miner.min_support").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["stitchmine"]);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_args_flags() {
        let args = CliArgs::parse_from(["stitchmine", "--verbose", "--config", "/tmp/c.toml"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("/tmp/c.toml"));
    }

    #[test]
    fn test_encode_command() {
        let args = CliArgs::parse_from([
            "stitchmine", "encode", "--edges", "edges", "--format", "nel", "-o", "out.nel", "--lcc",
        ]);
        match args.command {
            Some(Command::Encode {
                edges,
                format,
                output,
                lcc,
                keep_colors,
            }) => {
                assert_eq!(edges.as_deref(), Some("edges"));
                assert_eq!(format, "nel");
                assert_eq!(output, "out.nel");
                assert!(lcc);
                assert!(!keep_colors);
            }
            _ => panic!("Expected Encode command"),
        }
    }

    #[test]
    fn test_mine_command_defaults() {
        let args = CliArgs::parse_from(["stitchmine", "mine"]);
        match args.command {
            Some(Command::Mine { strategy, edges, .. }) => {
                assert_eq!(strategy, "undirected");
                assert!(edges.is_none());
            }
            _ => panic!("Expected Mine command"),
        }
    }

    #[test]
    fn test_null_model_command() {
        let args = CliArgs::parse_from([
            "stitchmine",
            "null-model",
            "--kind",
            "er",
            "-o",
            "er.json",
            "--bootstraps",
            "5",
            "--seed",
            "7",
        ]);
        match args.command {
            Some(Command::NullModel {
                kind,
                output,
                bootstraps,
                seed,
                ..
            }) => {
                assert_eq!(kind, "er");
                assert_eq!(output, "er.json");
                assert_eq!(bootstraps, Some(5));
                assert_eq!(seed, Some(7));
            }
            _ => panic!("Expected NullModel command"),
        }
    }

    #[test]
    fn test_evaluate_repeated_null_models() {
        let args = CliArgs::parse_from([
            "stitchmine",
            "evaluate",
            "-p",
            "g.gspan.fp",
            "-n",
            "configuration",
            "-n",
            "erdos_renyi",
            "-o",
            "report.json",
        ]);
        match args.command {
            Some(Command::Evaluate {
                patterns,
                format,
                null_models,
                match_colors,
                ..
            }) => {
                assert_eq!(patterns, "g.gspan.fp");
                assert_eq!(format, "gspan");
                assert_eq!(null_models, vec!["configuration", "erdos_renyi"]);
                assert!(!match_colors);
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_run_command() {
        let args = CliArgs::parse_from(["stitchmine", "run", "--work-dir", "/tmp/w"]);
        match args.command {
            Some(Command::Run { work_dir, records, .. }) => {
                assert_eq!(work_dir.as_deref(), Some("/tmp/w"));
                assert!(records.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_inspect_command() {
        let args = CliArgs::parse_from(["stitchmine", "inspect", "edges", "--validate"]);
        match args.command {
            Some(Command::Inspect { path, validate }) => {
                assert_eq!(path, "edges");
                assert!(validate);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_version_command() {
        let args = CliArgs::parse_from(["stitchmine", "version"]);
        assert!(matches!(args.command, Some(Command::Version)));
    }

    #[test]
    fn test_config_commands() {
        let args = CliArgs::parse_from(["stitchmine", "config", "get", "null_model.seed"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Get { key },
            })) => assert_eq!(key, "null_model.seed"),
            _ => panic!("Expected Config Get command"),
        }

        let args = CliArgs::parse_from(["stitchmine", "config", "init", "--force"]);
        assert!(matches!(
            args.command,
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Init { force: true, .. },
            }))
        ));
    }
}
