//! Configuration for the `stitchmine` binary.
//!
//! Provides [`StitchmineConfig`], loaded from TOML files, environment
//! variables and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `STITCHMINE_CONFIG` environment variable
//! 3. XDG default: `~/.config/stitchmine/config.toml`
//! 4. Built-in defaults

use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stitchmine_core::{Error, Result, expand_tilde};
use stitchmine_eval::PipelineSpec;
use stitchmine_graph::NullModelGenerator;
use stitchmine_graph::null_model::{DEFAULT_BOOTSTRAPS, DEFAULT_SEED};
use stitchmine_miner::{GSpanOptions, MossOptions};

/// Environment prefix for overrides and exports.
pub const ENV_PREFIX: &str = "STITCHMINE";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchmineConfig {
    /// Input and output locations.
    pub data: DataConfig,

    /// Undirected (gSpan) miner settings.
    pub undirected_miner: GSpanOptions,

    /// Directed (MOSS) miner settings.
    pub directed_miner: MossOptions,

    /// Null-model generation settings.
    pub null_model: NullModelConfig,

    /// What the `run` command does.
    pub pipeline: PipelineSpec,
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory of observed edge lists.
    pub edges_dir: Option<String>,

    /// Directory of cross-platform edge lists.
    pub cross_platform_dir: Option<String>,

    /// Directory for transaction files, miner outputs and reports.
    pub work_dir: String,
}

/// Null-model generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NullModelConfig {
    /// Draws per reference graph.
    pub bootstraps: usize,

    /// RNG seed.
    pub seed: u64,

    /// Keep parallel edges in configuration-model draws.
    pub keep_multi_edges: bool,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            edges_dir: None,
            cross_platform_dir: None,
            work_dir: "stitchmine-work".to_string(),
        }
    }
}

impl Default for NullModelConfig {
    fn default() -> Self {
        Self {
            bootstraps: DEFAULT_BOOTSTRAPS,
            seed: DEFAULT_SEED,
            keep_multi_edges: false,
        }
    }
}

impl NullModelConfig {
    /// A generator with these settings.
    pub fn generator(&self) -> NullModelGenerator {
        NullModelGenerator::new(self.bootstraps, self.seed).with_multi_edges(self.keep_multi_edges)
    }
}

impl DataConfig {
    /// The observed edge directory, preferring `explicit`.
    pub fn edges_dir(&self, explicit: Option<&str>) -> Result<PathBuf> {
        explicit
            .or(self.edges_dir.as_deref())
            .map(expand_tilde)
            .ok_or_else(|| {
                Error::config("no edge directory given; pass --edges or set data.edges_dir")
            })
    }

    /// The cross-platform edge directory, preferring `explicit`.
    pub fn cross_platform_dir(&self, explicit: Option<&str>) -> Option<PathBuf> {
        explicit
            .or(self.cross_platform_dir.as_deref())
            .map(expand_tilde)
    }

    /// The working directory, preferring `explicit`.
    pub fn work_dir(&self, explicit: Option<&str>) -> PathBuf {
        expand_tilde(explicit.unwrap_or(&self.work_dir))
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl StitchmineConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        env_opts.add_section("data");
        env_opts.add_section("undirected_miner");
        env_opts.add_section("directed_miner");
        env_opts.add_section("null_model");
        env_opts.add_section("pipeline");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(expand_tilde(path));
        }

        if let Ok(path) = std::env::var("STITCHMINE_CONFIG") {
            return Some(expand_tilde(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stitchmine").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with the
    /// `STITCHMINE_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;
    use stitchmine_eval::PopulationSelection;
    use stitchmine_graph::{NullModelKind, SupportPlacement};
    use stitchmine_miner::MinerStrategy;

    #[test]
    fn test_config_default() {
        let config = StitchmineConfig::default();
        assert_eq!(config.undirected_miner.min_support, 0.6);
        assert_eq!(config.directed_miner.min_support_percent, 10);
        assert_eq!(config.null_model.bootstraps, 10);
        assert_eq!(config.null_model.seed, 42);
        assert_eq!(config.data.work_dir, "stitchmine-work");
        assert!(!config.pipeline.match_colors);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [data]
            edges_dir = "/data/tiktok"
            work_dir = "/tmp/fsm"

            [undirected_miner]
            program = "/opt/gSpan"
            min_support = 0.4

            [directed_miner]
            heap = "2g"
            max_size = 5

            [null_model]
            bootstraps = 100
            seed = 7

            [pipeline]
            populations = ["lcc"]
            strategies = ["directed"]
            match_colors = true
            null_models = ["erdos_renyi"]
            support_placement = "following_header"
        "#;

        let config: StitchmineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.edges_dir.as_deref(), Some("/data/tiktok"));
        assert_eq!(config.undirected_miner.program, Path::new("/opt/gSpan"));
        assert_eq!(config.undirected_miner.min_support, 0.4);
        assert_eq!(config.directed_miner.heap, "2g");
        assert_eq!(config.directed_miner.max_size, 5);
        assert_eq!(config.directed_miner.min_size, 2);
        assert_eq!(config.null_model.bootstraps, 100);
        assert_eq!(config.pipeline.populations, vec![PopulationSelection::Lcc]);
        assert_eq!(config.pipeline.strategies, vec![MinerStrategy::Directed]);
        assert_eq!(config.pipeline.null_models, vec![NullModelKind::ErdosRenyi]);
        assert_eq!(config.pipeline.support_placement, SupportPlacement::FollowingHeader);
        assert!(config.pipeline.match_colors);
        assert!(config.pipeline.parallel);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = StitchmineConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[undirected_miner]"));
        assert!(toml_str.contains("[pipeline]"));

        let parsed: StitchmineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.pipeline, config.pipeline);
        assert_eq!(parsed.directed_miner, config.directed_miner);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [data]
                work_dir = "/tmp/loaded"
            "#,
        )
        .unwrap();

        let config = StitchmineConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.data.work_dir, "/tmp/loaded");
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let config = StitchmineConfig::load(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.null_model.seed, 42);
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = StitchmineConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    #[test]
    fn test_data_paths() {
        let data = DataConfig {
            edges_dir: Some("/data/edges".into()),
            ..Default::default()
        };
        assert_eq!(data.edges_dir(None).unwrap(), PathBuf::from("/data/edges"));
        assert_eq!(data.edges_dir(Some("/other")).unwrap(), PathBuf::from("/other"));
        assert!(DataConfig::default().edges_dir(None).is_err());
        assert!(data.cross_platform_dir(None).is_none());
        assert_eq!(data.work_dir(None), PathBuf::from("stitchmine-work"));
    }

    #[test]
    fn test_null_model_generator() {
        let config = NullModelConfig {
            bootstraps: 3,
            seed: 9,
            keep_multi_edges: true,
        };
        let generator = config.generator();
        assert_eq!(generator.bootstraps, 3);
        assert_eq!(generator.seed, 9);
        assert!(generator.keep_multi_edges);
    }

    #[test]
    fn test_to_env_vars() {
        let vars = StitchmineConfig::default().to_env_vars().unwrap();
        let map: HashMap<_, _> = vars.into_iter().collect();
        assert_eq!(map.get("STITCHMINE_NULL_MODEL_SEED").unwrap(), "42");
        assert_eq!(map.get("STITCHMINE_DIRECTED_MINER_HEAP").unwrap(), "6g");
        assert_eq!(
            map.get("STITCHMINE_PIPELINE_POPULATIONS").unwrap(),
            "[\"graph\",\"lcc\"]"
        );
    }

    #[test]
    fn test_config_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StitchmineConfig>();
    }
}
