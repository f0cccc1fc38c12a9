//! Handlers for `stitchmine config {path,get,set,init,export}`.

use crate::cli::ConfigAction;
use crate::config::StitchmineConfig;
use std::path::PathBuf;
use stitchmine_core::{Error, Result, expand_tilde};

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
///
/// Takes the raw `--config` path since `path` and `init` run before any
/// file exists.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key),
        ConfigAction::Set { key, value } => cmd_config_set(config_path, &key, &value),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
        ConfigAction::Export { docker_env } => {
            let config = StitchmineConfig::load(config_path)?;
            cmd_config_export(&config, docker_env)
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    let path = StitchmineConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("no config directory on this platform"))?;
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("(not created yet; run `stitchmine config init`)");
    }
    Ok(())
}

fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<()> {
    let config = StitchmineConfig::load(config_path)?;
    let tree = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    let value = get_nested_value(&tree, key)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))?;
    println!("{}", format_toml_value(value));
    Ok(())
}

/// Set `key` in the config file, refusing values the loader would reject.
fn cmd_config_set(config_path: Option<&str>, key: &str, value: &str) -> Result<()> {
    let path = StitchmineConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("no config directory on this platform"))?;
    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}; run `stitchmine config init` first",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let mut doc: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
    set_nested_value(&mut doc, key, parse_value(value))?;

    let updated = toml::to_string_pretty(&doc).map_err(|e| Error::config(e.to_string()))?;
    toml::from_str::<StitchmineConfig>(&updated)
        .map_err(|e| Error::config(format!("{key} = {value} is not a valid setting: {e}")))?;
    std::fs::write(&path, updated).map_err(|e| Error::io_with_path(e, &path))?;

    println!("{key} = {value} ({})", path.display());
    Ok(())
}

fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(p) => expand_tilde(p),
        None => StitchmineConfig::default_config_path()
            .ok_or_else(|| Error::config("no config directory on this platform"))?,
    };
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}; pass --force to overwrite",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let text = format!(
        "# stitchmine {}\n\n{}",
        env!("CARGO_PKG_VERSION"),
        StitchmineConfig::default().to_toml_string()?
    );
    std::fs::write(&path, text).map_err(|e| Error::io_with_path(e, &path))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn cmd_config_export(config: &StitchmineConfig, docker_env: bool) -> Result<()> {
    let flag = if docker_env { "--env " } else { "" };
    for (key, value) in config.to_env_vars()? {
        println!("{flag}{key}={value}");
    }
    Ok(())
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |node, part| node.as_table()?.get(part))
}

/// Set `key`, creating missing intermediate tables.
fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return Err(Error::config("Empty key path"));
    };

    let mut node = root;
    for part in parents {
        let table = node
            .as_table_mut()
            .ok_or_else(|| Error::config(format!("'{part}' is not inside a table")))?;
        node = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    node.as_table_mut()
        .ok_or_else(|| Error::config(format!("cannot set '{key}' inside a non-table value")))?
        .insert(last.to_string(), value);
    Ok(())
}

/// Parse a command-line value as a TOML literal (`0.4`, `true`,
/// `["lcc"]`), falling back to a bare string (`6g`, `/opt/gSpan`).
fn parse_value(s: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("v = {s}"))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(s.to_string()))
}

fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_default(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, StitchmineConfig::default().to_toml_string().unwrap()).unwrap();
        path
    }

    // ------------------------------------------------------------------------
    // Command tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_path_explicit() {
        assert!(cmd_config_path(Some("/explicit/config.toml")).is_ok());
    }

    #[test]
    fn test_cmd_config_get() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        assert!(cmd_config_get(Some(path.to_str().unwrap()), "null_model.seed").is_ok());

        let err = cmd_config_get(Some(path.to_str().unwrap()), "null_model.nope").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_cmd_config_set_nested_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        cmd_config_set(Some(path.to_str().unwrap()), "undirected_miner.min_support", "0.4")
            .unwrap();

        let config = StitchmineConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.undirected_miner.min_support, 0.4);
    }

    #[test]
    fn test_cmd_config_set_missing_file() {
        let err = cmd_config_set(Some("/nonexistent/config.toml"), "a", "b").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_cmd_config_init() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stitchmine").join("config.toml");

        cmd_config_init(Some(path.to_str().unwrap()), false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[directed_miner]"));

        let err = cmd_config_init(Some(path.to_str().unwrap()), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(cmd_config_init(Some(path.to_str().unwrap()), true).is_ok());
    }

    #[test]
    fn test_cmd_config_export() {
        let config = StitchmineConfig::default();
        assert!(cmd_config_export(&config, false).is_ok());
        assert!(cmd_config_export(&config, true).is_ok());
    }

    // ------------------------------------------------------------------------
    // Dotted-key helper tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_nested_value() {
        let val: toml::Value = toml::from_str("[null_model]\nseed = 42").unwrap();
        assert_eq!(
            get_nested_value(&val, "null_model.seed"),
            Some(&toml::Value::Integer(42))
        );
        assert!(get_nested_value(&val, "null_model.bootstraps").is_none());
        assert!(get_nested_value(&val, "data").is_none());
    }

    #[test]
    fn test_set_nested_value_creates_section() {
        let mut val = toml::Value::Table(toml::map::Map::new());
        set_nested_value(&mut val, "pipeline.match_colors", toml::Value::Boolean(true)).unwrap();
        assert_eq!(
            get_nested_value(&val, "pipeline.match_colors"),
            Some(&toml::Value::Boolean(true))
        );
    }

    #[test]
    fn test_set_nested_value_through_scalar_fails() {
        let mut val: toml::Value = toml::from_str("seed = 1").unwrap();
        assert!(set_nested_value(&mut val, "seed.inner", toml::Value::Integer(2)).is_err());
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("true"), toml::Value::Boolean(true));
        assert_eq!(parse_value("42"), toml::Value::Integer(42));
        assert_eq!(parse_value("0.6"), toml::Value::Float(0.6));
        assert_eq!(parse_value("6g"), toml::Value::String("6g".to_string()));
        assert_eq!(
            parse_value("[\"lcc\"]"),
            toml::Value::Array(vec![toml::Value::String("lcc".into())])
        );
    }

    #[test]
    fn test_cmd_config_set_rejects_bad_value() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        let err = cmd_config_set(Some(path.to_str().unwrap()), "null_model.seed", "soon")
            .unwrap_err();
        assert!(err.to_string().contains("not a valid setting"));
    }

    #[test]
    fn test_cmd_config_set_list() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_default(&dir);
        cmd_config_set(Some(path.to_str().unwrap()), "pipeline.populations", "[\"lcc\"]")
            .unwrap();
        let config = StitchmineConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.pipeline.populations.len(), 1);
    }

    #[test]
    fn test_format_toml_value() {
        assert_eq!(format_toml_value(&toml::Value::String("gSpan".into())), "gSpan");
        assert_eq!(format_toml_value(&toml::Value::Integer(10)), "10");
        assert_eq!(format_toml_value(&toml::Value::Boolean(false)), "false");
    }
}
