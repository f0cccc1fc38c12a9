//! Stitchmine CLI: the `stitchmine` command-line tool.
//!
//! Wires the graph, miner and eval crates behind clap subcommands,
//! with configuration loaded through `confyg` and logging through
//! `tracing-subscriber`.
//!
//! # Modules
//!
//! - [`cli`]: argument and subcommand definitions
//! - [`config`]: [`StitchmineConfig`] and its loading rules
//! - [`handlers`]: `encode`, `mine`, `null-model`, `evaluate`, `run`, `inspect`
//! - [`config_handlers`]: `config path|get|set|init|export`
//! - [`app`]: logging setup and command dispatch

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod handlers;

// Re-export key types at crate root for convenience
pub use app::{StitchmineCli, run};
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::StitchmineConfig;
