//! Utility modules.
//!
//! # Modules
//!
//! - [`paths`]: Path helpers (tilde expansion, derived output paths)
//! - [`time`]: Timestamps for persisted documents

pub mod paths;
pub mod time;
