//! Path helpers shared by the Stitchmine crates.
//!
//! The external miners name their outputs after their inputs (`graph.gspan`
//! becomes `graph.gspan.fp`), so most derived paths are built by appending a
//! suffix to the full file name rather than by replacing its extension.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Expands `~` to the user's home directory.
///
/// If the path starts with `~`, replaces it with the user's home directory.
/// Otherwise returns the path unchanged.
///
/// # Example
///
/// ```
/// use stitchmine_core::util::paths::expand_tilde;
///
/// let expanded = expand_tilde("~/fsm");
/// assert!(!expanded.starts_with("~"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Appends `suffix` to the final component of `path`.
///
/// ```
/// use stitchmine_core::util::paths::with_suffix;
/// use std::path::Path;
///
/// let out = with_suffix(Path::new("/data/lcc.gspan"), ".fp");
/// assert_eq!(out, Path::new("/data/lcc.gspan.fp"));
/// ```
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
