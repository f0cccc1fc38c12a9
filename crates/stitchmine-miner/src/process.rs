//! Subprocess execution shared by the command-line miners.

use std::ffi::OsString;
use std::path::Path;
use stitchmine_core::{Error, Result};
use tokio::process::Command;

/// Lines of miner stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// A program and its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: OsString,
    /// Arguments in order.
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append an argument when `condition` holds.
    pub fn arg_if(self, condition: bool, arg: impl Into<OsString>) -> Self {
        if condition { self.arg(arg) } else { self }
    }

    /// Arguments as lossy strings, for logs and tests.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Run `spec` to completion and check that it wrote `output`.
///
/// A stale `output` from an earlier run is removed first so it cannot be
/// mistaken for fresh results. No timeout is applied.
pub async fn execute(spec: &CommandSpec, output: &Path) -> Result<()> {
    let program = spec.program.to_string_lossy().into_owned();

    match tokio::fs::remove_file(output).await {
        Ok(()) => log::debug!("Removed stale miner output {}", output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io_with_path(e, output)),
    }

    log::info!("Running {program} {}", spec.display_args().join(" "));
    let result = Command::new(&spec.program)
        .args(&spec.args)
        .output()
        .await
        .map_err(|e| Error::miner(format!("failed to start {program}: {e}")))?;

    let stdout = String::from_utf8_lossy(&result.stdout);
    if !stdout.trim().is_empty() {
        log::debug!("{program} stdout:\n{}", stdout.trim_end());
    }

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let lines: Vec<&str> = stderr.lines().collect();
        let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
        return Err(Error::miner(format!(
            "{program} exited with {}{}",
            result.status,
            if tail.is_empty() {
                String::new()
            } else {
                format!(": {tail}")
            }
        )));
    }

    if !output.is_file() {
        return Err(Error::miner(format!(
            "{program} finished but wrote no output file at {}",
            output.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_builder() {
        let spec = CommandSpec::new("java")
            .arg("-Xmx6g")
            .arg_if(true, "-D")
            .arg_if(false, "-C")
            .arg("in.nel");
        assert_eq!(spec.display_args(), vec!["-Xmx6g", "-D", "in.nel"]);
    }

    #[tokio::test]
    async fn test_execute_missing_program() {
        let _guard = crate::test_support::PROCESS_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::TempDir::new().unwrap();
        let spec = CommandSpec::new("/nonexistent/stitchmine-miner-binary");
        let err = execute(&spec, &dir.path().join("out")).await.unwrap_err();
        assert!(err.is_miner());
        assert!(err.to_string().contains("failed to start"));
    }
}
