//! External converter invocation.
//!
//! Markup interpretation is delegated wholesale to a `pandoc` subprocess.
//! This module owns that boundary: it builds the fixed command line and runs
//! it, capturing output. The build blocks on each invocation — there is no
//! timeout and no recovery; a failing converter fails the build with the
//! converter's own diagnostics attached.

use crate::config::SiteConfig;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Converter binary, looked up on `PATH`.
pub const PROGRAM: &str = "pandoc";

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("converter failed on {path} ({status}):\n{stderr}")]
    Failed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

/// Build the converter command for one page: include files, math rendering,
/// markdown in, html5 out, then the filter chain and the source file.
pub fn command(config: &SiteConfig, input: &Path, output: &Path) -> Command {
    let mut cmd = Command::new(PROGRAM);
    cmd.arg("--include-in-header")
        .arg(&config.header)
        .arg("--include-before-body")
        .arg(&config.before)
        .arg("--include-after-body")
        .arg(&config.after)
        .arg("--mathjax")
        .arg("-f")
        .arg("markdown")
        .arg("-t")
        .arg("html5")
        .arg("-o")
        .arg(output);
    for filter in &config.filters {
        cmd.arg("--filter").arg(filter);
    }
    cmd.arg(input);
    cmd
}

/// Run a converter command to completion. Success is exit code 0; anything
/// else surfaces the captured stderr verbatim, naming `input`.
pub fn run(mut command: Command, input: &Path) -> Result<(), ConvertError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .map_err(|source| ConvertError::Spawn { program, source })?;
    if !output.status.success() {
        return Err(ConvertError::Failed {
            path: input.to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}
