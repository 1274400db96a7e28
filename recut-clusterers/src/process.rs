//! Synchronous invocation of external clustering binaries.

use std::fs::File;
use std::path::Path;
use std::process::Command;

use recut_core::ClustererError;
use tracing::debug;

/// Runs `command` to completion, capturing stdout and stderr to files so
/// failures can be inspected after the run. The command inherits the
/// current working directory. A non-zero exit status is fatal.
pub(crate) fn run_captured(
    command: &mut Command,
    stdout_path: &Path,
    stderr_path: &Path,
) -> Result<(), ClustererError> {
    let stdout = File::create(stdout_path).map_err(|source| ClustererError::Io {
        path: stdout_path.to_path_buf(),
        source,
    })?;
    let stderr = File::create(stderr_path).map_err(|source| ClustererError::Io {
        path: stderr_path.to_path_buf(),
        source,
    })?;
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(program = %program, "invoking external clusterer");
    let status = command
        .stdout(stdout)
        .stderr(stderr)
        .status()
        .map_err(|source| ClustererError::Spawn {
            program: program.clone(),
            source,
        })?;
    if !status.success() {
        return Err(ClustererError::NonZeroExit { program, status });
    }
    debug!(program = %program, "external clusterer finished");
    Ok(())
}
