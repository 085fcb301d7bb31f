// debsolve-core/src/process.rs
use std::process::{Command, Output, Stdio};

use debsolve_common::error::{DebsolveError, Result};
use tracing::debug;

/// Runs an external command and captures its output. A non-zero exit is not
/// an error here; callers decide what an unsuccessful query means.
pub fn run_command(command: &str, args: &[&str]) -> Result<Output> {
    debug!("Running command: {} {:?}", command, args);
    let mut cmd = Command::new(command);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(Stdio::null());

    match cmd.output() {
        Ok(output) => {
            if !output.status.success() {
                debug!("{} exited with status: {}", command, output.status);
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    debug!("Stderr:\n{}", stderr.trim());
                }
            }
            Ok(output)
        }
        Err(e) => Err(DebsolveError::CommandExecError(format!("{command}: {e}"))),
    }
}

/// Stdout of a successful run, `None` when the command failed or is missing.
pub fn query(command: &str, args: &[&str]) -> Option<String> {
    match run_command(command, args) {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(_) => None,
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}
