//! Session activation: spawning a shell or command with the assembled
//! environment.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::environment::ActivationEnvironment;
use crate::errors::{Error, Result};

/// Shell used when the activation environment carries no `SHELL`.
const FALLBACK_SHELL: &str = "/bin/sh";

/// Activate the environment and return the session's exit code.
///
/// With a command, runs `<shell> -c <command>` non-interactively and returns
/// its exit status directly. Without one, starts an interactive shell that
/// inherits the terminal and returns its status on exit.
///
/// The child's environment is exactly `environment`: the parent environment
/// is cleared first so variables the declaration overrides never leak
/// through.
///
/// # Errors
///
/// Returns `Spawn` with OS-level detail if the shell cannot be started.
pub async fn activate(
    environment: &ActivationEnvironment,
    command: Option<&str>,
) -> Result<i32> {
    let shell = environment.get("SHELL").unwrap_or(FALLBACK_SHELL);

    let mut cmd = Command::new(shell);
    match command {
        Some(line) => {
            debug!(%shell, %line, "Running command in activated environment");
            cmd.arg("-c").arg(line);
        }
        None => {
            info!(%shell, "Starting interactive session");
            cmd.arg("-i");
        }
    }

    cmd.env_clear();
    for (key, value) in environment.iter() {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let status = cmd
        .status()
        .await
        .map_err(|e| Error::spawn(shell, e))?;

    let code = status.code().unwrap_or(1);
    debug!(%shell, code, "Session ended");
    Ok(code)
}
