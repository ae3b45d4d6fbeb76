//! `devsh run`: resolve a declaration and activate it.

use std::path::Path;

use tracing::instrument;

use crate::cli::{CliError, ResolveArgs};

use super::prepare_environment;

/// Resolve, assemble, and activate. Returns the session's exit code.
///
/// With `--command`, the command runs non-interactively and its exit status
/// is returned directly; otherwise an interactive shell is started. Any
/// failure before activation aborts with no process spawned.
///
/// # Errors
///
/// Returns declaration errors from parsing, resolution errors from the
/// resolver, and spawn errors from activation.
#[instrument(name = "run", skip(args), fields(declaration = %declaration_path.display()))]
pub async fn execute_run(
    declaration_path: &Path,
    command: Option<&str>,
    args: &ResolveArgs,
) -> Result<i32, CliError> {
    let environment = prepare_environment(declaration_path, args).await?;

    tracing::info!(
        variables = environment.len(),
        interactive = command.is_none(),
        "Activating environment"
    );

    let code = devsh_core::activate(&environment, command).await?;
    Ok(code)
}
