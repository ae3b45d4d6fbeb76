//! `devsh print`: resolve and assemble, then print the environment.

use std::path::Path;

use crate::cli::{CliError, OutputFormat, ResolveArgs};

use super::prepare_environment;

/// Resolve and assemble the environment, then print it without activating.
///
/// The `env` format emits `export` statements suitable for `eval` in a
/// POSIX shell; `json` emits a flat object.
///
/// # Errors
///
/// Returns the same errors as `run`, minus activation.
pub async fn execute_print(
    declaration_path: &Path,
    output: OutputFormat,
    args: &ResolveArgs,
) -> Result<(), CliError> {
    let environment = prepare_environment(declaration_path, args).await?;

    match output {
        OutputFormat::Env => {
            for (key, value) in environment.iter() {
                println!("export {}=\"{}\"", key, shell_escape(value));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&environment)
                .map_err(|e| CliError::resolve(format!("failed to serialize environment: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Escape a value for double-quoted POSIX shell interpolation.
fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
