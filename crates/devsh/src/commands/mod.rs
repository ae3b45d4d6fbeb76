//! Command implementations for the devsh CLI.

pub mod check;
pub mod print;
pub mod run;

use std::path::Path;

use devsh_core::resolver::{CatalogResolver, NixResolver};
use devsh_core::{ActivationEnvironment, Declaration, ToolResolver};

use crate::cli::{CliError, ResolveArgs};

/// Build the resolver selected by the CLI flags.
fn build_resolver(args: &ResolveArgs) -> Result<Box<dyn ToolResolver>, CliError> {
    match &args.catalog {
        Some(path) => Ok(Box::new(CatalogResolver::load(path)?)),
        None => Ok(Box::new(NixResolver::with_flake(args.flake.clone()))),
    }
}

/// Run the parse -> resolve -> assemble pipeline for a declaration file.
///
/// Shared by `run` and `print`. Nothing is spawned here; any failure leaves
/// no partial environment behind.
async fn prepare_environment(
    declaration_path: &Path,
    args: &ResolveArgs,
) -> Result<ActivationEnvironment, CliError> {
    let declaration = Declaration::load(declaration_path)?;

    let resolver = build_resolver(args)?;
    resolver.check_prerequisites().await?;

    let resolved = devsh_core::resolve_all(resolver.as_ref(), &declaration).await?;
    let inherited = devsh_core::inherited_environment(args.hermetic);
    let environment = devsh_core::assemble(&declaration, &resolved, &inherited)?;

    Ok(environment)
}
