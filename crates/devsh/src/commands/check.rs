//! `devsh check`: validate a declaration without resolving anything.

use std::path::Path;

use devsh_core::Declaration;

use crate::cli::CliError;

/// Parse and validate a declaration, printing a short summary.
///
/// # Errors
///
/// Returns declaration errors from parsing and validation.
pub fn execute_check(declaration_path: &Path) -> Result<(), CliError> {
    let declaration = Declaration::load(declaration_path)?;

    println!(
        "{}: {} tools, {} variables",
        declaration_path.display(),
        declaration.tools.len(),
        declaration.variables.len()
    );
    for tool in &declaration.tools {
        println!("  tool {tool}");
    }
    for name in declaration.variables.keys() {
        println!("  var  {name}");
    }

    Ok(())
}
