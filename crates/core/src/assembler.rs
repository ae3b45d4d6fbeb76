//! Deterministic environment assembly.
//!
//! The assembler is a pure function: given the same declaration, resolved
//! tool set, and inherited base it always produces a byte-identical
//! [`ActivationEnvironment`]. All ambient state (the parent environment) is
//! captured by the caller and passed in explicitly.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::declaration::Declaration;
use crate::environment::{ActivationEnvironment, SEARCH_PATH_VAR};
use crate::errors::{Error, Result};
use crate::resolver::ResolvedTool;

/// Assemble the activation environment for a declaration.
///
/// The search path is the concatenation of every resolved tool's bin
/// directory, in declaration order, prepended to any inherited search path.
/// Declared variables are layered on top afterwards and override inherited
/// values.
///
/// # Errors
///
/// Returns `UnresolvedReference` if a declared tool has no matching entry in
/// `resolved`. This indicates a resolver contract violation, not bad input.
pub fn assemble(
    declaration: &Declaration,
    resolved: &[ResolvedTool],
    inherited: &BTreeMap<String, String>,
) -> Result<ActivationEnvironment> {
    let by_name: HashMap<&str, &ResolvedTool> = resolved
        .iter()
        .map(|tool| (tool.reference.name.as_str(), tool))
        .collect();

    let mut bin_dirs = Vec::with_capacity(declaration.tools.len());
    for reference in &declaration.tools {
        let tool = by_name
            .get(reference.name.as_str())
            .ok_or_else(|| Error::unresolved_reference(&reference.name))?;
        bin_dirs.push(tool.bin_dir().display().to_string());
    }

    let mut env = ActivationEnvironment::from_map(inherited.clone());

    if !bin_dirs.is_empty() {
        let composed = bin_dirs.join(":");
        let search_path = match inherited.get(SEARCH_PATH_VAR) {
            Some(existing) if !existing.is_empty() => format!("{composed}:{existing}"),
            _ => composed,
        };
        env.set(SEARCH_PATH_VAR.to_string(), search_path);
    }

    for (key, value) in &declaration.variables {
        env.set(key.clone(), value.clone());
    }

    tracing::debug!(
        tools = declaration.tools.len(),
        variables = declaration.variables.len(),
        inherited = inherited.len(),
        "Assembled activation environment"
    );

    Ok(env)
}
