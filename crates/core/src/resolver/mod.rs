//! Tool resolution: mapping declared tool names to installation paths.
//!
//! Resolution is the only stage that performs I/O. It is abstracted behind
//! the [`ToolResolver`] trait so the package repository backing it stays an
//! external collaborator: the [`NixResolver`] shells out to the `nix` CLI,
//! while the [`CatalogResolver`] serves a static catalog for tests and
//! air-gapped setups.

mod catalog;
mod nix;

pub use catalog::{CatalogEntry, CatalogResolver};
pub use nix::NixResolver;

use std::path::PathBuf;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::declaration::{Declaration, ToolReference};
use crate::errors::Result;

/// A tool reference paired with its resolved installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTool {
    /// The declaration entry this resolution answers.
    pub reference: ToolReference,
    /// Absolute installation root (e.g. a store path).
    pub root: PathBuf,
}

impl ResolvedTool {
    /// The directory holding the tool's executables.
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }
}

/// Trait for package resolver adapters.
///
/// Implementations map a tool name (and optional version constraint) to a
/// concrete installation path, or fail with `UnknownTool` /
/// `VersionUnavailable`. Resolution must not mutate anything the assembler
/// or activator observes.
#[async_trait]
pub trait ToolResolver: std::fmt::Debug + Send + Sync {
    /// Resolver name (e.g. "catalog", "nix").
    fn name(&self) -> &'static str;

    /// Human-readable description for help text.
    fn description(&self) -> &'static str;

    /// Resolve a single tool reference to an installation path.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` when no package matches the name, or
    /// `VersionUnavailable` when the constraint cannot be satisfied.
    async fn resolve(&self, tool: &ToolReference) -> Result<ResolvedTool>;

    /// Check that the resolver's external dependencies are usable.
    ///
    /// Called once before resolution so a missing backend fails fast with a
    /// helpful message instead of failing per tool.
    ///
    /// # Errors
    ///
    /// Returns an error describing the missing prerequisite.
    async fn check_prerequisites(&self) -> Result<()> {
        Ok(())
    }
}

/// Resolve every tool in the declaration.
///
/// Lookups run concurrently since they share no state, but the returned
/// vector is in declaration order and the first failure propagates,
/// abandoning outstanding lookups. Concurrency here is an optimization, not
/// an observable ordering change.
///
/// # Errors
///
/// Propagates the first `UnknownTool` or `VersionUnavailable` failure.
pub async fn resolve_all<R>(resolver: &R, declaration: &Declaration) -> Result<Vec<ResolvedTool>>
where
    R: ToolResolver + ?Sized,
{
    let resolved = try_join_all(declaration.tools.iter().map(|tool| resolver.resolve(tool))).await?;
    tracing::info!(
        resolver = resolver.name(),
        tools = resolved.len(),
        "Resolved all declared tools"
    );
    Ok(resolved)
}
