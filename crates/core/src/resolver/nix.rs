//! Nix flake resolver.
//!
//! Maps a tool name to a content-addressed store path by shelling out to
//! the `nix` CLI. The package repository itself (nixpkgs evaluation,
//! builds, substitution) stays entirely on the nix side; this adapter only
//! asks it for an output path.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::declaration::ToolReference;
use crate::errors::{Error, Result};

use super::{ResolvedTool, ToolResolver};

/// Resolver backed by a Nix flake (default `nixpkgs`).
#[derive(Debug, Clone)]
pub struct NixResolver {
    flake: String,
}

impl Default for NixResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl NixResolver {
    /// Create a resolver against the `nixpkgs` flake.
    #[must_use]
    pub fn new() -> Self {
        Self::with_flake("nixpkgs")
    }

    /// Create a resolver against a specific flake reference.
    #[must_use]
    pub fn with_flake(flake: impl Into<String>) -> Self {
        Self {
            flake: flake.into(),
        }
    }

    /// The flake reference this resolver queries.
    #[must_use]
    pub fn flake(&self) -> &str {
        &self.flake
    }
}

#[async_trait]
impl ToolResolver for NixResolver {
    fn name(&self) -> &'static str {
        "nix"
    }

    fn description(&self) -> &'static str {
        "Resolve tools to Nix store paths via flakes"
    }

    async fn resolve(&self, tool: &ToolReference) -> Result<ResolvedTool> {
        // Flake references pin package versions through the flake itself, so
        // per-tool constraints have nothing to match against.
        if let Some(constraint) = &tool.constraint {
            return Err(Error::version_unavailable(&tool.name, constraint));
        }

        let installable = format!("{}#{}", self.flake, tool.name);
        debug!(%installable, "Resolving tool through nix");

        let output = Command::new("nix")
            .args(["build", "--no-link", "--print-out-paths", &installable])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::spawn("nix", e))?;

        if !output.status.success() {
            return Err(Error::unknown_tool_with_help(
                &tool.name,
                format!("check `nix search {} {}`", self.flake, tool.name),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        // Multi-output derivations print one path per line; the first output
        // is the one carrying bin/.
        let root = stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| Error::unknown_tool(&tool.name))?;

        info!(tool = %tool.name, path = %root.display(), "Resolved tool to store path");

        Ok(ResolvedTool {
            reference: tool.clone(),
            root,
        })
    }

    async fn check_prerequisites(&self) -> Result<()> {
        let status = Command::new("nix")
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(_) | Err(_) => Err(Error::unknown_tool_with_help(
                "nix",
                "install Nix (https://nixos.org/download.html) or pass --catalog",
            )),
        }
    }
}
