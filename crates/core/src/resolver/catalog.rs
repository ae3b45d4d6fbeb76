//! Static catalog resolver.
//!
//! Resolves tools from a TOML catalog mapping names to versioned
//! installation paths:
//!
//! ```toml
//! [[tools]]
//! name = "rustc"
//! version = "1.83.0"
//! path = "/opt/toolchains/rustc-1.83.0"
//! ```
//!
//! Resolution picks the highest version satisfying the reference's
//! constraint (or the highest overall when unconstrained). The catalog never
//! installs anything; paths are taken at face value.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use semver::{Version, VersionReq};
use serde::Deserialize;

use crate::declaration::ToolReference;
use crate::errors::{Error, Result};

use super::{ResolvedTool, ToolResolver};

/// One installable tool version in the catalog.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Tool name.
    pub name: String,
    /// Version string; semver when constraint matching should apply.
    pub version: String,
    /// Absolute installation root for this version.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    tools: Vec<CatalogEntry>,
}

/// Resolver backed by a static catalog file.
#[derive(Debug, Default)]
pub struct CatalogResolver {
    entries: Vec<CatalogEntry>,
}

impl CatalogResolver {
    /// Create a resolver from in-memory entries.
    #[must_use]
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// `MalformedDeclaration` (field "catalog") if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let input =
            std::fs::read_to_string(path).map_err(|e| Error::io("read catalog", path, e))?;
        let raw: RawCatalog = toml::from_str(&input)
            .map_err(|e| Error::malformed("catalog", e.to_string().trim().to_string()))?;
        tracing::debug!(entries = raw.tools.len(), path = %path.display(), "Loaded tool catalog");
        Ok(Self::from_entries(raw.tools))
    }

    /// Pick the best catalog entry for a reference.
    fn select(&self, tool: &ToolReference) -> Result<&CatalogEntry> {
        let candidates: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|e| e.name == tool.name)
            .collect();

        if candidates.is_empty() {
            return Err(Error::unknown_tool_with_help(
                &tool.name,
                "add an entry for it to the catalog file",
            ));
        }

        if let Some(constraint) = &tool.constraint {
            let Ok(req) = VersionReq::parse(constraint) else {
                return Err(Error::version_unavailable(&tool.name, constraint));
            };
            return candidates
                .into_iter()
                .filter_map(|e| Version::parse(&e.version).ok().map(|v| (v, e)))
                .filter(|(v, _)| req.matches(v))
                .max_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, e)| e)
                .ok_or_else(|| Error::version_unavailable(&tool.name, constraint));
        }

        // Unconstrained: highest semver wins; fall back to the last entry
        // when no version parses.
        let best = candidates
            .iter()
            .filter_map(|e| Version::parse(&e.version).ok().map(|v| (v, *e)))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, e)| e);
        match best {
            Some(entry) => Ok(entry),
            // candidates is non-empty, checked above
            None => Ok(candidates[candidates.len() - 1]),
        }
    }
}

#[async_trait]
impl ToolResolver for CatalogResolver {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn description(&self) -> &'static str {
        "Resolve tools from a static catalog file"
    }

    async fn resolve(&self, tool: &ToolReference) -> Result<ResolvedTool> {
        let entry = self.select(tool)?;
        tracing::debug!(
            tool = %tool.name,
            version = %entry.version,
            path = %entry.path.display(),
            "Resolved tool from catalog"
        );
        Ok(ResolvedTool {
            reference: tool.clone(),
            root: entry.path.clone(),
        })
    }
}
