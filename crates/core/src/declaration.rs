//! Environment declaration parsing.
//!
//! A declaration is a small TOML descriptor naming the tools a development
//! environment needs and the variables it exports:
//!
//! ```toml
//! tools = ["rustc", "cargo", "rustfmt@1.83"]
//!
//! [variables]
//! RUST_SRC_PATH = "/opt/rust/lib/rustlib/src/rust/library"
//! ```
//!
//! Tool entries may carry an optional version constraint after `@`. Variable
//! values are opaque strings passed through verbatim into the activated
//! session; nothing here evaluates them.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::environment::SEARCH_PATH_VAR;
use crate::errors::{Error, Result};

/// A declared tool: a name plus an optional version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReference {
    /// Tool name as it appears in the resolver's catalog (e.g. "rustc").
    pub name: String,
    /// Optional version constraint (the part after `@`).
    pub constraint: Option<String>,
}

impl ToolReference {
    /// Parse a tool entry like `"cargo"` or `"rustfmt@^1.80"`.
    pub fn parse(entry: &str) -> Result<Self> {
        let (name, constraint) = match entry.split_once('@') {
            Some((name, constraint)) => (name, Some(constraint)),
            None => (entry, None),
        };

        if name.is_empty() {
            return Err(Error::malformed(
                "tools",
                format!("tool entry `{entry}` has an empty name"),
            ));
        }
        if let Some(c) = constraint
            && c.is_empty()
        {
            return Err(Error::malformed(
                "tools",
                format!("tool entry `{entry}` has an empty version constraint"),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            constraint: constraint.map(String::from),
        })
    }
}

impl std::fmt::Display for ToolReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.constraint {
            Some(c) => write!(f, "{}@{}", self.name, c),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Raw descriptor shape as it appears on disk.
#[derive(Debug, Deserialize)]
struct RawDeclaration {
    #[serde(default)]
    tools: Vec<String>,
    #[serde(default)]
    variables: IndexMap<String, String>,
}

/// A parsed environment declaration. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Declared tools, in declaration order. Names are unique.
    pub tools: Vec<ToolReference>,
    /// Declared variables, in declaration order. Names are unique.
    pub variables: IndexMap<String, String>,
}

impl Declaration {
    /// Parse a declaration from descriptor text.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDeclaration` for syntax or shape problems and
    /// `DuplicateEntry` for repeated tool or variable names.
    pub fn parse(input: &str) -> Result<Self> {
        let raw: RawDeclaration = toml::from_str(input).map_err(classify_toml_error)?;

        let mut seen = HashSet::new();
        let mut tools = Vec::with_capacity(raw.tools.len());
        for entry in &raw.tools {
            let reference = ToolReference::parse(entry)?;
            if !seen.insert(reference.name.clone()) {
                return Err(Error::duplicate_tool(&reference.name));
            }
            tools.push(reference);
        }

        for name in raw.variables.keys() {
            validate_variable_name(name)?;
        }

        tracing::debug!(
            tools = tools.len(),
            variables = raw.variables.len(),
            "Parsed environment declaration"
        );

        Ok(Self {
            tools,
            variables: raw.variables,
        })
    }

    /// Load and parse a declaration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise the same
    /// errors as [`Declaration::parse`].
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| Error::io("read declaration", path, e))?;
        Self::parse(&input)
    }
}

/// Check that a variable name is a valid identifier and not the search path.
fn validate_variable_name(name: &str) -> Result<()> {
    if name == SEARCH_PATH_VAR {
        return Err(Error::malformed(
            format!("variables.{SEARCH_PATH_VAR}"),
            format!(
                "`{SEARCH_PATH_VAR}` is composed from resolved tools and cannot be declared"
            ),
        ));
    }

    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_start || !valid_rest {
        return Err(Error::malformed(
            format!("variables.{name}"),
            "variable names must match [A-Za-z_][A-Za-z0-9_]*",
        ));
    }
    Ok(())
}

/// Map a TOML deserialization error into the declaration error taxonomy.
///
/// The TOML layer rejects duplicate table keys before serde sees them, so
/// duplicate variable names surface here rather than in validation.
fn classify_toml_error(err: toml::de::Error) -> Error {
    let message = err.to_string();
    if message.contains("duplicate key") {
        if let Some(name) = backticked(&message) {
            return Error::duplicate_variable(name);
        }
    }
    let field = backticked(&message).unwrap_or_else(|| "descriptor".to_string());
    Error::malformed(field, message.trim())
}

/// Extract the first backtick-quoted token from a message, if any.
fn backticked(message: &str) -> Option<String> {
    let start = message.find('`')? + 1;
    let end = start + message[start..].find('`')?;
    Some(message[start..end].to_string())
}
