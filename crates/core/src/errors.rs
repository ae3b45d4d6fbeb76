//! Error taxonomy for declaration parsing, resolution, and activation.

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Kind of declaration entry that was duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A tool reference in the `tools` list.
    Tool,
    /// A variable name in the `variables` table.
    Variable,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tool => write!(f, "tool"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

/// Main error type for devsh operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The descriptor is syntactically or structurally invalid.
    #[error("malformed declaration ({field}): {message}")]
    MalformedDeclaration {
        /// The offending field, as close as the deserializer can name it.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The same tool or variable name appears twice in the descriptor.
    #[error("duplicate {kind} `{name}` in declaration")]
    DuplicateEntry {
        /// Whether a tool or a variable was duplicated.
        kind: EntryKind,
        /// The duplicated name.
        name: String,
    },

    /// No package matches the declared tool name.
    #[error("unknown tool `{name}`")]
    UnknownTool {
        /// The tool name that failed to resolve.
        name: String,
        /// Optional hint for fixing the declaration or catalog.
        help: Option<String>,
    },

    /// The resolver knows the tool but cannot satisfy the version constraint.
    #[error("no version of `{name}` satisfies `{constraint}`")]
    VersionUnavailable {
        /// The tool name.
        name: String,
        /// The constraint that could not be satisfied.
        constraint: String,
    },

    /// A declared tool reached the assembler without a resolved path.
    /// Unreachable if the resolver contract is honored.
    #[error("tool `{name}` has no resolved installation path")]
    UnresolvedReference {
        /// The tool name missing from the resolved set.
        name: String,
    },

    /// I/O error with operation context.
    #[error("I/O {operation} failed on {}: {source}", path.display())]
    Io {
        /// The underlying OS error.
        source: std::io::Error,
        /// The path the operation touched.
        path: Box<Path>,
        /// What we were doing (e.g. "read declaration").
        operation: String,
    },

    /// The activator failed to spawn the session or command.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// The program that could not be started.
        program: String,
        /// The underlying OS error.
        source: std::io::Error,
    },
}

impl Error {
    /// Create a malformed-declaration error naming the offending field.
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate-entry error for a tool name.
    pub fn duplicate_tool(name: impl Into<String>) -> Self {
        Self::DuplicateEntry {
            kind: EntryKind::Tool,
            name: name.into(),
        }
    }

    /// Create a duplicate-entry error for a variable name.
    pub fn duplicate_variable(name: impl Into<String>) -> Self {
        Self::DuplicateEntry {
            kind: EntryKind::Variable,
            name: name.into(),
        }
    }

    /// Create an unknown-tool error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool {
            name: name.into(),
            help: None,
        }
    }

    /// Create an unknown-tool error with a fix-it hint.
    pub fn unknown_tool_with_help(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::UnknownTool {
            name: name.into(),
            help: Some(help.into()),
        }
    }

    /// Create a version-unavailable error.
    pub fn version_unavailable(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::VersionUnavailable {
            name: name.into(),
            constraint: constraint.into(),
        }
    }

    /// Create an unresolved-reference error.
    pub fn unresolved_reference(name: impl Into<String>) -> Self {
        Self::UnresolvedReference { name: name.into() }
    }

    /// Create an I/O error with operation context.
    pub fn io(operation: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: path.into(),
            operation: operation.into(),
        }
    }

    /// Create a spawn error.
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Whether this error is a parse-time declaration problem.
    ///
    /// Parse-time errors are local and non-retryable; callers map them to
    /// a different exit code than resolution or spawn failures.
    #[must_use]
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedDeclaration { .. } | Self::DuplicateEntry { .. }
        )
    }
}

/// Result type alias for devsh operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_display() {
        assert_eq!(EntryKind::Tool.to_string(), "tool");
        assert_eq!(EntryKind::Variable.to_string(), "variable");
    }

    #[test]
    fn test_duplicate_entry_message() {
        let err = Error::duplicate_tool("rustc");
        assert_eq!(err.to_string(), "duplicate tool `rustc` in declaration");

        let err = Error::duplicate_variable("RUST_SRC_PATH");
        assert_eq!(
            err.to_string(),
            "duplicate variable `RUST_SRC_PATH` in declaration"
        );
    }

    #[test]
    fn test_unknown_tool_help() {
        let err = Error::unknown_tool("c");
        assert!(matches!(err, Error::UnknownTool { help: None, .. }));

        let err = Error::unknown_tool_with_help("c", "add it to the catalog");
        if let Error::UnknownTool { name, help } = err {
            assert_eq!(name, "c");
            assert_eq!(help.as_deref(), Some("add it to the catalog"));
        } else {
            panic!("expected UnknownTool");
        }
    }

    #[test]
    fn test_version_unavailable_message() {
        let err = Error::version_unavailable("rustfmt", "^2.0");
        assert_eq!(
            err.to_string(),
            "no version of `rustfmt` satisfies `^2.0`"
        );
    }

    #[test]
    fn test_is_declaration_error() {
        assert!(Error::malformed("tools", "not a list").is_declaration_error());
        assert!(Error::duplicate_tool("a").is_declaration_error());
        assert!(!Error::unknown_tool("a").is_declaration_error());
        assert!(!Error::unresolved_reference("a").is_declaration_error());
    }

    #[test]
    fn test_io_error_context() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::io("read declaration", Path::new("/tmp/devsh.toml"), source);
        let msg = err.to_string();
        assert!(msg.contains("read declaration"));
        assert!(msg.contains("/tmp/devsh.toml"));
    }
}
