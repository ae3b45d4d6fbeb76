//! Core pipeline for devsh: declaration parsing, tool resolution,
//! environment assembly, and session activation.
//!
//! The pipeline is strictly staged and fails closed: no session is ever
//! spawned from a partially assembled environment.
//!
//! ```ignore
//! use devsh_core::{Declaration, assemble, activate, inherited_environment};
//! use devsh_core::resolver::{CatalogResolver, resolve_all};
//!
//! let declaration = Declaration::load(path)?;
//! let resolver = CatalogResolver::load(catalog_path)?;
//! let resolved = resolve_all(&resolver, &declaration).await?;
//! let env = assemble(&declaration, &resolved, &inherited_environment(false))?;
//! let exit = activate(&env, None).await?;
//! ```

pub mod activator;
pub mod assembler;
pub mod declaration;
pub mod environment;
pub mod errors;
pub mod resolver;

pub use activator::activate;
pub use assembler::assemble;
pub use declaration::{Declaration, ToolReference};
pub use environment::{ActivationEnvironment, SEARCH_PATH_VAR, inherited_environment};
pub use errors::{EntryKind, Error, Result};
pub use resolver::{CatalogResolver, NixResolver, ResolvedTool, ToolResolver, resolve_all};
