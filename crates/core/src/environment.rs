//! Activation environment type and parent-environment capture.

use std::collections::BTreeMap;
use std::env;

use serde::Serialize;

/// The variable governing executable lookup. Composed by the assembler from
/// resolved tool locations; declarations may not set it directly.
pub const SEARCH_PATH_VAR: &str = "PATH";

/// The fully assembled environment a session is activated with.
///
/// Backed by an ordered map so iteration and [`to_env_vec`](Self::to_env_vec)
/// are byte-deterministic for identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivationEnvironment {
    vars: BTreeMap<String, String>,
}

impl ActivationEnvironment {
    /// Create a new empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment from a map.
    #[must_use]
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Check whether a variable is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the environment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }

    /// The composed search path, if any tools or an inherited value set it.
    #[must_use]
    pub fn search_path(&self) -> Option<&str> {
        self.get(SEARCH_PATH_VAR)
    }

    /// All variables as `KEY=value` strings, in name order.
    #[must_use]
    pub fn to_env_vec(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect()
    }
}

/// Essential variables to preserve in hermetic mode. These are required for
/// basic process operation but don't pollute the composed search path.
const HERMETIC_ALLOWED_VARS: &[&str] = &[
    "HOME",
    "USER",
    "LOGNAME",
    "SHELL",
    "TERM",
    "COLORTERM",
    "LANG",
    "TMPDIR",
    "TMP",
    "TEMP",
    "XDG_RUNTIME_DIR",
    "XDG_CONFIG_HOME",
    "XDG_CACHE_HOME",
    "XDG_DATA_HOME",
];

/// Capture the parent process environment as the inherited base for assembly.
///
/// In hermetic mode only an allowlist of identity, terminal, locale, and
/// temp-directory variables survives; notably `PATH` does not, so the
/// activated session sees exactly the search path composed from the
/// declaration's tools.
#[must_use]
pub fn inherited_environment(hermetic: bool) -> BTreeMap<String, String> {
    if !hermetic {
        return env::vars().collect();
    }

    let mut inherited = BTreeMap::new();
    for var in HERMETIC_ALLOWED_VARS {
        if let Ok(value) = env::var(var) {
            inherited.insert((*var).to_string(), value);
        }
    }
    // Locale settings beyond LANG
    for (key, value) in env::vars() {
        if key.starts_with("LC_") {
            inherited.insert(key, value);
        }
    }
    inherited
}
