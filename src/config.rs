//! Site configuration for release builds
//!
//! A [`SiteConfig`] captures the per-site facts the resolver cannot derive
//! from the build tree itself: where the installed environment keeps its
//! headers, which Python runtime the release links against, and which
//! packages must never be linked automatically.
//!
//! # Configuration File Format
//!
//! The configuration is plain TOML:
//!
//! ```toml
//! env_include = "/sdf/sw/conda/envs/ana-4.0/include"
//! python_libdir = "/sdf/sw/conda/envs/ana-4.0/lib"
//!
//! [python]
//! major = 3
//! minor = 7
//!
//! [never_link]
//! RdbMySQL = ["mysql"]
//! ```
//!
//! Every field has a default, so an empty file (or no file at all, using
//! [`SiteConfig::default`]) is valid: classification then skips the
//! environment rule and the resolver skips the Python suffix check.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PkgTreeError;

/// Python runtime version a release links against.
///
/// Used to recognize the `python{major}.{minor}` link library and to name the
/// matching Boost.Python binding package (`boost_python{major}{minor}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonVersion {
    /// Major version, e.g. `3`
    pub major: u32,
    /// Minor version, e.g. `7`
    pub minor: u32,
}

impl PythonVersion {
    /// Creates a version from major and minor components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Link library name without the `lib` prefix, e.g. `python3.7`.
    pub fn lib_name(&self) -> String {
        format!("python{}.{}", self.major, self.minor)
    }

    /// Boost.Python binding package name, e.g. `boost_python37`.
    pub fn boost_package(&self) -> String {
        format!("boost_python{}{}", self.major, self.minor)
    }
}

impl Default for PythonVersion {
    fn default() -> Self {
        Self::new(3, 11)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Site-wide settings consumed by classification and resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Include root of the installed environment, e.g. `<env>/include`.
    ///
    /// Headers under this root belong to environment-provided packages and
    /// are classified by the environment rule. When unset, that rule never
    /// matches.
    pub env_include: Option<PathBuf>,

    /// Python runtime the release links against.
    pub python: PythonVersion,

    /// Directory holding `libpython{major}.{minor}.so*`.
    ///
    /// Used by the resolver to verify the runtime library exists before
    /// putting it on a link line. When unset, the check is skipped.
    pub python_libdir: Option<PathBuf>,

    /// Dependencies that must never be linked automatically, per package.
    ///
    /// The default maps `RdbMySQL` to `mysql`: its headers pull in the MySQL
    /// client headers for query definitions, but the client library itself is
    /// loaded at runtime and must stay off the link line.
    pub never_link: BTreeMap<String, BTreeSet<String>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut never_link = BTreeMap::new();
        never_link.insert(
            "RdbMySQL".to_string(),
            BTreeSet::from(["mysql".to_string()]),
        );
        Self {
            env_include: None,
            python: PythonVersion::default(),
            python_libdir: None,
            never_link,
        }
    }
}

impl SiteConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site config from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| PkgTreeError::ConfigError {
                message: format!("invalid TOML in {}: {}", path.display(), e),
            })
            .with_context(|| format!("Failed to parse site config from {}", path.display()))
    }

    /// Builds a configuration for an installed environment prefix.
    ///
    /// Points `env_include` at `<prefix>/include` and `python_libdir` at
    /// `<prefix>/lib`, keeping the other fields at their defaults.
    pub fn for_env_prefix(prefix: &Path) -> Self {
        Self {
            env_include: Some(prefix.join("include")),
            python_libdir: Some(prefix.join("lib")),
            ..Self::default()
        }
    }
}
