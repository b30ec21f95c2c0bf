//! External package metadata
//!
//! Packages installed into the environment (rather than built by a release)
//! come with recorded metadata: where the installation prefix is, which
//! headers it provides and which shared objects it ships. This module
//! defines the crate's view of that metadata; producing it from an actual
//! package database is the surrounding tooling's job.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

/// Recorded facts about one installed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMeta {
    /// Package name as known to the installer.
    pub name: String,
    /// Installed version string.
    pub version: String,
    /// Installation prefix the package's files live under.
    pub prefix: PathBuf,
    /// Header files the package provides, relative to the prefix.
    pub headers: Vec<PathBuf>,
    /// Shared object file names the package ships, e.g. `libhdf5.so`.
    pub shared_libs: Vec<String>,
}

impl PackageMeta {
    /// Link library names derived from the shared objects.
    ///
    /// Only plain `lib<name>.so` files count; versioned objects like
    /// `libhdf5.so.310` are runtime artifacts, not link names.
    pub fn link_names(&self) -> Vec<String> {
        self.shared_libs
            .iter()
            .filter_map(|file| {
                file.strip_prefix("lib")
                    .and_then(|rest| rest.strip_suffix(".so"))
            })
            .map(String::from)
            .collect()
    }

    /// Conventional library directory under the prefix.
    pub fn lib_dir(&self) -> PathBuf {
        self.prefix.join("lib")
    }
}

/// Source of metadata for installed packages.
///
/// `Ok(None)` means the source is healthy but does not know the package;
/// `Err` means the source itself failed (unreadable database, bad records).
pub trait MetadataSource {
    /// Looks up metadata for `package`.
    fn query(&self, package: &str) -> Result<Option<PackageMeta>>;
}

/// [`MetadataSource`] backed by a fixed in-memory table.
#[derive(Debug, Default)]
pub struct StaticMetadata {
    packages: BTreeMap<String, PackageMeta>,
}

impl StaticMetadata {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a package record.
    pub fn insert(&mut self, meta: PackageMeta) {
        self.packages.insert(meta.name.clone(), meta);
    }
}

impl MetadataSource for StaticMetadata {
    fn query(&self, package: &str) -> Result<Option<PackageMeta>> {
        Ok(self.packages.get(package).cloned())
    }
}
