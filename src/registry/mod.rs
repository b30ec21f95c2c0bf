//! Package dependency registry
//!
//! The registry is the central store of per-package link facts. Each package
//! maps to a [`PackageEntry`] carrying three things:
//!
//! - `dependencies`: names of packages it needs at link time
//! - `libraries`: link library names it provides
//! - `libdirs`: directories those libraries live in
//!
//! # Layering
//!
//! A release is built on top of one or more base releases, so the registry
//! keeps two layers:
//!
//! - the **base** layer, loaded from the snapshot a prior release stored and
//!   never modified during a build
//! - the **local** layer, populated while the current release is declared
//!   and resolved
//!
//! Lookups see the union with local entries shadowing base entries wholesale:
//! a locally rebuilt package fully replaces its base-release incarnation,
//! fields are never merged across layers.

pub mod snapshot;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use snapshot::{SNAPSHOT_FILE_NAME, Snapshot};

/// Link facts recorded for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Packages this package needs at link time. Self-references are never
    /// stored.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub dependencies: BTreeSet<String>,

    /// Link library names this package provides, in registration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<String>,

    /// Directories holding the libraries, in registration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libdirs: Vec<PathBuf>,
}

/// Two-layer package registry: frozen base release entries plus the local
/// entries of the release being built.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    base: BTreeMap<String, PackageEntry>,
    local: BTreeMap<String, PackageEntry>,
}

impl Registry {
    /// Creates a registry with both layers empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `packages` wholesale into the base layer.
    ///
    /// Called once per base release; later seeds overwrite earlier entries of
    /// the same name, mirroring release stacking order.
    pub fn seed_base(&mut self, packages: BTreeMap<String, PackageEntry>) {
        self.base.extend(packages);
    }

    /// Loads a base release snapshot from `path` and merges it into the base
    /// layer.
    ///
    /// # Errors
    ///
    /// Fails with [`PkgTreeError::SnapshotNotFound`] when no snapshot exists
    /// at `path`; a base release without dependency data cannot be resolved
    /// against.
    ///
    /// [`PkgTreeError::SnapshotNotFound`]: crate::error::PkgTreeError::SnapshotNotFound
    pub fn load_base(&mut self, path: &Path) -> Result<()> {
        let snap = Snapshot::load(path)?;
        self.seed_base(snap.packages);
        Ok(())
    }

    /// Writes the local layer to a snapshot at `path` for the next release
    /// to load as its base.
    pub fn store_snapshot(&self, path: &Path) -> Result<()> {
        Snapshot::new(self.local.clone()).save(path)
    }

    /// Appends libraries and library directories to `package`'s local entry.
    ///
    /// Entries accumulate across calls in registration order. A call with
    /// nothing to add leaves the registry untouched, so it never creates an
    /// empty local entry that would shadow a base entry.
    pub fn add_package_libs<L, D>(&mut self, package: &str, libraries: L, libdirs: D)
    where
        L: IntoIterator<Item = String>,
        D: IntoIterator<Item = PathBuf>,
    {
        let mut libraries = libraries.into_iter().peekable();
        if libraries.peek().is_some() {
            self.local
                .entry(package.to_string())
                .or_default()
                .libraries
                .extend(libraries);
        }
        let mut libdirs = libdirs.into_iter().peekable();
        if libdirs.peek().is_some() {
            self.local
                .entry(package.to_string())
                .or_default()
                .libdirs
                .extend(libdirs);
        }
    }

    /// Replaces `package`'s dependency set in the local layer.
    ///
    /// Self-references are dropped. An empty `dependencies` leaves the
    /// registry untouched.
    pub fn set_package_deps(&mut self, package: &str, mut dependencies: BTreeSet<String>) {
        if dependencies.is_empty() {
            return;
        }
        dependencies.remove(package);
        tracing::debug!(
            "setting deps for package {}: {}",
            package,
            dependencies.iter().map(String::as_str).collect::<Vec<_>>().join(",")
        );
        self.local.entry(package.to_string()).or_default().dependencies = dependencies;
    }

    /// Looks up a package through both layers, local first.
    pub fn entry(&self, package: &str) -> Option<&PackageEntry> {
        self.local.get(package).or_else(|| self.base.get(package))
    }

    /// The base layer.
    pub fn base(&self) -> &BTreeMap<String, PackageEntry> {
        &self.base
    }

    /// The local layer.
    pub fn local(&self) -> &BTreeMap<String, PackageEntry> {
        &self.local
    }

    /// Iterates the merged view, local entries shadowing base entries.
    ///
    /// Iteration order is unspecified; callers that print sort themselves.
    pub fn iter_merged(&self) -> impl Iterator<Item = (&String, &PackageEntry)> {
        self.base
            .iter()
            .filter(|(name, _)| !self.local.contains_key(*name))
            .chain(self.local.iter())
    }
}
