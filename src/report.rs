//! Printable dependency reports
//!
//! Renders the merged registry view as one line per package, either forward
//! (what each package depends on) or inverted (what depends on each
//! package). Output is sorted by package name and dependency name, so two
//! runs over the same registry print identically.
//!
//! ```text
//! PSEnv -> PSEvt pdsdata
//! PSEvt -> pdsdata
//! psana -> PSEnv PSEvt
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::registry::Registry;

/// Sorted dependency listing over a registry's merged view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    tree: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyReport {
    /// Forward report: each package with its dependency set.
    ///
    /// Every package in the merged view gets a line, including packages
    /// without dependencies.
    pub fn forward(registry: &Registry) -> Self {
        let mut tree = BTreeMap::new();
        for (package, entry) in registry.iter_merged() {
            tree.insert(package.clone(), entry.dependencies.clone());
        }
        Self { tree }
    }

    /// Inverted report: each package with the packages depending on it.
    ///
    /// Only packages that are depended upon appear.
    pub fn inverted(registry: &Registry) -> Self {
        let mut tree: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (package, entry) in registry.iter_merged() {
            for dep in &entry.dependencies {
                tree.entry(dep.clone()).or_default().insert(package.clone());
            }
        }
        Self { tree }
    }

    /// Number of lines the report prints.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the report prints nothing.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Iterates `(package, dependencies)` pairs in print order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.tree.iter()
    }
}

impl fmt::Display for DependencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (package, deps) in &self.tree {
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            writeln!(f, "{} -> {}", package, deps.join(" "))?;
        }
        Ok(())
    }
}
