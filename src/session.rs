//! Build session and target declaration
//!
//! A [`Session`] collects everything the build description declares before
//! dependencies can be resolved: which packages build libraries, extension
//! modules and binaries, which link libraries each package provides, and
//! which externally installed packages participate with fixed entries.
//!
//! Declaration happens first and is the only mutable phase. Calling
//! [`Session::resolve`] consumes the session and hands ownership to the
//! resolver, which returns a finalized [`Resolution`]; nothing can declare
//! new targets into a resolved build by construction.
//!
//! # Examples
//!
//! ```
//! use pkgtree::config::SiteConfig;
//! use pkgtree::graph::ScanGraph;
//! use pkgtree::session::Session;
//!
//! # fn main() -> Result<(), pkgtree::error::PkgTreeError> {
//! let mut graph = ScanGraph::new();
//! let lib = graph.node("arch/x86_64-rhel7/lib/libPSEvt.so");
//! graph.add_children(lib, ["release/include/pdsdata/Dgram.hh"]);
//!
//! let mut session = Session::new(SiteConfig::default());
//! session.declare_external("pdsdata", vec!["pdsdata".to_string()], vec![], Default::default());
//! session.declare_library("PSEvt", lib);
//!
//! let resolution = session.resolve(&graph)?;
//! assert_eq!(resolution.targets[0].link.libraries, vec!["pdsdata"]);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::classify::Classifier;
use crate::config::SiteConfig;
use crate::error::PkgTreeError;
use crate::graph::{BuildGraph, NodeId};
use crate::registry::Registry;
use crate::resolver::Resolution;

/// What kind of artifact a build target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Shared library linked into dependents.
    Library,
    /// Native extension module loaded by the Python runtime.
    Extension,
    /// Executable.
    Binary,
}

/// Handle to a declared target.
///
/// Indexes into the session's declaration order, which [`Resolution`]
/// preserves, so a handle taken at declaration time addresses the same
/// target after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) usize);

impl TargetId {
    /// Returns the raw declaration index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Link configuration the resolver computes for a target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSpec {
    /// Library names in link order. Repeats are preserved.
    pub libraries: Vec<String>,
    /// Library search directories in link order.
    pub libdirs: Vec<PathBuf>,
}

impl LinkSpec {
    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty() && self.libdirs.is_empty()
    }
}

/// One declared build target.
#[derive(Debug, Clone)]
pub struct BuildTarget {
    /// Package the target belongs to.
    pub package: String,
    /// Artifact name: the library or module name, or the executable name.
    pub name: String,
    /// Artifact kind.
    pub kind: TargetKind,
    /// Node in the build graph to extract dependencies from.
    pub node: NodeId,
    /// Link configuration, filled in by the resolver.
    pub link: LinkSpec,
    /// Set when resolution appended link entries. The build system must then
    /// rescan the target's implicit dependencies or risk linking against
    /// stale library lists.
    pub needs_rescan: bool,
}

/// Declaration phase of one release build.
pub struct Session {
    config: SiteConfig,
    classifier: Classifier,
    registry: Registry,
    targets: Vec<BuildTarget>,
}

impl Session {
    /// Creates a session for the given site configuration.
    pub fn new(config: SiteConfig) -> Self {
        let classifier = Classifier::new(&config);
        Self {
            config,
            classifier,
            registry: Registry::new(),
            targets: Vec::new(),
        }
    }

    /// Loads a base release snapshot into the registry's base layer.
    ///
    /// May be called once per base release, innermost release first; later
    /// loads shadow earlier ones.
    pub fn load_base(&mut self, path: &Path) -> Result<()> {
        self.registry.load_base(path)
    }

    /// Declares a shared library built for `package`.
    ///
    /// The library artifact carries the package name, which is registered as
    /// a link library provided to dependents.
    pub fn declare_library(&mut self, package: &str, node: NodeId) -> TargetId {
        self.registry
            .add_package_libs(package, [package.to_string()], []);
        self.push_target(package, package, TargetKind::Library, node)
    }

    /// Declares a native extension module `module` built for `package`.
    ///
    /// The module name joins the package's link libraries, so dependents of
    /// the package link against the extension as well.
    pub fn declare_extension(&mut self, package: &str, module: &str, node: NodeId) -> TargetId {
        self.registry
            .add_package_libs(package, [module.to_string()], []);
        self.push_target(package, module, TargetKind::Extension, node)
    }

    /// Declares an executable `name` built by `package`.
    ///
    /// Binaries provide no link libraries and get no registry entry; their
    /// dependencies feed the executable's own link line only.
    pub fn declare_binary(&mut self, package: &str, name: &str, node: NodeId) -> TargetId {
        self.push_target(package, name, TargetKind::Binary, node)
    }

    /// Registers an externally installed package with fixed link facts.
    ///
    /// External packages have no build targets in this release; their
    /// libraries, library directories and (optionally) dependencies are
    /// declared outright instead of being extracted from a build graph.
    pub fn declare_external(
        &mut self,
        package: &str,
        libraries: Vec<String>,
        libdirs: Vec<PathBuf>,
        dependencies: BTreeSet<String>,
    ) {
        self.registry.add_package_libs(package, libraries, libdirs);
        self.registry.set_package_deps(package, dependencies);
    }

    /// Appends extra link libraries and directories to a package's entry.
    pub fn add_package_libs(
        &mut self,
        package: &str,
        libraries: Vec<String>,
        libdirs: Vec<PathBuf>,
    ) {
        self.registry.add_package_libs(package, libraries, libdirs);
    }

    /// Overrides a package's dependency set ahead of resolution.
    ///
    /// Resolution replaces this for packages that build libraries; it sticks
    /// for packages that do not.
    pub fn set_package_deps(&mut self, package: &str, dependencies: BTreeSet<String>) {
        self.registry.set_package_deps(package, dependencies);
    }

    /// The session's site configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The registry as declared so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Declared targets in declaration order.
    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Resolves dependencies against `graph`, consuming the session.
    ///
    /// # Errors
    ///
    /// Fails with [`PkgTreeError::DependencyCycle`] if the declared
    /// dependency graph is cyclic; no partial resolution is produced.
    pub fn resolve(self, graph: &dyn BuildGraph) -> Result<Resolution, PkgTreeError> {
        crate::resolver::resolve(self, graph)
    }

    pub(crate) fn into_parts(self) -> (SiteConfig, Classifier, Registry, Vec<BuildTarget>) {
        (self.config, self.classifier, self.registry, self.targets)
    }

    fn push_target(
        &mut self,
        package: &str,
        name: &str,
        kind: TargetKind,
        node: NodeId,
    ) -> TargetId {
        let id = TargetId(self.targets.len());
        self.targets.push(BuildTarget {
            package: package.to_string(),
            name: name.to_string(),
            kind,
            node,
            link: LinkSpec::default(),
            needs_rescan: false,
        });
        id
    }
}
