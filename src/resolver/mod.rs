//! Dependency resolution
//!
//! Turns a declared [`Session`] plus the build system's structural graph
//! into finalized link configurations. Resolution runs in two passes:
//!
//! 1. **Libraries and extension modules.** Each target's direct package
//!    dependencies are extracted from the build graph, filtered (self and
//!    never-link exceptions removed) and stored as the package's dependency
//!    set in the registry. The target links the libraries its direct
//!    dependencies provide.
//!
//! 2. **Binaries.** Each executable's direct dependencies are expanded to
//!    the full transitive closure: every direct dependency contributes its
//!    topologically ordered chain, the concatenation is reversed once, and
//!    the binary links every library along the way. The reversal puts
//!    dependents before their dependencies, which is the order a single-pass
//!    linker needs. Packages shared between chains appear once per chain;
//!    repeats on a link line are harmless, omissions are not.
//!
//! Both passes mark targets whose link configuration grew, so the build
//! system knows to rescan their implicit dependencies. As a final step each
//! link line is checked against the configured Python runtime: releases on
//! pre-3.8 runtimes only ship the `m`-suffixed ABI library, and the link
//! name is rewritten when the unsuffixed one is absent.
//!
//! A dependency cycle anywhere in the walked subgraph aborts resolution
//! with [`PkgTreeError::DependencyCycle`]; no partial result is produced.

mod toposort;

pub use toposort::toposort;

use std::path::Path;

use anyhow::Result;

use crate::config::SiteConfig;
use crate::error::PkgTreeError;
use crate::extract;
use crate::graph::BuildGraph;
use crate::registry::Registry;
use crate::session::{BuildTarget, Session, TargetId, TargetKind};

/// Ordered package contributions to one executable's link line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryDependencyRecord {
    /// Package that builds the executable.
    pub package: String,
    /// Executable name as declared.
    pub name: String,
    /// Packages in final link order, dependents first. Repeats are
    /// preserved.
    pub packages: Vec<String>,
}

/// Finalized result of one resolution pass.
///
/// Targets keep their declaration order, so a [`TargetId`] from the session
/// still addresses the same target here. The registry's local layer now
/// carries the resolved dependency sets and can be snapshotted for the next
/// release.
#[derive(Debug)]
pub struct Resolution {
    /// Registry with resolved local entries.
    pub registry: Registry,
    /// All declared targets with finalized link configurations.
    pub targets: Vec<BuildTarget>,
    /// Per-executable dependency records, in declaration order.
    pub binaries: Vec<BinaryDependencyRecord>,
}

impl Resolution {
    /// Returns the resolved target for a declaration handle.
    pub fn target(&self, id: TargetId) -> &BuildTarget {
        &self.targets[id.index()]
    }

    /// Writes the registry's local layer to a snapshot at `path`.
    pub fn store_snapshot(&self, path: &Path) -> Result<()> {
        self.registry.store_snapshot(path)
    }
}

/// Resolves all declared targets against `graph`.
///
/// Consumes the session; the returned [`Resolution`] is immutable from the
/// declaration API's point of view.
///
/// # Errors
///
/// Returns [`PkgTreeError::DependencyCycle`] when the registry's dependency
/// edges contain a cycle.
pub fn resolve(session: Session, graph: &dyn BuildGraph) -> Result<Resolution, PkgTreeError> {
    let (config, classifier, mut registry, mut targets) = session.into_parts();

    tracing::debug!("resolving release dependencies for {} targets", targets.len());

    // Libraries first: they fix each package's dependency set in the
    // registry, which the binary pass then walks transitively.
    for target in targets.iter_mut().filter(|t| t.kind != TargetKind::Binary) {
        tracing::debug!("checking dependencies for library {}", target.name);
        let mut deps = extract::direct_dependencies(graph, &classifier, target.node);
        deps.remove(&target.package);
        if let Some(excluded) = config.never_link.get(&target.package) {
            for name in excluded {
                deps.remove(name);
            }
        }
        tracing::debug!("package {} deps = {:?}", target.package, deps);

        registry.set_package_deps(&target.package, deps.clone());

        let before = target.link.libraries.len();
        for dep in &deps {
            if let Some(entry) = registry.entry(dep) {
                target.link.libraries.extend(entry.libraries.iter().cloned());
            }
        }
        if target.link.libraries.len() > before {
            target.needs_rescan = true;
        }
        fixup_python_suffix(&mut target.link.libraries, &config);
    }

    let mut binaries = Vec::new();
    for target in targets.iter_mut().filter(|t| t.kind == TargetKind::Binary) {
        tracing::debug!("checking dependencies for binary {}", target.name);
        let bindeps = extract::direct_dependencies(graph, &classifier, target.node);

        let mut alldeps = Vec::new();
        for dep in &bindeps {
            alldeps.extend(toposort(&registry, dep)?);
        }
        alldeps.reverse();
        tracing::debug!("binary {} deps = {:?}", target.name, alldeps);

        let before = target.link.libraries.len();
        for dep in &alldeps {
            if let Some(entry) = registry.entry(dep) {
                target.link.libraries.extend(entry.libraries.iter().cloned());
                target.link.libdirs.extend(entry.libdirs.iter().cloned());
            }
        }
        if target.link.libraries.len() > before {
            target.needs_rescan = true;
        }
        fixup_python_suffix(&mut target.link.libraries, &config);

        binaries.push(BinaryDependencyRecord {
            package: target.package.clone(),
            name: target.name.clone(),
            packages: alldeps,
        });
    }

    Ok(Resolution {
        registry,
        targets,
        binaries,
    })
}

/// Rewrites `python{major}.{minor}` link entries to the `m`-suffixed ABI
/// name when the unsuffixed runtime library does not exist on disk.
///
/// Runtimes before Python 3.8 ship `libpython3.7m.so` only. The check is
/// skipped when no runtime libdir is configured or the pattern cannot be
/// evaluated; it never fails resolution.
fn fixup_python_suffix(libraries: &mut [String], config: &SiteConfig) {
    let pyname = config.python.lib_name();
    if !libraries.iter().any(|lib| *lib == pyname) {
        return;
    }
    let Some(libdir) = config.python_libdir.as_deref() else {
        return;
    };
    let pattern = libdir.join(format!("lib{pyname}.so*"));
    let Some(pattern) = pattern.to_str() else {
        return;
    };

    match glob::glob(pattern) {
        Ok(mut matches) => {
            if matches.next().is_none() {
                let suffixed = format!("{pyname}m");
                tracing::debug!(
                    "lib{}.so not found in {}, linking {} instead",
                    pyname,
                    libdir.display(),
                    suffixed
                );
                for lib in libraries.iter_mut() {
                    if *lib == pyname {
                        *lib = suffixed.clone();
                    }
                }
            }
        }
        Err(err) => {
            tracing::trace!("python runtime check skipped: {err}");
        }
    }
}
