//! Topological ordering of package dependencies
//!
//! Depth-first post-order walk over the registry's dependency edges with
//! three-color cycle detection. Each call orders the subgraph reachable from
//! one starting package; the resolver concatenates per-start orders when a
//! binary pulls in several dependency chains.

use std::collections::HashMap;

use crate::error::PkgTreeError;
use crate::registry::Registry;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Package has not been visited.
    White,
    /// Package is currently being visited (on the DFS stack).
    Gray,
    /// Package has been fully visited.
    Black,
}

/// Orders `start` and every package reachable from it, dependencies first.
///
/// The result ends with `start` itself. Packages with no registry entry are
/// treated as leaves: external names such as `m` or `dl` still appear in the
/// order so their libraries (if any are registered later) stay linkable.
///
/// Marks are fresh per call. Two consecutive calls over overlapping
/// subgraphs both report the shared packages; deduplication is deliberately
/// left to callers because link lines tolerate repeats but not omissions.
///
/// # Errors
///
/// Returns [`PkgTreeError::DependencyCycle`] naming the edge that closed a
/// cycle. The registry must be acyclic for resolution to proceed.
pub fn toposort(registry: &Registry, start: &str) -> Result<Vec<String>, PkgTreeError> {
    let mut colors: HashMap<String, Color> = HashMap::new();
    let mut order = Vec::new();
    visit(registry, start, &mut colors, &mut order)?;
    Ok(order)
}

fn visit(
    registry: &Registry,
    package: &str,
    colors: &mut HashMap<String, Color>,
    order: &mut Vec<String>,
) -> Result<(), PkgTreeError> {
    colors.insert(package.to_string(), Color::Gray);

    if let Some(entry) = registry.entry(package) {
        for dep in &entry.dependencies {
            match colors.get(dep).copied().unwrap_or(Color::White) {
                Color::Gray => {
                    return Err(PkgTreeError::DependencyCycle {
                        package: package.to_string(),
                        dependency: dep.clone(),
                    });
                }
                Color::White => visit(registry, dep, colors, order)?,
                Color::Black => {}
            }
        }
    }

    order.push(package.to_string());
    colors.insert(package.to_string(), Color::Black);
    Ok(())
}
