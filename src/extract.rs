//! Direct dependency extraction
//!
//! Walks a target's structural children in the build graph, classifies every
//! reachable file path, and collects the names of the providing packages.
//! The walk is transitive over build-graph structure (an object file's
//! headers count for the library built from it) but the result is still the
//! target's set of *direct* package dependencies; package-level transitivity
//! is the resolver's job.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::classify::Classifier;
use crate::graph::{BuildGraph, NodeId};

/// Collects the packages providing files reachable from `node`.
///
/// The starting node itself is not classified, only its descendants. Every
/// node is visited at most once, so shared headers cost one classification
/// and graphs with diamond shapes stay linear.
pub fn direct_dependencies(
    graph: &dyn BuildGraph,
    classifier: &Classifier,
    node: NodeId,
) -> BTreeSet<String> {
    let mut packages = BTreeSet::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue = VecDeque::from([node]);

    while let Some(current) = queue.pop_front() {
        for &child in graph.children(current) {
            if !visited.insert(child) {
                continue;
            }
            let path = graph.path(child);
            tracing::trace!("checking child {}", path.display());
            if let Some(package) = classifier.classify(path) {
                packages.insert(package);
            }
            queue.push_back(child);
        }
    }

    packages
}
