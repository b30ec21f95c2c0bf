//! Build graph access
//!
//! Dependency extraction walks the structural graph maintained by the
//! surrounding build system: which files each target was compiled from,
//! which headers those files include, and so on. This module defines the
//! narrow view of that graph the resolver needs ([`BuildGraph`]) plus an
//! in-memory implementation ([`ScanGraph`]) used by tests and by callers
//! that assemble the graph themselves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Opaque handle to a node in a build graph.
///
/// Handles are only meaningful for the graph that issued them and must stay
/// stable for the duration of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a handle from a raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Read-only view of the build system's structural dependency graph.
///
/// Implementations expose each node's recorded file path and its direct
/// children. The graph is expected to be acyclic; extraction guards against
/// repeated visits but the set of nodes and edges must not change while a
/// resolution pass is running.
pub trait BuildGraph {
    /// File path the node was recorded under.
    fn path(&self, node: NodeId) -> &Path;

    /// Direct structural children of the node.
    fn children(&self, node: NodeId) -> &[NodeId];
}

#[derive(Debug)]
struct NodeRecord {
    path: PathBuf,
    children: Vec<NodeId>,
}

/// In-memory [`BuildGraph`] built by interning paths.
///
/// # Examples
///
/// ```
/// use pkgtree::graph::{BuildGraph, ScanGraph};
/// use std::path::Path;
///
/// let mut graph = ScanGraph::new();
/// let obj = graph.node("MyPkg/src/foo.o");
/// let src = graph.node("MyPkg/src/foo.cpp");
/// let hdr = graph.node("release/include/PSEvt/Event.h");
/// graph.add_child(obj, src);
/// graph.add_child(src, hdr);
///
/// assert_eq!(graph.path(hdr), Path::new("release/include/PSEvt/Event.h"));
/// assert_eq!(graph.children(obj), &[src]);
/// ```
#[derive(Debug, Default)]
pub struct ScanGraph {
    nodes: Vec<NodeRecord>,
    by_path: HashMap<PathBuf, NodeId>,
}

impl ScanGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `path`, creating it on first use.
    pub fn node(&mut self, path: impl Into<PathBuf>) -> NodeId {
        let path = path.into();
        if let Some(&id) = self.by_path.get(&path) {
            return id;
        }
        let id = NodeId::new(self.nodes.len());
        self.by_path.insert(path.clone(), id);
        self.nodes.push(NodeRecord {
            path,
            children: Vec::new(),
        });
        id
    }

    /// Records `child` as a direct child of `parent`.
    ///
    /// Duplicate edges are ignored.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[parent.index()].children;
        if !children.contains(&child) {
            children.push(child);
        }
    }

    /// Interns `paths` and records each as a direct child of `parent`.
    pub fn add_children<I, P>(&mut self, parent: NodeId, paths: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut ids = Vec::new();
        for path in paths {
            let child = self.node(path);
            self.add_child(parent, child);
            ids.push(child);
        }
        ids
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl BuildGraph for ScanGraph {
    fn path(&self, node: NodeId) -> &Path {
        &self.nodes[node.index()].path
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }
}
