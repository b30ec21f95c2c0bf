//! pkgtree - link-dependency resolution for layered release build trees
//!
//! Computes which libraries every build target in a release must link, by
//! classifying the header files the build system saw each target use. A
//! release sits on top of frozen base releases, so resolution layers a
//! snapshot of the prior release's dependency registry under the entries
//! declared by the current build.
//!
//! # Architecture Overview
//!
//! Resolution follows a declare/resolve model where:
//! - a [`session::Session`] collects the build description's declarations
//!   (libraries, extension modules, binaries, external packages)
//! - [`session::Session::resolve`] consumes the session and walks the build
//!   graph, producing an immutable [`resolver::Resolution`]
//! - `pkgtree.lock` snapshots the resolved registry for the next release to
//!   load as its base layer
//!
//! ## Key Properties
//!
//! - **Path-driven**: package ownership is read from header paths, no
//!   manifest needs maintaining
//! - **Layered**: local entries shadow base release entries wholesale
//! - **Deterministic**: dependency sets are sorted, so link lines reproduce
//!   across runs
//! - **Fail-fast**: dependency cycles and missing snapshots abort resolution
//!   instead of producing partial link lines
//!
//! # Core Modules
//!
//! - [`classify`] - Header path to package name classification rules
//! - [`extract`] - Direct dependency extraction from build-graph children
//! - [`registry`] - Two-layer package registry and snapshot persistence
//! - [`resolver`] - Topological ordering and link-line computation
//! - [`session`] - Declaration API and target bookkeeping
//!
//! Supporting modules: [`config`] for per-site settings, [`graph`] for the
//! build-graph seam, [`metadata`] for installed-package records, [`report`]
//! for printable dependency listings and [`error`] for the failure type.
//!
//! # Example
//!
//! ```
//! use pkgtree::config::SiteConfig;
//! use pkgtree::graph::ScanGraph;
//! use pkgtree::report::DependencyReport;
//! use pkgtree::session::Session;
//!
//! # fn main() -> Result<(), pkgtree::error::PkgTreeError> {
//! // Structural graph as the build system recorded it
//! let mut graph = ScanGraph::new();
//! let evt = graph.node("arch/x86_64-rhel7/lib/libPSEvt.so");
//! graph.add_children(evt, ["release/include/pdsdata/Dgram.hh"]);
//! let psana = graph.node("arch/x86_64-rhel7/lib/libpsana.so");
//! graph.add_children(psana, ["release/include/PSEvt/Event.h"]);
//! let tool = graph.node("arch/x86_64-rhel7/bin/event_dump");
//! graph.add_children(tool, ["release/include/psana/Input.h"]);
//!
//! // Declaration phase
//! let mut session = Session::new(SiteConfig::default());
//! session.declare_external("pdsdata", vec!["pdsdata".to_string()], vec![], Default::default());
//! session.declare_library("PSEvt", evt);
//! session.declare_library("psana", psana);
//! let bin = session.declare_binary("psana", "event_dump", tool);
//!
//! let resolution = session.resolve(&graph)?;
//!
//! // The binary links the whole chain, dependents first
//! assert_eq!(
//!     resolution.target(bin).link.libraries,
//!     vec!["psana", "PSEvt", "pdsdata"]
//! );
//!
//! print!("{}", DependencyReport::forward(&resolution.registry));
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod classify;
pub mod extract;
pub mod registry;
pub mod resolver;
pub mod session;

// Supporting modules
pub mod config;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod report;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
