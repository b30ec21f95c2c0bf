//! Error handling for pkgtree
//!
//! All failure cases in the crate surface as [`PkgTreeError`]. The resolver
//! and snapshot layers return strongly-typed variants so callers can match on
//! the failure mode (a dependency cycle aborts a build differently than a
//! missing snapshot file), while I/O helpers wrap them in [`anyhow`] context
//! for readable chains.
//!
//! # Error Categories
//!
//! - **Resolution**: [`PkgTreeError::DependencyCycle`]
//! - **Snapshot persistence**: [`PkgTreeError::SnapshotNotFound`],
//!   [`PkgTreeError::SnapshotParseError`], [`PkgTreeError::SnapshotVersionTooNew`]
//! - **Configuration**: [`PkgTreeError::ConfigError`]

use thiserror::Error;

/// The main error type for pkgtree operations
///
/// Each variant represents a specific failure mode and carries the details a
/// caller needs to report or recover from it. Resolution errors are fatal to
/// the resolve pass that raised them; no partial [`Resolution`] is produced.
///
/// [`Resolution`]: crate::resolver::Resolution
#[derive(Error, Debug)]
pub enum PkgTreeError {
    /// Dependency cycle detected during topological ordering
    ///
    /// The dependency registry must form a directed acyclic graph. This error
    /// names the edge that closed the cycle: while ordering the dependencies
    /// of `package`, its dependency `dependency` was found already on the
    /// active traversal path.
    ///
    /// # Fields
    /// - `package`: The package whose dependencies were being ordered
    /// - `dependency`: The dependency already on the traversal path
    #[error("Dependency cycle detected between packages '{package}' and '{dependency}'")]
    DependencyCycle {
        /// The package whose dependencies were being ordered
        package: String,
        /// The dependency already on the traversal path
        dependency: String,
    },

    /// Snapshot file does not exist at the expected location
    ///
    /// Loading the base layer from a prior release requires the snapshot file
    /// to be present. A missing file is reported rather than treated as an
    /// empty registry, since silently resolving against nothing produces
    /// wrong link lines instead of a diagnosable failure.
    ///
    /// # Fields
    /// - `path`: The path that was expected to contain a snapshot
    #[error("Package tree snapshot not found: {path}")]
    SnapshotNotFound {
        /// The path that was expected to contain a snapshot
        path: String,
    },

    /// Snapshot file exists but contains invalid TOML
    ///
    /// # Fields
    /// - `file`: The snapshot file path
    /// - `reason`: Details from the TOML parser
    #[error("Invalid snapshot file syntax: {file}")]
    SnapshotParseError {
        /// The snapshot file path
        file: String,
        /// Details from the TOML parser
        reason: String,
    },

    /// Snapshot was written by a newer version of this crate
    ///
    /// # Fields
    /// - `found`: The version recorded in the snapshot file
    /// - `supported`: The highest version this build understands
    #[error(
        "Snapshot version {found} is newer than supported version {supported} - upgrade pkgtree to read this file"
    )]
    SnapshotVersionTooNew {
        /// The version recorded in the snapshot file
        found: u32,
        /// The highest version this build understands
        supported: u32,
    },

    /// Site configuration is invalid
    ///
    /// # Fields
    /// - `message`: Description of the configuration problem
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },
}
