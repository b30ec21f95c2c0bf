//! Snapshot persistence for the dependency registry
//!
//! After a release build resolves its dependencies, the local registry layer
//! is written to a snapshot file inside the release tree. The next release
//! built on top loads that file as its base layer, so resolution composes
//! across releases without rescanning frozen trees.
//!
//! # File Format
//!
//! Snapshots are TOML with a version gate and a generation timestamp:
//!
//! ```toml
//! # Auto-generated package dependency snapshot - DO NOT EDIT
//! version = 1
//! generated_at = "2026-08-25T10:30:00+00:00"
//!
//! [packages.psana]
//! dependencies = ["PSEnv", "PSEvt"]
//! libraries = ["psana"]
//!
//! [packages.PSEvt]
//! libraries = ["PSEvt"]
//! ```
//!
//! Unlike caches, a snapshot is load-bearing build metadata: loading one that
//! does not exist is an error, never an empty registry. Resolving against
//! nothing would silently produce broken link lines.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PkgTreeError;

use super::PackageEntry;

/// Conventional snapshot file name inside a release tree.
pub const SNAPSHOT_FILE_NAME: &str = "pkgtree.lock";

/// On-disk form of one release's local registry layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version for compatibility checking.
    pub version: u32,

    /// RFC 3339 timestamp of when the snapshot was generated.
    pub generated_at: String,

    /// Package entries recorded by the release.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub packages: BTreeMap<String, PackageEntry>,
}

impl Snapshot {
    /// Current snapshot format version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a snapshot of `packages` stamped with the current time.
    pub fn new(packages: BTreeMap<String, PackageEntry>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            packages,
        }
    }

    /// Loads a snapshot from disk with validation.
    ///
    /// # Errors
    ///
    /// - [`PkgTreeError::SnapshotNotFound`] if `path` does not exist
    /// - [`PkgTreeError::SnapshotParseError`] if the file is not valid TOML
    /// - [`PkgTreeError::SnapshotVersionTooNew`] if the file was written by a
    ///   newer version of this crate
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PkgTreeError::SnapshotNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).with_context(|| {
            format!(
                "Cannot read snapshot: {}\n\n\
                    Possible causes:\n\
                    - Permission denied (check file ownership)\n\
                    - File is corrupted or locked by another process",
                path.display()
            )
        })?;

        let snapshot: Self = toml::from_str(&content)
            .map_err(|e| PkgTreeError::SnapshotParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
            .with_context(|| {
                format!(
                    "Invalid TOML syntax in snapshot: {}\n\n\
                    The snapshot may be corrupted. Rebuild the release that\n\
                    produced it to regenerate the file.",
                    path.display()
                )
            })?;

        if snapshot.version > Self::CURRENT_VERSION {
            return Err(PkgTreeError::SnapshotVersionTooNew {
                found: snapshot.version,
                supported: Self::CURRENT_VERSION,
            }
            .into());
        }

        tracing::debug!(
            "loaded snapshot {} with {} packages",
            path.display(),
            snapshot.packages.len()
        );
        Ok(snapshot)
    }

    /// Saves the snapshot with a warning header, atomically.
    ///
    /// The file is written to a temporary sibling and renamed into place so
    /// an interrupted build never leaves a truncated snapshot behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        tracing::debug!("storing release dependencies in {}", path.display());

        let mut content = String::from("# Auto-generated package dependency snapshot - DO NOT EDIT\n");
        let toml_content = toml::to_string_pretty(self)
            .with_context(|| format!("Failed to serialize snapshot for {}", path.display()))?;
        content.push_str(&toml_content);

        atomic_write(path, content.as_bytes()).with_context(|| {
            format!(
                "Cannot write snapshot: {}\n\n\
                    Possible causes:\n\
                    - Permission denied\n\
                    - Directory doesn't exist\n\
                    - Disk is full or read-only",
                path.display()
            )
        })
    }
}

/// Writes `content` to `path` via a temporary file and rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;
        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
