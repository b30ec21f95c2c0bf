//! Test utilities for pkgtree
//!
//! Helpers shared between unit and integration tests: one-time logging
//! setup and fixtures for snapshot files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once regardless of how many times it
/// is called. Respects the `RUST_LOG` environment variable if set, or uses
/// the provided log level.
///
/// ```bash
/// RUST_LOG=pkgtree=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            // No logging if neither is provided
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Test fixture for creating sample snapshot files
#[derive(Clone, Debug)]
pub struct SnapshotFixture {
    pub content: String,
    pub name: String,
}

impl SnapshotFixture {
    /// Small base release: an analysis stack of three packages.
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r#"
# Auto-generated package dependency snapshot - DO NOT EDIT
version = 1
generated_at = "2026-08-20T12:00:00+00:00"

[packages.PSEvt]
dependencies = ["pdsdata"]
libraries = ["PSEvt"]

[packages.pdsdata]
libraries = ["pdsdata"]
libdirs = ["/base/arch/x86_64-rhel7/lib"]

[packages.psana]
dependencies = ["PSEvt", "pdsdata"]
libraries = ["psana"]
"#
            .trim_start()
            .to_string(),
        }
    }

    /// Snapshot stamped with an unsupported future format version.
    pub fn future_version() -> Self {
        Self {
            name: "future_version".to_string(),
            content: r#"
version = 99
generated_at = "2026-08-20T12:00:00+00:00"
"#
            .trim_start()
            .to_string(),
        }
    }

    /// Snapshot with broken TOML syntax.
    pub fn invalid() -> Self {
        Self {
            name: "invalid".to_string(),
            content: "version = [[[ not toml".to_string(),
        }
    }

    /// Writes the fixture under `dir` using the conventional file name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(crate::registry::SNAPSHOT_FILE_NAME);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}
