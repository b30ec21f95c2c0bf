//! Integration test suite for pkgtree
//!
//! End-to-end tests that drive the public API the way a build system would:
//! declare targets on a session, resolve them against a scanned build graph,
//! and persist the result as the base layer for the next release. These
//! tests run quickly and are executed in CI on every commit.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! cargo nextest run --test integration
//! ```
//!
//! # Test Organization
//!
//! Tests are organized by functionality area:
//! - **classification**: Header path to package name mapping
//! - **report**: Dependency report rendering over resolved registries
//! - **resolution**: Declaration, link line computation and rescan flags
//! - **snapshot**: Snapshot persistence and base release layering

mod classification;
mod snapshot;
