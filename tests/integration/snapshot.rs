//! Tests for snapshot persistence and base release layering

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use pkgtree::config::SiteConfig;
use pkgtree::error::PkgTreeError;
use pkgtree::graph::ScanGraph;
use pkgtree::registry::{SNAPSHOT_FILE_NAME, Snapshot};
use pkgtree::session::Session;
use pkgtree::test_utils::SnapshotFixture;

/// Resolving a release, storing its snapshot and loading it back as a base
/// layer reproduces the resolved entries.
#[test]
fn test_store_then_reload_round_trip() -> Result<()> {
    pkgtree::test_utils::init_test_logging(None);
    let dir = tempfile::tempdir()?;

    let mut graph = ScanGraph::new();
    let scan = graph.node("release/src/PSEvt");
    graph.add_children(scan, ["release/include/pdsdata/Dgram.hh"]);

    let mut session = Session::new(SiteConfig::default());
    session.declare_external(
        "pdsdata",
        vec!["pdsdata".to_string()],
        vec![PathBuf::from("/ext/pdsdata/lib")],
        BTreeSet::new(),
    );
    session.declare_library("PSEvt", scan);

    let resolution = session.resolve(&graph)?;
    let path = dir.path().join(SNAPSHOT_FILE_NAME);
    resolution.store_snapshot(&path)?;

    let content = std::fs::read_to_string(&path)?;
    assert!(
        content.starts_with("# Auto-generated package dependency snapshot - DO NOT EDIT"),
        "snapshot should carry the generation header:\n{content}"
    );

    let mut next = Session::new(SiteConfig::default());
    next.load_base(&path)?;

    let registry = next.registry();
    assert_eq!(registry.base().len(), 2);
    let psevt = registry.entry("PSEvt").expect("PSEvt from snapshot");
    assert_eq!(
        psevt.dependencies,
        BTreeSet::from(["pdsdata".to_string()])
    );
    assert_eq!(psevt.libraries, ["PSEvt"]);
    let pdsdata = registry.entry("pdsdata").expect("pdsdata from snapshot");
    assert_eq!(pdsdata.libdirs, [PathBuf::from("/ext/pdsdata/lib")]);
    Ok(())
}

/// A release layered on a base resolves its targets against the base
/// entries: new code links against base libraries it never built.
#[test]
fn test_base_layering_resolves_against_prior_release() -> Result<()> {
    pkgtree::test_utils::init_test_logging(None);
    let dir = tempfile::tempdir()?;
    let path = SnapshotFixture::basic().write_to(dir.path())?;

    let mut graph = ScanGraph::new();
    let lib_scan = graph.node("release/src/MyModule");
    graph.add_children(lib_scan, ["release/include/psana/Env.h"]);
    let bin_scan = graph.node("release/app/mybin.cpp");
    graph.add_children(bin_scan, ["release/include/MyModule/Api.h"]);

    let mut session = Session::new(SiteConfig::default());
    session.load_base(&path)?;
    let lib = session.declare_library("MyModule", lib_scan);
    let bin = session.declare_binary("MyModule", "mybin", bin_scan);

    let resolution = session.resolve(&graph)?;

    // the library links the base package it includes headers from
    assert_eq!(resolution.target(lib).link.libraries, ["psana"]);

    // the binary walks the chain down into the base release
    let target = resolution.target(bin);
    assert_eq!(
        target.link.libraries,
        ["MyModule", "psana", "PSEvt", "pdsdata"]
    );
    assert_eq!(
        target.link.libdirs,
        [PathBuf::from("/base/arch/x86_64-rhel7/lib")]
    );
    Ok(())
}

/// Rebuilding a base package locally shadows its base entry wholesale, and
/// only the local layer is stored for the next release.
#[test]
fn test_local_rebuild_shadows_base_entry() -> Result<()> {
    pkgtree::test_utils::init_test_logging(None);
    let dir = tempfile::tempdir()?;
    let path = SnapshotFixture::basic().write_to(dir.path())?;

    // local psana rebuild now only includes PSEvt headers
    let mut graph = ScanGraph::new();
    let scan = graph.node("release/src/psana");
    graph.add_children(scan, ["release/include/PSEvt/Event.h"]);

    let mut session = Session::new(SiteConfig::default());
    session.load_base(&path)?;
    let psana = session.declare_library("psana", scan);

    let resolution = session.resolve(&graph)?;

    let entry = resolution.registry.entry("psana").expect("psana entry");
    assert_eq!(entry.dependencies, BTreeSet::from(["PSEvt".to_string()]));
    assert!(
        !entry.dependencies.contains("pdsdata"),
        "base dependency set must not leak through the local shadow"
    );
    assert_eq!(resolution.target(psana).link.libraries, ["PSEvt"]);

    // the stored snapshot covers this release's own packages only
    let out = dir.path().join("next").join(SNAPSHOT_FILE_NAME);
    resolution.store_snapshot(&out)?;
    let stored = Snapshot::load(&out)?;
    assert_eq!(
        stored.packages.keys().collect::<Vec<_>>(),
        ["psana"],
        "base entries must stay in the base release's snapshot"
    );
    assert_eq!(
        stored.packages["psana"].dependencies,
        BTreeSet::from(["PSEvt".to_string()])
    );
    Ok(())
}

/// A missing snapshot is an error, not an empty base layer.
#[test]
fn test_missing_snapshot_is_reported() {
    pkgtree::test_utils::init_test_logging(None);
    let dir = tempfile::tempdir().expect("tempdir");

    let mut session = Session::new(SiteConfig::default());
    let err = session
        .load_base(&dir.path().join("no-such").join(SNAPSHOT_FILE_NAME))
        .unwrap_err();

    match err.downcast_ref::<PkgTreeError>() {
        Some(PkgTreeError::SnapshotNotFound { path }) => {
            assert!(path.contains("no-such"), "unexpected path: {path}");
        }
        other => panic!("expected SnapshotNotFound, got {other:?}"),
    }
}

/// A snapshot written by a newer pkgtree is refused instead of being
/// misread.
#[test]
fn test_future_snapshot_version_is_rejected() -> Result<()> {
    pkgtree::test_utils::init_test_logging(None);
    let dir = tempfile::tempdir()?;
    let path = SnapshotFixture::future_version().write_to(dir.path())?;

    let mut session = Session::new(SiteConfig::default());
    let err = session.load_base(&path).unwrap_err();

    match err.downcast_ref::<PkgTreeError>() {
        Some(PkgTreeError::SnapshotVersionTooNew { found, supported }) => {
            assert_eq!(*found, 99);
            assert_eq!(*supported, 1);
        }
        other => panic!("expected SnapshotVersionTooNew, got {other:?}"),
    }
    Ok(())
}

/// Malformed snapshot files report the offending file.
#[test]
fn test_malformed_snapshot_reports_file() -> Result<()> {
    pkgtree::test_utils::init_test_logging(None);
    let dir = tempfile::tempdir()?;
    let path = SnapshotFixture::invalid().write_to(dir.path())?;

    let mut session = Session::new(SiteConfig::default());
    let err = session.load_base(&path).unwrap_err();

    match err.downcast_ref::<PkgTreeError>() {
        Some(PkgTreeError::SnapshotParseError { file, .. }) => {
            assert!(file.contains(SNAPSHOT_FILE_NAME), "unexpected file: {file}");
        }
        other => panic!("expected SnapshotParseError, got {other:?}"),
    }
    Ok(())
}
