//! Tests for header path classification through the public API

use std::path::{Path, PathBuf};

use pkgtree::classify::Classifier;
use pkgtree::config::{PythonVersion, SiteConfig};

fn classifier() -> Classifier {
    let config = SiteConfig {
        env_include: Some(PathBuf::from("/sw/env/include")),
        python: PythonVersion::new(3, 7),
        ..SiteConfig::default()
    };
    Classifier::new(&config)
}

/// Every layout a release tree scan can hand us, mapped to the package that
/// owns the header.
#[test]
fn test_release_layout_paths() {
    pkgtree::test_utils::init_test_logging(None);
    let classifier = classifier();

    for (path, expected) in [
        // plain release layout: directory under include/ names the package
        ("release/include/PSEvt/Event.h", Some("PSEvt")),
        ("/abs/release/include/pdsdata/Dgram.hh", Some("pdsdata")),
        // generated headers under the architecture tree
        (
            "release/arch/x86_64-rhel7-opt/geninc/MyDdl/generated.h",
            Some("MyDdl"),
        ),
        (
            "release/arch/x86_64-rhel7-opt/geninc/pdsdata/xtc/Dgram.hh",
            Some("pdsdata"),
        ),
        (
            "release/arch/x86_64-rhel7-opt/geninc/pdsdata/epix/ConfigV1.hh",
            Some("pdsdata_epix"),
        ),
        (
            "release/arch/x86_64-rhel7-opt/geninc/boost/filesystem/path.hpp",
            Some("boost_filesystem"),
        ),
        (
            "release/arch/x86_64-rhel7-opt/geninc/boost/shared_ptr.hpp",
            Some("boost"),
        ),
        // not a header anyone links against
        ("release/src/PSEvt/Event.cpp", None),
        ("Makefile", None),
    ] {
        assert_eq!(
            classifier.classify(Path::new(path)).as_deref(),
            expected,
            "path {path}"
        );
    }
}

/// Headers under the configured environment include root classify through
/// the environment rule even when a release rule would also match.
#[test]
fn test_environment_headers_win_over_release_rules() {
    pkgtree::test_utils::init_test_logging(None);
    let classifier = classifier();

    // the plain include rule alone would classify this as "boost"
    assert_eq!(
        classifier
            .classify(Path::new("/sw/env/include/boost/regex.hpp"))
            .as_deref(),
        Some("boost_regex")
    );
    assert_eq!(
        classifier
            .classify(Path::new("/sw/env/include/hdf5.h"))
            .as_deref(),
        Some("hdf5")
    );
    // unknown environment headers never become link dependencies
    assert_eq!(
        classifier.classify(Path::new("/sw/env/include/zlib.h")),
        None
    );
}

/// The Boost.Python binding package carries the configured runtime version.
#[test]
fn test_boost_python_tracks_configured_runtime() {
    pkgtree::test_utils::init_test_logging(None);

    let config = SiteConfig {
        python: PythonVersion::new(3, 8),
        ..SiteConfig::default()
    };
    let classifier = Classifier::new(&config);

    assert_eq!(
        classifier
            .classify(Path::new(
                "release/arch/x86_64-rhel7-opt/geninc/boost/python/object.hpp"
            ))
            .as_deref(),
        Some("boost_python38")
    );
}

/// Without an environment include root the environment rule is inert and the
/// remaining rules still apply.
#[test]
fn test_classification_without_environment_root() {
    pkgtree::test_utils::init_test_logging(None);
    let classifier = Classifier::new(&SiteConfig::default());

    assert_eq!(
        classifier.classify(Path::new("/sw/env/include/hdf5.h")),
        None
    );
    assert_eq!(
        classifier
            .classify(Path::new("release/include/PSEvt/Event.h"))
            .as_deref(),
        Some("PSEvt")
    );
}
