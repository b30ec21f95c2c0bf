//! Ordered classification rules
//!
//! Each rule recognizes one header layout. Rules are applied in [`ORDER`];
//! the first one that produces a package name wins, so specific layouts are
//! listed before general ones.

use std::path::{Component, Path};

use super::Classifier;

/// A single path classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Rule {
    /// Headers under the installed environment's include root.
    Environment,
    /// Generated Boost headers: `.../arch/<A>/geninc/boost/<sub>/...`
    GenincBoost,
    /// Generated pdsdata headers: `.../arch/<A>/geninc/pdsdata/<sub>/<file>`
    GenincPdsdata,
    /// Other generated headers: `.../arch/<A>/geninc/<Package>/...`
    GenincPackage,
    /// Plain release layout: `.../include/<Package>/<file>`
    PlainInclude,
}

/// Application order, most specific layout first.
pub(super) const ORDER: &[Rule] = &[
    Rule::Environment,
    Rule::GenincBoost,
    Rule::GenincPdsdata,
    Rule::GenincPackage,
    Rule::PlainInclude,
];

impl Rule {
    /// Applies this rule to `path`, whose normal components are `segs`.
    pub(super) fn apply(self, cx: &Classifier, path: &Path, segs: &[&str]) -> Option<String> {
        match self {
            Rule::Environment => environment(cx, path),
            Rule::GenincBoost => geninc_boost(cx, segs),
            Rule::GenincPdsdata => geninc_pdsdata(segs),
            Rule::GenincPackage => geninc_package(segs),
            Rule::PlainInclude => plain_include(segs),
        }
    }
}

/// Headers provided by the installed environment itself.
///
/// Matches only when the site configures an environment include root and the
/// path sits under it. A handful of top-level headers map to known runtime
/// packages; `pdsdata/` and `boost/` subtrees map through their own naming
/// schemes. Everything else under the root is deliberately unclassified so
/// that environment-internal headers never become link dependencies.
fn environment(cx: &Classifier, path: &Path) -> Option<String> {
    let root = cx.env_include.as_deref()?;
    let rest = path.strip_prefix(root).ok()?;
    let after: Vec<&str> = rest
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    match after.as_slice() {
        [only] => match *only {
            "hdf5.h" | "hdf5_hl.h" => Some("hdf5".to_string()),
            // openmpi provides the mpi implementation in our environments
            "mpi.h" => Some("openmpi".to_string()),
            _ => None,
        },
        ["pdsdata", "xtc", ..] => Some("pdsdata".to_string()),
        ["pdsdata", sub, ..] => Some(format!("pdsdata_{sub}")),
        ["boost", sub, ..] => Some(boost_sublibrary(cx, sub)),
        _ => None,
    }
}

/// Generated Boost headers under `arch/<A>/geninc/boost/`.
fn geninc_boost(cx: &Classifier, segs: &[&str]) -> Option<String> {
    let g = segs.iter().rposition(|s| *s == "geninc")?;
    if g < 2 || segs[g - 2] != "arch" || segs.get(g + 1) != Some(&"boost") {
        return None;
    }
    segs.get(g + 2).map(|sub| boost_sublibrary(cx, sub))
}

/// Generated pdsdata headers under `arch/<A>/geninc/pdsdata/`.
///
/// The pdsdata distribution builds one library per subdirectory, named
/// `pdsdata_<sub>`, except for `xtc` which lives in the core `pdsdata`
/// library.
fn geninc_pdsdata(segs: &[&str]) -> Option<String> {
    let g = segs.iter().rposition(|s| *s == "geninc")?;
    if g < 2 || segs[g - 2] != "arch" || segs.get(g + 1) != Some(&"pdsdata") {
        return None;
    }
    // needs a file segment beyond the subdirectory; bare directory paths
    // fall through to the generic geninc rule
    if segs.len() <= g + 3 {
        return None;
    }
    let sub = segs[g + 2];
    Some(if sub == "xtc" {
        "pdsdata".to_string()
    } else {
        format!("pdsdata_{sub}")
    })
}

/// Generated headers under `arch/<A>/geninc/<Package>/`.
fn geninc_package(segs: &[&str]) -> Option<String> {
    let g = segs.iter().rposition(|s| *s == "geninc")?;
    if g < 2 || segs[g - 2] != "arch" {
        return None;
    }
    segs.get(g + 1).map(|pkg| (*pkg).to_string())
}

/// Plain release headers: the directory under `include/` names the package.
fn plain_include(segs: &[&str]) -> Option<String> {
    let n = segs.len();
    if n >= 3 && segs[n - 3] == "include" {
        Some(segs[n - 2].to_string())
    } else {
        None
    }
}

/// Maps a Boost subdirectory or top-level header name to the library package
/// providing it. Header-only parts of Boost map to the umbrella `boost`
/// package, which registers no link libraries.
fn boost_sublibrary(cx: &Classifier, sub: &str) -> String {
    match sub {
        "date_time" | "date_time.hpp" => "boost_date_time".to_string(),
        "filesystem" | "filesystem.hpp" => "boost_filesystem".to_string(),
        "iostreams" => "boost_iostreams".to_string(),
        "regex" | "regex.hpp" | "regex.h" | "cregex.hpp" => "boost_regex".to_string(),
        "thread" | "thread.hpp" => "boost_thread".to_string(),
        "test" => "boost_unit_test_framework".to_string(),
        "python" | "python.hpp" => cx.boost_python.clone(),
        _ => "boost".to_string(),
    }
}
