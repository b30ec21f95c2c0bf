//! Header path classification
//!
//! Maps file paths discovered in the build graph to the names of the packages
//! that provide them. The release layout encodes package ownership in the
//! path itself, so classification is a pure string computation over path
//! segments with no filesystem access.
//!
//! # Recognized Layouts
//!
//! In order of application:
//!
//! 1. **Environment headers** under the configured `env_include` root, with
//!    special handling for `hdf5.h`/`hdf5_hl.h`, `mpi.h`, `pdsdata/` and
//!    `boost/` subtrees
//! 2. **Generated Boost headers** at `.../arch/<A>/geninc/boost/<sub>/...`,
//!    mapped through the Boost sub-library table
//! 3. **Generated pdsdata headers** at
//!    `.../arch/<A>/geninc/pdsdata/<sub>/<file>`
//! 4. **Other generated headers** at `.../arch/<A>/geninc/<Package>/...`
//! 5. **Plain release headers** at `.../include/<Package>/<file>`
//!
//! The first rule that produces a name wins. Paths matching no rule are
//! unclassified and contribute nothing to dependency extraction; this is the
//! normal outcome for source files, object files and system headers.
//!
//! # Examples
//!
//! ```
//! use pkgtree::classify::Classifier;
//! use pkgtree::config::SiteConfig;
//! use std::path::Path;
//!
//! let classifier = Classifier::new(&SiteConfig::default());
//!
//! let pkg = classifier.classify(Path::new("release/include/PSEvt/Event.h"));
//! assert_eq!(pkg.as_deref(), Some("PSEvt"));
//!
//! assert_eq!(classifier.classify(Path::new("src/main.cpp")), None);
//! ```

mod rules;

use std::path::{Component, Path};

use crate::config::SiteConfig;

/// Classifies build-graph file paths into providing package names.
///
/// Construction captures the two site-dependent inputs: the environment
/// include root and the Boost.Python package name for the configured Python
/// version. A classifier is immutable and cheap to share.
#[derive(Debug, Clone)]
pub struct Classifier {
    env_include: Option<std::path::PathBuf>,
    boost_python: String,
}

impl Classifier {
    /// Creates a classifier for the given site configuration.
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            env_include: config.env_include.clone(),
            boost_python: config.python.boost_package(),
        }
    }

    /// Returns the name of the package providing `path`, if any rule matches.
    ///
    /// Paths that are not valid UTF-8 are never classified.
    pub fn classify(&self, path: &Path) -> Option<String> {
        let mut segs = Vec::new();
        for component in path.components() {
            if let Component::Normal(s) = component {
                segs.push(s.to_str()?);
            }
        }

        for rule in rules::ORDER {
            if let Some(package) = rule.apply(self, path, &segs) {
                tracing::trace!("{} comes from package {}", path.display(), package);
                return Some(package);
            }
        }
        tracing::trace!("no package identified for {}", path.display());
        None
    }
}
