//! Demo file routing.
//!
//! Builds a reverse index from each referenced input file to the demos that
//! claim it, then relocates each file into an output path namespaced by
//! module and demo id. Stylesheets are rewritten so their selectors only
//! apply within the claiming demo's container.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use demodocs_core::manifest::{AggregateManifest, DemoEntry};
use thiserror::Error;
use tracing::debug;

use crate::cssscope::scope_css;

/// Routing errors.
#[derive(Debug, Error)]
pub enum RouteError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A claimed source file could not be read.
    #[error("missing demo source file: {0}")]
    MissingSource(PathBuf),

    /// Aggregate artifact could not be loaded.
    #[error("failed to load aggregate manifest: {0}")]
    Manifest(#[from] demodocs_core::CoreError),
}

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RouteError>;

/// Ownership of one input file by one demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteClaim {
    /// Owning module name.
    pub module_name: String,

    /// Owning demo id.
    pub demo_id: String,

    /// Runtime module name, used as the CSS scope class.
    pub ng_module_name: String,
}

/// Reverse index from input path to the demos claiming it.
///
/// Built once per pipeline run from the aggregate manifest, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteIndex {
    claims: BTreeMap<PathBuf, Vec<RouteClaim>>,
}

impl RouteIndex {
    /// Build the index by walking every module, demo, and file reference.
    #[must_use]
    pub fn from_aggregate(aggregate: &AggregateManifest) -> Self {
        let mut claims: BTreeMap<PathBuf, Vec<RouteClaim>> = BTreeMap::new();

        for module in &aggregate.modules {
            for demo in &module.demos {
                let claim = RouteClaim {
                    module_name: module.name.clone(),
                    demo_id: demo.id.clone(),
                    ng_module_name: demo.ng_module.name.clone(),
                };
                for input_path in demo_inputs(demo) {
                    claims
                        .entry(input_path.to_path_buf())
                        .or_default()
                        .push(claim.clone());
                }
            }
        }

        Self { claims }
    }

    /// Build the index from the on-disk aggregate artifact.
    pub fn from_file(path: &Path) -> Result<Self> {
        let aggregate = AggregateManifest::from_file(path)?;
        Ok(Self::from_aggregate(&aggregate))
    }

    /// All claimed input paths, in deterministic order.
    pub fn sources(&self) -> impl Iterator<Item = &Path> {
        self.claims.keys().map(PathBuf::as_path)
    }

    /// Claims for one input path; empty when the file is unclaimed.
    #[must_use]
    pub fn claims(&self, path: &Path) -> &[RouteClaim] {
        self.claims.get(path).map_or(&[], Vec::as_slice)
    }

    /// Number of claimed input paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether no file is claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Every file reference of a demo, entry page included.
fn demo_inputs(demo: &DemoEntry) -> impl Iterator<Item = &Path> {
    demo.js
        .iter()
        .chain(&demo.css)
        .chain(&demo.html)
        .chain(std::iter::once(&demo.index))
        .map(|f| f.input_path.as_path())
}

/// One relocated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedFile {
    /// Destination path, relative to the routing output root.
    pub path: PathBuf,

    /// File contents, possibly rewritten.
    pub contents: Vec<u8>,
}

/// Routes files through a [`RouteIndex`] into their output locations.
#[derive(Debug)]
pub struct FileRouter<'a> {
    index: &'a RouteIndex,
    source_root: PathBuf,
}

impl<'a> FileRouter<'a> {
    /// Create a router. `source_root` anchors unclaimed pass-through paths.
    #[must_use]
    pub fn new(index: &'a RouteIndex, source_root: impl Into<PathBuf>) -> Self {
        Self {
            index,
            source_root: source_root.into(),
        }
    }

    /// Route one file into zero-or-more output copies.
    ///
    /// Unclaimed files pass through unchanged at their source-relative path.
    /// Claimed files fan out into one copy per claim, relocated under
    /// `<module>/<demo>/<name>`; stylesheet copies are scoped under the
    /// claim's runtime module name.
    #[must_use]
    pub fn route(&self, path: &Path, contents: &[u8]) -> Vec<RoutedFile> {
        let claims = self.index.claims(path);

        if claims.is_empty() {
            let rel = path.strip_prefix(&self.source_root).unwrap_or(path);
            debug!(path = %path.display(), "unclaimed file, passing through");
            return vec![RoutedFile {
                path: rel.to_path_buf(),
                contents: contents.to_vec(),
            }];
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_css = path.extension().is_some_and(|e| e == "css");

        claims
            .iter()
            .map(|claim| {
                let out = PathBuf::from(&claim.module_name)
                    .join(&claim.demo_id)
                    .join(&file_name);

                let contents = if is_css {
                    let css = String::from_utf8_lossy(contents);
                    scope_css(&css, &claim.ng_module_name).into_bytes()
                } else {
                    contents.to_vec()
                };

                debug!(
                    src = %path.display(),
                    dest = %out.display(),
                    "routed demo file"
                );
                RoutedFile {
                    path: out,
                    contents,
                }
            })
            .collect()
    }

    /// Read every claimed source from disk and route it.
    pub fn route_sources(&self) -> Result<Vec<RoutedFile>> {
        let mut routed = Vec::new();
        for source in self.index.sources() {
            let contents = std::fs::read(source).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RouteError::MissingSource(source.to_path_buf())
                } else {
                    RouteError::Io(e)
                }
            })?;
            routed.extend(self.route(source, &contents));
        }
        Ok(routed)
    }
}
