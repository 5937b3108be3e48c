//! Demo manifest discovery and aggregation.
//!
//! Walks the demo root for `*.demo.json` description records and folds them
//! into a single [`AggregateManifest`], normalizing per-demo file lists and
//! promoting the `index.html` entry of each demo.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use demodocs_core::manifest::{
    AggregateManifest, DemoEntry, DemoFileRef, FileKind, ModuleManifest, RuntimeModule,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Manifest merge errors.
#[derive(Debug, Error)]
pub enum MergeError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed manifest record.
    #[error("malformed manifest {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A demo must reference exactly one `index.html`.
    #[error("demo '{demo_id}' in module '{module}' references {count} index.html files, expected exactly one")]
    IndexCardinality {
        module: String,
        demo_id: String,
        count: usize,
    },

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Raw per-directory manifest record as authored.
#[derive(Debug, Deserialize)]
struct RawManifest {
    /// Declared module name. Records without one are not real module
    /// manifests and are dropped.
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    demos: Vec<RawDemo>,
}

/// Raw demo record with plain file path lists.
#[derive(Debug, Deserialize)]
struct RawDemo {
    id: String,

    #[serde(rename = "ngModule")]
    ng_module: RuntimeModule,

    #[serde(default)]
    js: Vec<String>,

    #[serde(default)]
    css: Vec<String>,

    #[serde(default)]
    html: Vec<String>,
}

/// Merges per-directory demo manifests into one aggregate document.
#[derive(Debug)]
pub struct ManifestMerger {
    demo_root: PathBuf,
}

impl ManifestMerger {
    /// Create a merger scanning the given demo root.
    #[must_use]
    pub fn new(demo_root: impl Into<PathBuf>) -> Self {
        Self {
            demo_root: demo_root.into(),
        }
    }

    /// Find all `*.demo.json` manifests under the demo root, in path order.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut manifests = Vec::new();

        if !self.demo_root.exists() {
            debug!(root = %self.demo_root.display(), "demo root does not exist, skipping");
            return Ok(manifests);
        }

        for entry in WalkDir::new(&self.demo_root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.file_name().to_string_lossy().ends_with(".demo.json")
            {
                manifests.push(entry.into_path());
            }
        }

        Ok(manifests)
    }

    /// Merge all discovered manifests into an [`AggregateManifest`].
    ///
    /// Records sharing a module key (the manifest's parent directory,
    /// relative to the demo root) fold their demos into the first-seen
    /// module, in input order.
    pub fn merge(&self) -> Result<AggregateManifest> {
        let paths = self.discover()?;
        info!(count = paths.len(), root = %self.demo_root.display(), "merging demo manifests");

        let mut modules: Vec<ModuleManifest> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for path in paths {
            let content = fs::read_to_string(&path)?;
            let raw: RawManifest =
                serde_json::from_str(&content).map_err(|source| MergeError::Malformed {
                    path: path.clone(),
                    source,
                })?;

            let Some(name) = raw.name else {
                debug!(path = %path.display(), "manifest has no name, dropping");
                continue;
            };

            let manifest_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
            let key = self.module_key(&manifest_dir, &name);

            let slot = match by_key.get(&key) {
                Some(&i) => i,
                None => {
                    modules.push(ModuleManifest {
                        name: name.clone(),
                        manifest_path: manifest_dir.clone(),
                        demos: Vec::new(),
                    });
                    by_key.insert(key, modules.len() - 1);
                    modules.len() - 1
                }
            };

            // The first record seen for a key is the canonical container;
            // later records only contribute demos.
            let module_name = modules[slot].name.clone();
            for raw_demo in raw.demos {
                let demo = normalize_demo(raw_demo, &module_name, &manifest_dir)?;
                modules[slot].demos.push(demo);
            }
        }

        let aggregate = AggregateManifest { modules };
        info!(
            modules = aggregate.modules.len(),
            demos = aggregate.demo_count(),
            "manifest merge complete"
        );
        Ok(aggregate)
    }

    /// Derive the merge key for a manifest from its directory.
    fn module_key(&self, manifest_dir: &Path, declared_name: &str) -> String {
        let rel = manifest_dir
            .strip_prefix(&self.demo_root)
            .unwrap_or(manifest_dir);
        let key = rel.to_string_lossy().replace('\\', "/");
        if key.is_empty() {
            // Manifest sitting directly in the demo root.
            declared_name.to_string()
        } else {
            key
        }
    }
}

/// Normalize one raw demo into a [`DemoEntry`] with resolved file refs.
fn normalize_demo(raw: RawDemo, module_name: &str, manifest_dir: &Path) -> Result<DemoEntry> {
    let js = file_refs(&raw.js, FileKind::Script, manifest_dir, module_name, &raw.id);
    let css = file_refs(&raw.css, FileKind::Style, manifest_dir, module_name, &raw.id);

    let mut html = Vec::new();
    let mut index = None;
    let mut index_count = 0usize;

    for file in &raw.html {
        let file_ref = DemoFileRef::new(
            FileKind::Markup,
            manifest_dir.join(file),
            module_name,
            &raw.id,
        );
        if file_ref.name == "index.html" {
            index_count += 1;
            index = Some(file_ref);
        } else {
            html.push(file_ref);
        }
    }

    let index = match (index, index_count) {
        (Some(index), 1) => index,
        (_, count) => {
            return Err(MergeError::IndexCardinality {
                module: module_name.to_string(),
                demo_id: raw.id,
                count,
            });
        }
    };

    Ok(DemoEntry {
        id: raw.id,
        ng_module: raw.ng_module,
        js,
        css,
        html,
        index,
    })
}

/// Resolve a raw file list into refs with input and output paths.
fn file_refs(
    files: &[String],
    kind: FileKind,
    manifest_dir: &Path,
    module_name: &str,
    demo_id: &str,
) -> Vec<DemoFileRef> {
    files
        .iter()
        .map(|f| DemoFileRef::new(kind, manifest_dir.join(f), module_name, demo_id))
        .collect()
}
