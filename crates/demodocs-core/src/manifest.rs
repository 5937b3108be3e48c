//! Demo manifest data model.
//!
//! The merged aggregate is serialized as a single JSON document with the
//! top-level key `DEMOS`, the artifact every downstream build step consumes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind of asset a demo file provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// JavaScript source.
    Script,

    /// Stylesheet.
    Style,

    /// HTML markup.
    Markup,
}

/// One referenced asset belonging to a demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoFileRef {
    /// Base file name.
    pub name: String,

    /// Asset kind.
    pub file_type: FileKind,

    /// Source-tree path of the file.
    pub input_path: PathBuf,

    /// Destination path, namespaced by module and demo.
    pub output_path: String,
}

impl DemoFileRef {
    /// Build a file reference with its deterministic output path.
    ///
    /// The output path is a pure function of module name, demo id and base
    /// file name; merging the same manifest twice yields identical values.
    #[must_use]
    pub fn new(
        file_type: FileKind,
        input_path: PathBuf,
        module_name: &str,
        demo_id: &str,
    ) -> Self {
        let name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_path = output_path(module_name, demo_id, &name);
        Self {
            name,
            file_type,
            input_path,
            output_path,
        }
    }
}

/// Compute the destination path for a demo asset.
#[must_use]
pub fn output_path(module_name: &str, demo_id: &str, file_name: &str) -> String {
    format!("demo-partials/{module_name}/{demo_id}/{file_name}")
}

/// Runtime module a demo bootstraps, used only for style scoping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeModule {
    /// Runtime module name.
    pub name: String,
}

/// One demo within a module. Constructed once during merge, immutable after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoEntry {
    /// Identifier, unique within its module.
    pub id: String,

    /// Runtime module the demo bootstraps.
    pub ng_module: RuntimeModule,

    /// Script files, in manifest order.
    pub js: Vec<DemoFileRef>,

    /// Style files, in manifest order.
    pub css: Vec<DemoFileRef>,

    /// Markup files, in manifest order, excluding the entry page.
    pub html: Vec<DemoFileRef>,

    /// The entry page: the file literally named `index.html`.
    pub index: DemoFileRef,
}

/// One documented module and its demos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    /// Module name, unique across the aggregate.
    pub name: String,

    /// Source directory the manifest was read from.
    pub manifest_path: PathBuf,

    /// Demos, in input order across all folded records.
    pub demos: Vec<DemoEntry>,
}

/// The complete merged manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateManifest {
    /// All merged modules.
    #[serde(rename = "DEMOS")]
    pub modules: Vec<ModuleManifest>,
}

impl AggregateManifest {
    /// Serialize the aggregate as the `{"DEMOS": [...]}` JSON artifact.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an aggregate from its JSON artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse the aggregate artifact from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Total number of demos across all modules.
    #[must_use]
    pub fn demo_count(&self) -> usize {
        self.modules.iter().map(|m| m.demos.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ref() -> DemoFileRef {
        DemoFileRef::new(
            FileKind::Script,
            PathBuf::from("src/demo/button/a.js"),
            "button",
            "basic",
        )
    }

    #[test]
    fn test_output_path_is_pure() {
        let a = sample_ref();
        let b = sample_ref();
        assert_eq!(a.output_path, "demo-partials/button/basic/a.js");
        assert_eq!(a.output_path, b.output_path);
    }

    #[test]
    fn test_file_ref_base_name() {
        let r = sample_ref();
        assert_eq!(r.name, "a.js");
        assert_eq!(r.file_type, FileKind::Script);
    }

    #[test]
    fn test_aggregate_json_shape() {
        let aggregate = AggregateManifest {
            modules: vec![ModuleManifest {
                name: "button".to_string(),
                manifest_path: PathBuf::from("src/demo/button"),
                demos: vec![DemoEntry {
                    id: "basic".to_string(),
                    ng_module: RuntimeModule {
                        name: "btnDemo".to_string(),
                    },
                    js: vec![sample_ref()],
                    css: vec![],
                    html: vec![],
                    index: DemoFileRef::new(
                        FileKind::Markup,
                        PathBuf::from("src/demo/button/index.html"),
                        "button",
                        "basic",
                    ),
                }],
            }],
        };

        let json = aggregate.to_json().expect("serialize");
        assert!(json.contains("\"DEMOS\""));
        assert!(json.contains("\"fileType\": \"script\""));
        assert!(json.contains("\"ngModule\""));

        let parsed = AggregateManifest::from_json(&json).expect("parse");
        assert_eq!(parsed, aggregate);
        assert_eq!(parsed.demo_count(), 1);
    }
}
