//! Build orchestration.
//!
//! Sequences the documentation build steps in dependency order: clean
//! output, app shell, index page, runtime constant modules, doc
//! extraction, demo manifest merge, demo file routing, and the final JS/CSS
//! bundles. Steps run single-threaded; a failing step aborts the run.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use demodocs_core::Config;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    bundle::{BundleError, Bundler},
    constants::constant_module,
    extract::{DocExtractor, ExtractError},
    merger::{ManifestMerger, MergeError},
    partials::{PartialsError, collect_partials, templates_module},
    router::{FileRouter, RouteError, RouteIndex},
    template::{DEFAULT_INDEX_TEMPLATE, Template, TemplateContext, TemplateError},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest merge error.
    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    /// File routing error.
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    /// Bundle error.
    #[error("bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Partial packaging error.
    #[error("partials error: {0}")]
    Partials(#[from] PartialsError),

    /// Doc extraction error.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] demodocs_core::CoreError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of merged modules.
    pub modules: usize,

    /// Number of demos across all modules.
    pub demos: usize,

    /// Number of routed demo file copies.
    pub routed_files: usize,

    /// Number of extracted comment records.
    pub records: usize,

    /// Total bytes across the three bundles.
    pub bundle_bytes: u64,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the documentation build.
pub struct Builder {
    config: Config,
    extractor: Option<Box<dyn DocExtractor>>,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            extractor: None,
        }
    }

    /// Attach a documentation extraction engine.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn DocExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Execute the full build.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();
        let out = self.config.build.output_dir.clone();

        info!(
            base = %self.config.build.base_path.display(),
            out = %out.display(),
            "starting docs build"
        );

        // 1. Clean output directory
        self.clean_output(&out)?;

        // 2. App shell and index page
        self.copy_app_shell(&out)?;
        self.render_index(&out)?;

        // 3. Runtime constant modules and partial templates
        self.write_config_module(&out)?;
        self.write_templates_module(&out)?;

        // 4. Doc extraction
        stats.records = self.run_extraction(&out)?;

        // 5. Demo manifest merge and data module
        let aggregate = ManifestMerger::new(self.config.demo_path()).merge()?;
        stats.modules = aggregate.modules.len();
        stats.demos = aggregate.demo_count();

        let js_dir = out.join("js");
        fs::create_dir_all(&js_dir)?;
        fs::write(js_dir.join("demo-data.json"), aggregate.to_json()?)?;

        let demos_value = serde_json::to_value(&aggregate.modules)?;
        fs::write(
            js_dir.join("demo-data.js"),
            constant_module("docsApp.demo-data", &[("DEMOS", &demos_value)]),
        )?;

        // 6. Route demo files
        let route_index = RouteIndex::from_aggregate(&aggregate);
        let router = FileRouter::new(&route_index, self.config.demo_path());
        let partials_dir = out.join("demo-partials");
        for routed in router.route_sources()? {
            let dest = partials_dir.join(&routed.path);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, &routed.contents)?;
            stats.routed_files += 1;
        }

        // 7. Bundles
        let bundler = Bundler::new(!self.config.build.debug);
        stats.bundle_bytes +=
            bundler.bundle(&partials_dir, "js", &out.join("docs-demo-scripts.js"))?;
        stats.bundle_bytes += bundler.bundle(&js_dir, "js", &out.join("docs.js"))?;
        stats.bundle_bytes += bundler.bundle(&out.join("css"), "css", &out.join("docs.css"))?;

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            modules = stats.modules,
            demos = stats.demos,
            routed_files = stats.routed_files,
            records = stats.records,
            bundle_bytes = stats.bundle_bytes,
            duration_ms = stats.duration_ms,
            "docs build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self, out: &Path) -> Result<()> {
        if out.exists() {
            debug!(dir = %out.display(), "cleaning output directory");
            fs::remove_dir_all(out)?;
        }
        fs::create_dir_all(out)?;
        Ok(())
    }

    /// Copy app shell files, excluding partial templates and the index page.
    fn copy_app_shell(&self, out: &Path) -> Result<()> {
        let Some(app_dir) = &self.config.build.app_dir else {
            return Ok(());
        };
        if !app_dir.exists() {
            debug!(dir = %app_dir.display(), "app shell directory does not exist, skipping");
            return Ok(());
        }

        for entry in WalkDir::new(app_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(app_dir).unwrap_or(entry.path());

            // index.html is templated separately; partial templates are
            // packaged into templates.js instead of copied.
            if rel == Path::new("index.html") {
                continue;
            }
            if rel.starts_with("partials") && rel.extension().is_some_and(|e| e == "html") {
                continue;
            }

            let dest = out.join(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
        }

        Ok(())
    }

    /// Render the index page from the shell template (or the built-in one).
    fn render_index(&self, out: &Path) -> Result<()> {
        let shell_index = self
            .config
            .build
            .app_dir
            .as_ref()
            .map(|d| d.join("index.html"));

        let source = match shell_index {
            Some(path) if path.exists() => fs::read_to_string(path)?,
            _ => DEFAULT_INDEX_TEMPLATE.to_string(),
        };

        let mut ctx = TemplateContext::new()
            .with_var("title", &self.config.site.title)
            .with_var("url_path", &self.config.site.url_path);
        if let Some(prefix) = &self.config.site.module_prefix {
            ctx.insert("module_prefix", prefix);
        }

        let html = Template::new(source).render(&ctx)?;
        fs::write(out.join("index.html"), html)?;
        Ok(())
    }

    /// Write the config constant module consumed by the docs app.
    fn write_config_module(&self, out: &Path) -> Result<()> {
        let js_dir = out.join("js");
        fs::create_dir_all(&js_dir)?;

        let config_value = serde_json::to_value(&self.config)?;
        fs::write(
            js_dir.join("config-data.js"),
            constant_module("docsApp.config-data", &[("CONFIG", &config_value)]),
        )?;
        Ok(())
    }

    /// Package shell partial templates into a `$templateCache` module.
    fn write_templates_module(&self, out: &Path) -> Result<()> {
        let Some(app_dir) = &self.config.build.app_dir else {
            return Ok(());
        };

        let partials = collect_partials(&app_dir.join("partials"))?;
        if partials.is_empty() {
            return Ok(());
        }

        let js_dir = out.join("js");
        fs::create_dir_all(&js_dir)?;
        fs::write(
            js_dir.join("templates.js"),
            templates_module("docsApp.templates", "partials/", &partials),
        )?;
        Ok(())
    }

    /// Run the extraction engine, if attached, and persist its records.
    fn run_extraction(&self, out: &Path) -> Result<usize> {
        let Some(extractor) = &self.extractor else {
            return Ok(0);
        };

        let records = extractor.extract(&self.config.build.base_path)?;
        let js_dir = out.join("js");
        fs::create_dir_all(&js_dir)?;
        fs::write(
            js_dir.join("docs-data.json"),
            serde_json::to_string_pretty(&records)?,
        )?;

        info!(records = records.len(), "doc extraction complete");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use demodocs_core::config::{BuildConfig, SiteConfig};
    use tempfile::TempDir;

    use super::*;

    fn test_config(base: &Path, out: &Path) -> Config {
        Config {
            site: SiteConfig {
                title: "Test Docs".to_string(),
                module_prefix: None,
                url_path: "/docs".to_string(),
            },
            build: BuildConfig {
                base_path: base.to_path_buf(),
                demo_path: None,
                app_dir: None,
                output_dir: out.to_path_buf(),
                debug: false,
            },
        }
    }

    #[test]
    fn test_build_empty_tree() {
        let base = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let out_dir = out.path().join("docs");

        let stats = Builder::new(test_config(base.path(), &out_dir))
            .build()
            .unwrap();

        assert_eq!(stats.modules, 0);
        assert_eq!(stats.routed_files, 0);
        assert!(out_dir.join("index.html").exists());
        assert!(out_dir.join("js/config-data.js").exists());
        assert!(out_dir.join("js/demo-data.json").exists());
        assert!(out_dir.join("docs.js").exists());
    }

    #[test]
    fn test_build_renders_default_index() {
        let base = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let out_dir = out.path().join("docs");

        Builder::new(test_config(base.path(), &out_dir))
            .build()
            .unwrap();

        let index = fs::read_to_string(out_dir.join("index.html")).unwrap();
        assert!(index.contains("<title>Test Docs</title>"));
        assert!(index.contains("<base href=\"/docs/\">"));
    }

    #[test]
    fn test_clean_output_removes_stale_files() {
        let base = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let out_dir = out.path().join("docs");

        fs::create_dir_all(&out_dir).unwrap();
        fs::write(out_dir.join("stale.txt"), "old").unwrap();

        Builder::new(test_config(base.path(), &out_dir))
            .build()
            .unwrap();

        assert!(!out_dir.join("stale.txt").exists());
    }

    #[test]
    fn test_build_stats_default() {
        let stats = BuildStats::default();
        assert_eq!(stats.modules, 0);
        assert_eq!(stats.duration_ms, 0);
    }
}
