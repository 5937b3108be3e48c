//! Build configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for demodocs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    pub build: BuildConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Title displayed in the generated docs.
    pub title: String,

    /// Module prefix used when deriving module ids from folder structure.
    #[serde(default)]
    pub module_prefix: Option<String>,

    /// URL path with leading slash that serves the generated documents.
    #[serde(default = "default_url_path")]
    pub url_path: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Base path where the documented sources live.
    pub base_path: PathBuf,

    /// Path where demos are stored. Defaults to `<base_path>/demo`.
    #[serde(default)]
    pub demo_path: Option<PathBuf>,

    /// Directory holding the static application shell.
    #[serde(default)]
    pub app_dir: Option<PathBuf>,

    /// Output path where generated docs are located.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Debug mode: verbose logging, no bundle stripping.
    #[serde(default)]
    pub debug: bool,
}

// Default value functions
fn default_url_path() -> String {
    "/docs".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist/docs")
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering environment
    /// variables with the `DEMODOCS` prefix over the file.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("DEMODOCS").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.build.base_path.as_os_str().is_empty() {
            return Err(CoreError::config("build.base_path cannot be empty"));
        }

        if !self.site.url_path.starts_with('/') {
            tracing::warn!("site.url_path should have a leading slash");
        }

        Ok(())
    }

    /// Resolved path where demo manifests are stored.
    #[must_use]
    pub fn demo_path(&self) -> PathBuf {
        self.build
            .demo_path
            .clone()
            .unwrap_or_else(|| self.build.base_path.join("demo"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> String {
        r#"
[site]
title = "Material Docs"
module_prefix = "material"
url_path = "/docs"

[build]
base_path = "src"
demo_path = "src/components"
output_dir = "dist/docs"
debug = true
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("demodocs.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.title, "Material Docs");
        assert_eq!(config.site.module_prefix.as_deref(), Some("material"));
        assert_eq!(config.site.url_path, "/docs");
        assert_eq!(config.build.base_path, PathBuf::from("src"));
        assert_eq!(config.demo_path(), PathBuf::from("src/components"));
        assert_eq!(config.build.output_dir, PathBuf::from("dist/docs"));
        assert!(config.build.debug);
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("demodocs.toml");
        let minimal_config = r#"
[site]
title = "Minimal Docs"

[build]
base_path = "src"
"#;
        std::fs::write(&config_path, minimal_config).expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.url_path, "/docs");
        assert!(config.site.module_prefix.is_none());
        assert_eq!(config.demo_path(), PathBuf::from("src/demo"));
        assert_eq!(config.build.output_dir, PathBuf::from("dist/docs"));
        assert!(!config.build.debug);
    }

    #[test]
    fn test_config_validation_empty_title() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("demodocs.toml");
        let config_content = r#"
[site]
title = ""

[build]
base_path = "src"
"#;
        std::fs::write(&config_path, config_content).expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("title cannot be empty")
        );
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/demodocs.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
