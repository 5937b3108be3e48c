//! Partial template packaging.
//!
//! Converts the app shell's `partials/**/*.html` files into one JS module
//! that primes `$templateCache`, so the documentation app needs no extra
//! template requests at runtime.

use std::{fs, path::Path};

use thiserror::Error;
use walkdir::WalkDir;

/// Partial packaging errors.
#[derive(Debug, Error)]
pub enum PartialsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for partial packaging.
pub type Result<T> = std::result::Result<T, PartialsError>;

/// Collect `(relative-path, content)` pairs for all `.html` files under
/// `dir`, in path order. Relative paths use forward slashes.
pub fn collect_partials(dir: &Path) -> Result<Vec<(String, String)>> {
    let mut partials = Vec::new();
    if !dir.exists() {
        return Ok(partials);
    }

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|e| e == "html")
        {
            let rel = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            let content = fs::read_to_string(entry.path())?;
            partials.push((rel, content));
        }
    }

    Ok(partials)
}

/// Emit the `$templateCache` priming module for the given partials.
#[must_use]
pub fn templates_module(module_name: &str, prefix: &str, partials: &[(String, String)]) -> String {
    let mut out = format!(
        "angular.module({}, []).run([\"$templateCache\", function ($templateCache) {{\n",
        js_string(module_name)
    );
    for (rel, content) in partials {
        out.push_str(&format!(
            "  $templateCache.put({}, {});\n",
            js_string(&format!("{prefix}{rel}")),
            js_string(content)
        ));
    }
    out.push_str("}]);\n");
    out
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
