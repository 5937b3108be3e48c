//! JS/CSS bundle concatenation.
//!
//! Walks an output subtree in path order and joins matching files into one
//! bundle. When stripping is enabled (debug off), blank lines and CSS block
//! comments are dropped; real minifier integration is an external concern.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Bundle errors.
#[derive(Debug, Error)]
pub enum BundleError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Concatenates file trees into single bundles.
#[derive(Debug)]
pub struct Bundler {
    strip: bool,
}

impl Bundler {
    /// Create a bundler. `strip` drops comments and blank lines.
    #[must_use]
    pub fn new(strip: bool) -> Self {
        Self { strip }
    }

    /// Concatenate all files with `ext` under `root` into `out_file`.
    ///
    /// Files are joined in path order so repeated builds produce identical
    /// bundles. Returns the number of bytes written.
    pub fn bundle(&self, root: &Path, ext: &str, out_file: &Path) -> Result<u64> {
        let sources = collect(root, ext)?;
        debug!(root = %root.display(), ext, count = sources.len(), "bundling");

        let mut parts = Vec::with_capacity(sources.len());
        for source in &sources {
            let content = fs::read_to_string(source)?;
            let content = if self.strip {
                match ext {
                    "css" => strip_css(&content),
                    _ => strip_blank_lines(&content),
                }
            } else {
                content
            };
            parts.push(content);
        }

        let bundle = parts.join("\n");
        if let Some(parent) = out_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(out_file, &bundle)?;

        info!(
            out = %out_file.display(),
            files = sources.len(),
            bytes = bundle.len(),
            "bundle written"
        );
        Ok(bundle.len() as u64)
    }
}

/// All files with `ext` under `root`, sorted by path.
fn collect(root: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.exists() {
        return Ok(files);
    }

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|e| e == ext)
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Drop blank lines and trailing whitespace.
fn strip_blank_lines(source: &str) -> String {
    source
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop `/* ... */` comments, then blank lines.
fn strip_css(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(open) = rest.find("/*") {
        out.push_str(&rest[..open]);
        match rest[open..].find("*/") {
            Some(close) => rest = &rest[open + close + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    strip_blank_lines(&out)
}
