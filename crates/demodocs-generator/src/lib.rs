//! Demodocs Generator Library
//!
//! Build pipeline for the demodocs documentation site.
//!
//! # Modules
//!
//! - [`merger`] - Demo manifest discovery and aggregation
//! - [`router`] - Demo file routing into namespaced output paths
//! - [`cssscope`] - CSS selector scoping for demo stylesheets
//! - [`bundle`] - JS/CSS bundle concatenation
//! - [`constants`] - Runtime constant-module generation
//! - [`partials`] - Partial template packaging
//! - [`template`] - Shell page template interpolation
//! - [`extract`] - Documentation extraction seam
//! - [`build`] - Build orchestration

pub mod build;
pub mod bundle;
pub mod constants;
pub mod cssscope;
pub mod extract;
pub mod merger;
pub mod partials;
pub mod router;
pub mod template;

pub use build::{BuildStats, Builder};
pub use bundle::Bundler;
pub use cssscope::scope_css;
pub use extract::{CommentRecord, DocExtractor};
pub use merger::ManifestMerger;
pub use router::{FileRouter, RouteClaim, RouteIndex, RoutedFile};
pub use template::{Template, TemplateContext};
