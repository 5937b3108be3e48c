//! Demodocs Core Library
//!
//! Core types, configuration, and error handling for the demodocs
//! documentation-site build pipeline.

pub mod config;
pub mod error;
pub mod manifest;

pub use config::Config;
pub use error::{CoreError, Result};
pub use manifest::{AggregateManifest, DemoEntry, DemoFileRef, FileKind, ModuleManifest};
