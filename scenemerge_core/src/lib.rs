//! `scenemerge_core` is the core library for the scenemerge tool. It
//! resolves textual injection directives across a set of XML source
//! fragments and produces fully merged output documents.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Resource directory
//!   → Discovery (walks the tree, collects prefixed fragment files)
//!   → Directive parser (scans fragment text for injection tags)
//!   → Source map (name → fragment, built once per run)
//!   → Resolver (depth-first substitution, cycle detection, markers)
//!   → Output writer (prefix-stripped path beside the source)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `scenemerge.toml`: marker
//!   prefix, resource directory, root element, document header.
//! - [`parser`] — Directive scanning for both the `<inject src="name"/>`
//!   tag form and the legacy `__merge__(name)` form, comment-aware.
//! - [`project`] — Fragment discovery, source-map construction, and the
//!   top-level merge driver with its output writer.
//!
//! ## Key Types
//!
//! - [`SourceFile`] — One discovered fragment with its raw and resolved
//!   text and tri-state resolution flag.
//! - [`SourceMap`] — Name-keyed fragment lookup driving recursive
//!   resolution.
//! - [`InjectionDirective`] — A parsed injection reference with its target
//!   name and captured indentation.
//! - [`MergeConfig`] — Immutable per-run configuration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use scenemerge_core::MergeConfig;
//! use scenemerge_core::merge_sources_for_directory;
//! use scenemerge_core::write_outputs;
//!
//! let root = Path::new(".");
//! let config = MergeConfig::load(root).unwrap();
//! let outcome = merge_sources_for_directory(root, "main", &config).unwrap();
//! write_outputs(&outcome).unwrap();
//! ```

pub use config::*;
pub use error::*;
pub use parser::*;
pub use project::*;
pub use source::*;

pub mod config;
mod error;
pub mod parser;
pub mod project;
mod source;

#[cfg(test)]
mod __fixtures;
