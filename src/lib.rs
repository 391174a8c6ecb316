//! calcdeps - dependency-ordered resolution for annotated JavaScript sources
//!
//! Given a tree of source files annotated with the symbols each file
//! *provides* and *requires*, calcdeps computes a deterministic, topologically
//! valid linear ordering of files suitable for sequential `<script>` inclusion
//! or concatenation.
//!
//! # Pipeline
//!
//! 1. [`walker`] discovers candidate files under one or more source roots,
//!    filtering by extension and skipping hidden entries and symlink cycles.
//! 2. [`annotation`] scans each file's text for provide/require declarations
//!    (`goog.provide('a.b');` style, keywords configurable) and produces one
//!    [`dependency::DependencyInfo`] record per file.
//! 3. [`resolver`] indexes every provided symbol to its single owning file,
//!    then walks the entry files depth-first, emitting each file only after
//!    all files providing its required symbols.
//!
//! The ordered list is the sole output; downstream concatenation or
//! compilation steps consume it as-is.
//!
//! # Guarantees
//!
//! - **Topological validity**: every file appears after the providers of all
//!   symbols it requires.
//! - **Determinism**: the same `(corpus, roots, base)` triple always yields
//!   the identical ordering; entry files are processed in caller order, and
//!   ties fall back to lexicographic path order.
//! - **No partial output**: duplicate provides, missing providers, and
//!   require cycles abort the pass with a typed error naming the offending
//!   files and symbols ([`core::CalcDepsError`]).
//!
//! # Example
//!
//! ```rust
//! use calcdeps::annotation::AnnotationReader;
//! use calcdeps::resolver::DependencyResolver;
//! use std::path::PathBuf;
//!
//! let reader = AnnotationReader::default();
//! let core = reader
//!     .parse_source(PathBuf::from("core.js"), "goog.provide('app.Bird');")
//!     .unwrap();
//! let main = reader
//!     .parse_source(PathBuf::from("main.js"), "goog.require('app.Bird');")
//!     .unwrap();
//!
//! let resolver = DependencyResolver::new(vec![core, main]).unwrap();
//! let order = resolver
//!     .resolve(&[PathBuf::from("main.js")], None, false)
//!     .unwrap();
//! assert_eq!(order, [PathBuf::from("core.js"), PathBuf::from("main.js")]);
//! ```

pub mod annotation;
pub mod cli;
pub mod core;
pub mod dependency;
pub mod resolver;
pub mod walker;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
