//! Test utilities for calcdeps
//!
//! Helpers shared by unit and integration tests: logging initialization and a
//! fixture builder for annotated JavaScript source trees. Available to
//! integration tests through the `test-utils` feature.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber at most once regardless of how many
/// times it is called. Respects the `RUST_LOG` environment variable if set,
/// or uses the provided level; does nothing when neither is given.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Fixture builder for an annotated JavaScript source tree in a tempdir.
///
/// Every file is written with `goog.provide`/`goog.require` declarations so
/// tests can exercise the full discover → parse → resolve pipeline against a
/// real filesystem.
///
/// # Example
///
/// ```rust,no_run
/// use calcdeps::test_utils::SourceTreeFixture;
///
/// let tree = SourceTreeFixture::new().unwrap();
/// let animal = tree.add_file("animal.js", &["app.Animal"], &[]).unwrap();
/// let bird = tree.add_file("bird.js", &["app.Bird"], &["app.Animal"]).unwrap();
/// assert!(animal.exists() && bird.exists());
/// ```
pub struct SourceTreeFixture {
    temp: TempDir,
}

impl SourceTreeFixture {
    /// Create an empty source tree in a fresh temporary directory.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
        })
    }

    /// Root of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write an annotated source file at `relative` and return its full path.
    ///
    /// Parent directories are created as needed.
    pub fn add_file(
        &self,
        relative: &str,
        provides: &[&str],
        requires: &[&str],
    ) -> std::io::Result<PathBuf> {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::from("// generated test fixture\n");
        for symbol in provides {
            content.push_str(&format!("goog.provide('{symbol}');\n"));
        }
        for symbol in requires {
            content.push_str(&format!("goog.require('{symbol}');\n"));
        }
        content.push_str("\nfunction noop() {}\n");

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a file with arbitrary content at `relative`.
    pub fn add_raw_file(&self, relative: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }
}
