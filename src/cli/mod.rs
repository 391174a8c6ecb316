//! Command-line interface for calcdeps.
//!
//! The binary wires the library pipeline together: discover candidate files
//! under the `--path` roots, parse their dependency annotations, build the
//! resolver, and print the dependency-correct inclusion order in the
//! requested output mode.
//!
//! # Usage
//!
//! ```bash
//! # Ordered file list for two entry points
//! calcdeps --path src --input src/main.js --input src/admin.js
//!
//! # Script tags for a test page, base file first
//! calcdeps --path src --path vendor --input test/all_tests.js \
//!     --base vendor/base.js --output script
//!
//! # Registration lines for every discovered file
//! calcdeps --path src --output register
//! ```
//!
//! When no `--input` is given every discovered file is included, in
//! path-sorted order, as if each were its own entry point.
//!
//! # Verbosity
//!
//! `--verbose` maps to debug-level logging, `--quiet` suppresses everything
//! but errors; otherwise `RUST_LOG` is honored. Logs go to stderr so output
//! modes stay pipeable.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::annotation::{AnnotationReader, AnnotationSyntax};
use crate::core::CalcDepsError;
use crate::dependency::DependencyInfo;
use crate::resolver::DependencyResolver;
use crate::walker::DirectoryWalker;

/// Upper bound on concurrently open source files during parsing.
const PARSE_CONCURRENCY: usize = 32;

/// How the resolved ordering is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// One file path per line.
    List,
    /// One `<script>` include directive per file.
    Script,
    /// One `register(...)` debug line per file, for test-harness generators.
    Register,
}

/// Compute a dependency-correct inclusion order for annotated JavaScript
/// sources.
#[derive(Parser, Debug)]
#[command(
    name = "calcdeps",
    about = "Order annotated JavaScript sources so every file follows its dependencies",
    version,
    long_about = "calcdeps scans source trees for provide/require annotations and emits a \
                  deterministic file ordering suitable for script-tag inclusion or concatenation."
)]
pub struct Cli {
    /// Source root directory to scan recursively. Repeatable.
    #[arg(short = 'p', long = "path", value_name = "DIR", required = true)]
    paths: Vec<PathBuf>,

    /// Entry file seeding the resolution. Repeatable; order is preserved in
    /// the output. Without any input, every discovered file is included.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Base file placed at index 0, assumed dependency-free.
    #[arg(short = 'b', long, value_name = "FILE")]
    base: Option<PathBuf>,

    /// Also append corpus files not reachable from any input.
    #[arg(long)]
    all: bool,

    /// File extension to keep during discovery. Repeatable.
    #[arg(short = 'e', long, value_name = "EXT", default_value = "js")]
    extension: Vec<String>,

    /// Output mode.
    #[arg(short = 'o', long, value_enum, default_value_t = OutputMode::List)]
    output: OutputMode,

    /// Keyword opening a provide declaration.
    #[arg(long, value_name = "KEYWORD", default_value = "goog.provide")]
    provide_keyword: String,

    /// Keyword opening a require declaration.
    #[arg(long, value_name = "KEYWORD", default_value = "goog.require")]
    require_keyword: String,

    /// Enable debug output.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Run the full discover → parse → resolve → print pipeline.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let inputs = canonicalize_all(&self.inputs)?;
        let base = self
            .base
            .as_deref()
            .map(|p| canonicalize(p))
            .transpose()?;

        let walker = DirectoryWalker::new(self.extension.clone());
        let mut files = walker.walk(&self.paths)?;
        debug!(discovered = files.len(), "discovery complete");

        // Entry files outside the scanned roots still join the corpus.
        for input in &inputs {
            if !files.contains(input) {
                files.push(input.clone());
            }
        }

        let syntax = AnnotationSyntax {
            provide_keyword: self.provide_keyword.clone(),
            require_keyword: self.require_keyword.clone(),
        };
        let corpus = parse_corpus(files, AnnotationReader::new(syntax)).await?;

        let resolver = DependencyResolver::new(corpus)?;
        let include_all = self.all || inputs.is_empty();
        let order = resolver.resolve(&inputs, base.as_deref(), include_all)?;

        self.print_order(&resolver, &order)?;
        Ok(())
    }

    fn print_order(&self, resolver: &DependencyResolver, order: &[PathBuf]) -> Result<()> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        for file in order {
            match self.output {
                OutputMode::List => println!("{}", file.display()),
                OutputMode::Script => {
                    println!("<script src=\"{}\"></script>", file.display());
                }
                OutputMode::Register => {
                    // The base file may sit outside the corpus; it registers
                    // with empty symbol lists.
                    let line = match resolver.info(file) {
                        Some(info) => info.registration_line(&cwd),
                        None => DependencyInfo::new(file.clone()).registration_line(&cwd),
                    };
                    println!("{line}");
                }
            }
        }
        Ok(())
    }

    fn init_logging(&self) {
        let filter = if self.quiet {
            EnvFilter::new("error")
        } else if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Parse every file's annotations concurrently.
///
/// Reads are bounded by [`PARSE_CONCURRENCY`]; each file produces an
/// independent [`DependencyInfo`] with no shared state. The merge happens
/// afterwards as a single-threaded step over every outcome, sorted by file
/// path, so both the corpus order and which failure gets reported are
/// deterministic regardless of completion order.
async fn parse_corpus(
    files: Vec<PathBuf>,
    reader: AnnotationReader,
) -> Result<Vec<DependencyInfo>> {
    let outcomes: Vec<(PathBuf, crate::core::Result<DependencyInfo>)> = stream::iter(files)
        .map(|file| {
            let reader = reader.clone();
            async move {
                let result = match tokio::fs::read_to_string(&file).await {
                    Ok(text) => reader.parse_source(file.clone(), &text),
                    Err(err) => Err(CalcDepsError::FileNotReadable {
                        path: file.display().to_string(),
                        reason: err.to_string(),
                    }),
                };
                (file, result)
            }
        })
        .buffer_unordered(PARSE_CONCURRENCY)
        .collect()
        .await;

    // Barrier: every parse has completed. Failures are reported from the
    // lexicographically-first failing path, never in completion order.
    let mut corpus = Vec::with_capacity(outcomes.len());
    let mut failures: Vec<(PathBuf, CalcDepsError)> = Vec::new();
    for (file, result) in outcomes {
        match result {
            Ok(info) => corpus.push(info),
            Err(err) => failures.push((file, err)),
        }
    }
    if let Some((_, err)) = failures.into_iter().min_by(|a, b| a.0.cmp(&b.0)) {
        return Err(err.into());
    }

    corpus.sort_by(|a, b| a.file().cmp(b.file()));
    Ok(corpus)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("cannot resolve path {}", path.display()))
}

fn canonicalize_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    paths.iter().map(|p| canonicalize(p)).collect()
}
