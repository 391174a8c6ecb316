//! Dependency-ordered resolution of annotated source files.
//!
//! This module owns the core algorithm: given the full corpus of
//! [`DependencyInfo`] records, a set of root entry files, and optionally a
//! base file, produce a linear file ordering where every file appears after
//! the files providing the symbols it requires. The ordering is what
//! downstream concatenation and script-tag emission consume, so it must be
//! deterministic for a fixed input set.
//!
//! # Algorithm
//!
//! Construction builds the provide→file index, failing on the first symbol
//! two files both claim to provide. Resolution is a depth-first post-order
//! walk seeded from the roots in caller-declared order:
//!
//! 1. A configured base file is placed at index 0 unconditionally. It is
//!    assumed to be dependency-free infrastructure; its own requires are
//!    never walked.
//! 2. For each file, every required symbol's provider is resolved before the
//!    file itself is appended. An unknown symbol fails the pass with
//!    [`CalcDepsError::MissingRequire`]; re-entering a file already on the
//!    walk stack fails with [`CalcDepsError::CircularDependency`] carrying
//!    the full ordered cycle chain.
//! 3. Corpus files never reached from a root are left out (dead-code
//!    elision) unless include-all mode is requested, in which case leftovers
//!    are appended in path-sorted order, each resolved as its own root.
//!
//! Failures are fatal to the whole pass: there is no partial output.
//!
//! # Examples
//!
//! ```rust
//! use calcdeps::dependency::DependencyInfo;
//! use calcdeps::resolver::DependencyResolver;
//! use std::path::PathBuf;
//!
//! let mut animal = DependencyInfo::new(PathBuf::from("animal.js"));
//! animal.add_provide("app.Animal");
//!
//! let mut bird = DependencyInfo::new(PathBuf::from("bird.js"));
//! bird.add_provide("app.Bird");
//! bird.add_require("app.Animal");
//!
//! let resolver = DependencyResolver::new(vec![animal, bird]).unwrap();
//! let order = resolver
//!     .resolve(&[PathBuf::from("bird.js")], None, false)
//!     .unwrap();
//!
//! assert_eq!(order, [PathBuf::from("animal.js"), PathBuf::from("bird.js")]);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::{CalcDepsError, Result};
use crate::dependency::DependencyInfo;

/// Resolver over one corpus of dependency records.
///
/// The resolver is stateless across calls: every [`resolve`] invocation owns
/// fresh traversal state, so a single resolver may be reused (or shared
/// immutably) for any number of resolution passes over the same corpus.
///
/// [`resolve`]: DependencyResolver::resolve
#[derive(Debug)]
pub struct DependencyResolver {
    /// Every known record, keyed by file path.
    by_file: HashMap<PathBuf, DependencyInfo>,
    /// Corpus files in the order they were registered.
    corpus_order: Vec<PathBuf>,
    /// The provide→file index. Each symbol maps to exactly one provider.
    providers: HashMap<String, PathBuf>,
}

/// Traversal state owned by a single resolution pass.
struct WalkState {
    /// Ordered output so far.
    resolved: Vec<PathBuf>,
    /// Files fully processed (including the base, which is pre-seeded).
    seen: HashSet<PathBuf>,
    /// Files currently on the DFS stack, in walk order, for cycle reporting.
    visiting: Vec<PathBuf>,
}

impl WalkState {
    fn new() -> Self {
        Self {
            resolved: Vec::new(),
            seen: HashSet::new(),
            visiting: Vec::new(),
        }
    }
}

impl DependencyResolver {
    /// Build a resolver from the full corpus, indexing every provided symbol.
    ///
    /// Records for a file already registered are ignored (identity is the
    /// file path; the corpus holds one record per file).
    ///
    /// # Errors
    ///
    /// Returns [`CalcDepsError::DuplicateProvide`] naming both files and the
    /// symbol when two files declare the same provide. Which file counts as
    /// `first` follows corpus order, so callers feeding a sorted corpus get
    /// deterministic reports.
    pub fn new(corpus: Vec<DependencyInfo>) -> Result<Self> {
        let mut by_file = HashMap::new();
        let mut corpus_order = Vec::new();
        let mut providers: HashMap<String, PathBuf> = HashMap::new();

        for info in corpus {
            if by_file.contains_key(info.file()) {
                continue;
            }
            for symbol in info.provides() {
                if let Some(first) = providers.get(symbol) {
                    return Err(CalcDepsError::DuplicateProvide {
                        symbol: symbol.clone(),
                        first: first.display().to_string(),
                        second: info.file().display().to_string(),
                    });
                }
                providers.insert(symbol.clone(), info.file().to_path_buf());
            }
            corpus_order.push(info.file().to_path_buf());
            by_file.insert(info.file().to_path_buf(), info);
        }

        debug!(
            files = corpus_order.len(),
            symbols = providers.len(),
            "indexed dependency corpus"
        );

        Ok(Self {
            by_file,
            corpus_order,
            providers,
        })
    }

    /// Look up the record for `file`, if the corpus contains one.
    #[must_use]
    pub fn info(&self, file: &Path) -> Option<&DependencyInfo> {
        self.by_file.get(file)
    }

    /// Look up the file providing `symbol`, if any.
    #[must_use]
    pub fn provider_of(&self, symbol: &str) -> Option<&Path> {
        self.providers.get(symbol).map(PathBuf::as_path)
    }

    /// Number of files in the corpus.
    #[must_use]
    pub fn corpus_len(&self) -> usize {
        self.corpus_order.len()
    }

    /// Compute the dependency-correct inclusion order.
    ///
    /// `roots` are processed in the given order (first occurrence wins when a
    /// root repeats), so the output is deterministic for a fixed
    /// `(corpus, roots, base)` triple. A root not present in the corpus is
    /// appended as if it declared no requires.
    ///
    /// When `base` is set it occupies index 0 and its requires are not
    /// walked. When `include_all` is set, corpus files not reached from any
    /// root are appended afterwards in path-sorted order, each resolved as
    /// its own root; otherwise they are elided.
    ///
    /// # Errors
    ///
    /// - [`CalcDepsError::MissingRequire`] when a required symbol has no
    ///   provider in the corpus.
    /// - [`CalcDepsError::CircularDependency`] when the require graph loops,
    ///   with the full ordered file chain.
    ///
    /// Any error aborts the pass; no partial ordering is returned.
    pub fn resolve(
        &self,
        roots: &[PathBuf],
        base: Option<&Path>,
        include_all: bool,
    ) -> Result<Vec<PathBuf>> {
        let mut state = WalkState::new();

        if let Some(base) = base {
            state.resolved.push(base.to_path_buf());
            state.seen.insert(base.to_path_buf());
        }

        for root in roots {
            self.resolve_file(root, &mut state)?;
        }

        if include_all {
            let mut leftovers: Vec<&PathBuf> = self
                .corpus_order
                .iter()
                .filter(|file| !state.seen.contains(*file))
                .collect();
            leftovers.sort();
            for file in leftovers {
                self.resolve_file(file, &mut state)?;
            }
        }

        debug!(
            output = state.resolved.len(),
            elided = self.corpus_order.len().saturating_sub(state.resolved.len()),
            "resolution complete"
        );

        Ok(state.resolved)
    }

    /// Depth-first, post-order visit: resolve every provider a file requires,
    /// then append the file itself.
    fn resolve_file(&self, file: &Path, state: &mut WalkState) -> Result<()> {
        if state.seen.contains(file) {
            return Ok(());
        }
        if let Some(start) = state.visiting.iter().position(|f| f == file) {
            let mut cycle: Vec<String> = state.visiting[start..]
                .iter()
                .map(|f| f.display().to_string())
                .collect();
            // Repeat the entry point so the chain shows where it closes.
            cycle.push(file.display().to_string());
            return Err(CalcDepsError::CircularDependency { cycle });
        }

        state.visiting.push(file.to_path_buf());

        match self.by_file.get(file) {
            Some(info) => {
                for symbol in info.requires() {
                    let provider = self.providers.get(symbol).ok_or_else(|| {
                        CalcDepsError::MissingRequire {
                            file: file.display().to_string(),
                            symbol: symbol.clone(),
                        }
                    })?;
                    trace!(
                        file = %file.display(),
                        %symbol,
                        provider = %provider.display(),
                        "resolving require"
                    );
                    self.resolve_file(provider, state)?;
                }
            }
            None => {
                // Entry files outside the discovered corpus carry no known
                // requires; they are still included.
                debug!(file = %file.display(), "root file not in corpus, including as-is");
            }
        }

        state.visiting.pop();
        state.seen.insert(file.to_path_buf());
        state.resolved.push(file.to_path_buf());
        Ok(())
    }
}
