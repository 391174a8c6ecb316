//! Extraction of provide/require annotations from source text.
//!
//! Source files declare their dependency contract through call-like
//! annotations, one symbol per declaration, one declaration per line:
//!
//! ```javascript
//! goog.provide('app.Bird');
//! goog.require('app.Animal');
//! ```
//!
//! Declarations may appear anywhere in the file, not only in a header block,
//! and multiple declarations accumulate. The reader scans text line by line
//! without executing or fully parsing it as code; it is a pure read with no
//! side effects.
//!
//! The keywords themselves are configuration, carried in an explicit
//! [`AnnotationSyntax`] value constructed once at startup and passed down —
//! there is no global registry of recognized keywords.

use regex::Regex;
use std::path::{Path, PathBuf};

use crate::core::{CalcDepsError, Result};
use crate::dependency::DependencyInfo;

/// The annotation keywords a corpus uses to declare provides and requires.
///
/// Defaults to the Closure-style `goog.provide` / `goog.require` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSyntax {
    /// Keyword opening a provide declaration, e.g. `goog.provide`.
    pub provide_keyword: String,
    /// Keyword opening a require declaration, e.g. `goog.require`.
    pub require_keyword: String,
}

impl Default for AnnotationSyntax {
    fn default() -> Self {
        Self {
            provide_keyword: "goog.provide".to_string(),
            require_keyword: "goog.require".to_string(),
        }
    }
}

/// Scanner that extracts a [`DependencyInfo`] from one file's text.
///
/// The declaration patterns are compiled once at construction and reused for
/// every file, so a single reader can be shared across a whole discovery
/// pass.
///
/// # Examples
///
/// ```rust
/// use calcdeps::annotation::{AnnotationReader, AnnotationSyntax};
/// use std::path::PathBuf;
///
/// let reader = AnnotationReader::new(AnnotationSyntax::default());
/// let info = reader
///     .parse_source(
///         PathBuf::from("bird.js"),
///         "goog.provide('app.Bird');\ngoog.require('app.Animal');\n",
///     )
///     .unwrap();
///
/// assert_eq!(info.provides(), ["app.Bird"]);
/// assert_eq!(info.requires(), ["app.Animal"]);
/// ```
#[derive(Debug, Clone)]
pub struct AnnotationReader {
    provide: DeclarationPattern,
    require: DeclarationPattern,
}

/// Compiled recognizer for one declaration keyword.
///
/// `opener` matches any line that starts a declaration with the keyword;
/// `full` additionally demands a complete, well-terminated declaration. A
/// line matching `opener` but not `full` is a malformed annotation.
#[derive(Debug, Clone)]
struct DeclarationPattern {
    opener: Regex,
    full: Regex,
}

impl DeclarationPattern {
    fn compile(keyword: &str) -> Self {
        let kw = regex::escape(keyword);
        // Symbols are non-empty and contain no whitespace or quotes.
        let full = Regex::new(&format!(
            r#"^\s*{kw}\s*\(\s*(?:'([^'"\s]+)'|"([^'"\s]+)")\s*\)\s*;?\s*(?://.*)?$"#
        ))
        .expect("declaration pattern is valid");
        let opener =
            Regex::new(&format!(r"^\s*{kw}\s*\(")).expect("declaration opener is valid");
        Self { opener, full }
    }

    /// Returns the declared symbol, `None` if the line is not a declaration.
    ///
    /// `Err` means the line opens a declaration but never completes it.
    fn match_line(&self, line: &str) -> std::result::Result<Option<String>, String> {
        if let Some(caps) = self.full.captures(line) {
            let symbol = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string());
            return Ok(symbol);
        }
        if self.opener.is_match(line) {
            return Err("unterminated or invalid symbol string".to_string());
        }
        Ok(None)
    }
}

impl AnnotationReader {
    /// Build a reader for the given annotation syntax.
    #[must_use]
    pub fn new(syntax: AnnotationSyntax) -> Self {
        Self {
            provide: DeclarationPattern::compile(&syntax.provide_keyword),
            require: DeclarationPattern::compile(&syntax.require_keyword),
        }
    }

    /// Scan `text` for declarations and assemble the file's record.
    ///
    /// Order of appearance is preserved for both symbol lists. Repeated
    /// declarations of the same symbol accumulate idempotently.
    ///
    /// # Errors
    ///
    /// Returns [`CalcDepsError::Parse`] naming the file and 1-based line
    /// number when a line opens a declaration it never terminates.
    pub fn parse_source(&self, file: PathBuf, text: &str) -> Result<DependencyInfo> {
        let mut info = DependencyInfo::new(file);

        for (index, line) in text.lines().enumerate() {
            match self.provide.match_line(line) {
                Ok(Some(symbol)) => {
                    tracing::trace!(file = %info.file().display(), %symbol, "provide");
                    info.add_provide(symbol);
                    continue;
                }
                Ok(None) => {}
                Err(message) => return Err(self.parse_error(info.file(), index + 1, message)),
            }
            match self.require.match_line(line) {
                Ok(Some(symbol)) => {
                    tracing::trace!(file = %info.file().display(), %symbol, "require");
                    info.add_require(symbol);
                }
                Ok(None) => {}
                Err(message) => return Err(self.parse_error(info.file(), index + 1, message)),
            }
        }

        Ok(info)
    }

    /// Read `path` from disk and scan it.
    ///
    /// # Errors
    ///
    /// Returns [`CalcDepsError::FileNotReadable`] when the file cannot be
    /// read, or [`CalcDepsError::Parse`] for a malformed declaration.
    pub fn parse_file(&self, path: &Path) -> Result<DependencyInfo> {
        let text =
            std::fs::read_to_string(path).map_err(|err| CalcDepsError::FileNotReadable {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        self.parse_source(path.to_path_buf(), &text)
    }

    fn parse_error(&self, file: &Path, line: usize, message: String) -> CalcDepsError {
        CalcDepsError::Parse {
            file: file.display().to_string(),
            line,
            message,
        }
    }
}

impl Default for AnnotationReader {
    fn default() -> Self {
        Self::new(AnnotationSyntax::default())
    }
}
