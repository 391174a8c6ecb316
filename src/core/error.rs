//! Error handling for calcdeps
//!
//! This module provides the error types and user-friendly error reporting for
//! the resolver. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`CalcDepsError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Discovery and parsing**: [`CalcDepsError::Parse`],
//!   [`CalcDepsError::DirectoryNotReadable`], [`CalcDepsError::Io`]
//! - **Resolution**: [`CalcDepsError::DuplicateProvide`],
//!   [`CalcDepsError::MissingRequire`], [`CalcDepsError::CircularDependency`]
//!
//! Every resolution-phase error is fatal to the whole pass: the resolver never
//! produces a partial ordering. The caller gets the full message (offending
//! paths and symbol names included) and no output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use calcdeps::core::{CalcDepsError, user_friendly_error};
//!
//! fn resolve_something() -> Result<(), CalcDepsError> {
//!     Err(CalcDepsError::MissingRequire {
//!         file: "src/app.js".to_string(),
//!         symbol: "goog.dom".to_string(),
//!     })
//! }
//!
//! match resolve_something() {
//!     Ok(()) => println!("resolved"),
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display(); // Colored error with a suggestion
//!     }
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for calcdeps operations
///
/// Each variant represents a specific failure mode and carries the details a
/// user needs to locate the problem: file paths, line numbers, and symbol
/// names. Messages are written for the person whose build just failed, not
/// only for developers of this tool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcDepsError {
    /// A dependency annotation in a source file is malformed
    ///
    /// Raised when a line starts a provide/require declaration but the
    /// declaration is unterminated or names an invalid symbol. The build
    /// cannot proceed with an unparsable dependency declaration.
    #[error("malformed dependency annotation in {file}:{line}: {message}")]
    Parse {
        /// Path of the file containing the bad annotation
        file: String,
        /// 1-based line number of the annotation
        line: usize,
        /// What was wrong with the declaration
        message: String,
    },

    /// Two files claim to provide the same symbol
    ///
    /// At most one file may provide a given symbol across the whole corpus.
    /// A second declaration is a configuration error and is reported rather
    /// than silently overwriting the first provider.
    #[error("duplicate provide for symbol '{symbol}': declared by both {first} and {second}")]
    DuplicateProvide {
        /// The symbol declared twice
        symbol: String,
        /// The file that declared it first
        first: String,
        /// The file that declared it again
        second: String,
    },

    /// A file requires a symbol no known file provides
    #[error("missing provider for symbol '{symbol}' required by {file}")]
    MissingRequire {
        /// The file whose requirement cannot be satisfied
        file: String,
        /// The symbol with no provider in the corpus
        symbol: String,
    },

    /// The require graph contains a cycle
    ///
    /// The `cycle` field holds the full ordered chain of files forming the
    /// loop, first file repeated at the end to show where it closes.
    #[error("circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency {
        /// Ordered file chain forming the loop
        cycle: Vec<String>,
    },

    /// A directory could not be read during discovery
    #[error("cannot read directory {path}: {reason}")]
    DirectoryNotReadable {
        /// The directory that failed to enumerate
        path: String,
        /// The underlying I/O failure
        reason: String,
    },

    /// A source file could not be read
    #[error("cannot read source file {path}: {reason}")]
    FileNotReadable {
        /// The file that failed to read
        path: String,
        /// The underlying I/O failure
        reason: String,
    },

    /// Generic I/O error
    #[error("IO error: {message}")]
    Io {
        /// Description of the I/O failure
        message: String,
    },
}

impl From<std::io::Error> for CalcDepsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Wrapper that pairs a [`CalcDepsError`] with user-facing context
///
/// The CLI converts every error into an `ErrorContext` before display so the
/// user sees the error itself plus an actionable suggestion and, where
/// helpful, extra details about what the error means.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CalcDepsError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details
    #[must_use]
    pub const fn new(error: CalcDepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions are actionable steps and are rendered in green to draw
    /// attention.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`]
///
/// Known [`CalcDepsError`] variants get a category-specific suggestion;
/// everything else falls back to a generic I/O context so the CLI always has
/// something sensible to display.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(err) = error.downcast_ref::<CalcDepsError>() {
        return create_error_context(err.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        // Keep the full context chain so the offending path survives.
        let ctx = ErrorContext::new(CalcDepsError::Io {
            message: format!("{error:#}"),
        });
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => ctx
                .with_suggestion("Check file ownership or re-run with adequate permissions")
                .with_details("A file or directory in the source tree was not readable"),
            std::io::ErrorKind::NotFound => ctx
                .with_suggestion("Check that the path exists and is spelled correctly")
                .with_details("A file or directory named on the command line could not be found"),
            _ => ctx,
        };
    }

    ErrorContext::new(CalcDepsError::Io {
        message: error.to_string(),
    })
}

fn create_error_context(error: CalcDepsError) -> ErrorContext {
    match &error {
        CalcDepsError::Parse { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Fix the declaration so it matches the form keyword('symbol.name');")
            .with_details(
                "Dependency annotations must be single-line calls naming one quoted symbol",
            ),
        CalcDepsError::DuplicateProvide { symbol, .. } => {
            let suggestion =
                format!("Remove the provide declaration for '{symbol}' from one of the two files");
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details("Each symbol may be provided by exactly one file in the source tree")
        }
        CalcDepsError::MissingRequire { symbol, .. } => {
            let suggestion =
                format!("Add the file providing '{symbol}' to a source root, or remove the require");
            ErrorContext::new(error.clone()).with_suggestion(suggestion)
        }
        CalcDepsError::CircularDependency { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Break the cycle by moving shared symbols into a separate file")
            .with_details("Files cannot be ordered for inclusion when their requires form a loop"),
        CalcDepsError::DirectoryNotReadable { .. } | CalcDepsError::FileNotReadable { .. } => {
            ErrorContext::new(error.clone())
                .with_suggestion("Check that the path exists and is readable")
        }
        CalcDepsError::Io { .. } => ErrorContext::new(error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = CalcDepsError::Parse {
            file: "src/app.js".to_string(),
            line: 12,
            message: "unterminated symbol string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed dependency annotation in src/app.js:12: unterminated symbol string"
        );
    }

    #[test]
    fn test_duplicate_provide_names_both_files() {
        let err = CalcDepsError::DuplicateProvide {
            symbol: "app.util".to_string(),
            first: "a.js".to_string(),
            second: "b.js".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("app.util"));
        assert!(msg.contains("a.js"));
        assert!(msg.contains("b.js"));
    }

    #[test]
    fn test_cycle_message_joins_chain() {
        let err = CalcDepsError::CircularDependency {
            cycle: vec!["a.js".to_string(), "b.js".to_string(), "a.js".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "circular dependency detected: a.js -> b.js -> a.js"
        );
    }

    #[test]
    fn test_user_friendly_error_attaches_suggestion() {
        let err = CalcDepsError::MissingRequire {
            file: "main.js".to_string(),
            symbol: "lib.net".to_string(),
        };
        let ctx = user_friendly_error(anyhow::Error::from(err));
        assert!(ctx.suggestion.is_some());
        assert!(ctx.suggestion.unwrap().contains("lib.net"));
    }

    #[test]
    fn test_error_context_display_format() {
        let ctx = ErrorContext::new(CalcDepsError::Io {
            message: "boom".to_string(),
        })
        .with_suggestion("try again")
        .with_details("it broke");

        let rendered = format!("{ctx}");
        assert!(rendered.contains("IO error: boom"));
        assert!(rendered.contains("Details: it broke"));
        assert!(rendered.contains("Suggestion: try again"));
    }
}
