//! Core types and error handling shared across the crate.
//!
//! This module hosts the crate-wide error taxonomy and its user-facing
//! presentation layer. Everything else in the crate reports failures through
//! [`CalcDepsError`]; the CLI turns them into colored, suggestion-bearing
//! output via [`ErrorContext`] and [`user_friendly_error`].

pub mod error;

pub use error::{CalcDepsError, ErrorContext, user_friendly_error};

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CalcDepsError>;
