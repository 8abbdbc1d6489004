#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # form-value
//!
//! Candidate value model and field paths for form validation.
//!
//! A form-state manager collects whatever the user typed as a [`Values`]
//! mapping: strings at the leaves, nested mappings for grouped fields and
//! lists for repeated ones. Locations inside that mapping are addressed by
//! a [`FieldPath`], an ordered sequence of segments that is only joined to
//! a string at output boundaries.

/// Field path segments and the `a.b[0].c` rendering.
pub mod path;
/// Raw candidate values.
pub mod value;

pub use path::{FieldPath, PathSegment};
pub use value::{Value, Values, get_at_path, insert_at_path, values_from_json};

use thiserror::Error;

/// Errors that can occur when working with values and paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl Error {
    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a type-mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Crate-local result type for value operations.
pub type Result<T> = std::result::Result<T, Error>;
