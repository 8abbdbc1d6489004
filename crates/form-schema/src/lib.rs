#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # form-schema
//!
//! Schema model, validation issues, and schema loading for form values.
//!
//! A [`Schema`] has one capability: validate a candidate [`form_value::Value`]
//! and report either the parsed data or an ordered list of [`Issue`]s.
//! The concrete variants ([`StringSchema`], [`ObjectSchema`],
//! [`ArraySchema`]) are fixed when the schema is built, either in code or
//! through the [`SchemaLoader`].
//!
//! ## Example Usage
//!
//! ```rust
//! use form_schema::{ObjectSchema, Schema, StringSchema, ValidationOutcome};
//! use form_value::Value;
//!
//! let schema = ObjectSchema::new()
//!     .field("username", StringSchema::new().non_empty("username field is required"));
//!
//! let input = Value::from_json(serde_json::json!({ "username": "" })).unwrap();
//! match schema.validate(&input).unwrap() {
//!     ValidationOutcome::Invalid { issues } => {
//!         assert_eq!(issues[0].message, "username field is required");
//!     }
//!     ValidationOutcome::Valid { .. } => unreachable!(),
//! }
//! ```

pub mod array;
pub mod issue;
pub mod loader;
pub mod model;
pub mod object;
pub mod string;

pub use array::ArraySchema;
pub use issue::{Issue, IssueCode, ValidationOutcome};
pub use loader::SchemaLoader;
pub use model::{Schema, SchemaNode};
pub use object::{FieldDefinition, ObjectSchema, Refinement, UnknownKeys};
pub use string::{StringCheck, StringSchema};

use thiserror::Error;

/// Errors raised while loading a schema or by a malformed schema during
/// validation.
///
/// A rejected value is never an error; it is reported as
/// [`ValidationOutcome::Invalid`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid pattern '{pattern}' at '{path}': {reason}")]
    InvalidPattern {
        path: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid bounds at '{path}': minimum {min} exceeds maximum {max}")]
    InvalidBounds { path: String, min: usize, max: usize },

    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
