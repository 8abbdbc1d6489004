#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # form-resolver
//!
//! Resolver adapter between a [`form_schema::Schema`] and a form-state
//! manager.
//!
//! [`resolve`] runs the schema over the current field values and returns a
//! [`ResolverResult`]: the parsed values when the schema accepts them, or a
//! mapping from field path to [`FieldError`] when it does not. A rejected
//! value is data, never an `Err`; only a malformed schema produces an error.
//!
//! ## Example Usage
//!
//! ```rust
//! use form_resolver::resolve;
//! use form_schema::{ObjectSchema, StringSchema};
//! use form_value::{Value, Values};
//!
//! let schema = ObjectSchema::new()
//!     .field("username", StringSchema::new().non_empty("username field is required"));
//!
//! let mut values = Values::new();
//! values.insert("username".to_string(), Value::from(""));
//!
//! let result = resolve(&values, &schema).unwrap();
//! assert!(result.values.is_empty());
//! assert_eq!(
//!     result.errors.get("username").map(|e| e.message.as_str()),
//!     Some("username field is required")
//! );
//! ```

pub mod config;
pub mod resolver;
pub mod result;

pub use config::{CriteriaMode, ResolverConfig};
pub use resolver::{Resolver, SchemaResolver, resolve, resolve_with};
pub use result::{FieldError, FieldErrors, ROOT_ERROR_KEY, ResolverResult, VALIDATION_ERROR_TYPE};

use thiserror::Error;

/// Failures of a resolution call that are not validation failures
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema fault: {0}")]
    Schema(#[from] form_schema::Error),

    #[error("Schema produced {found} data where an object was expected")]
    NonObjectData { found: String },

    #[error("Schema rejected the values without reporting any issue")]
    NoIssues,

    #[error("Invalid resolver configuration: {0}")]
    Config(String),
}

/// Alias used by callers that hold errors from several crates
pub type ResolveError = Error;

pub type Result<T> = std::result::Result<T, Error>;
