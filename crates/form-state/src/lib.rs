#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # form-state
//!
//! Headless form-state manager driving a resolver on submit.
//!
//! [`FormState`] owns the registered fields, their current values and the
//! error map. The resolver is passed in at construction; on every
//! [`FormState::handle_submit`] the current values are resolved, errors are
//! stored, and the submit callback runs only when there are none.

pub mod form;

pub use form::{FormState, SubmitOutcome, SubmitStats};

use thiserror::Error;

/// Errors that can occur while driving a form
#[derive(Error, Debug)]
pub enum Error {
    #[error("Resolution failed: {0}")]
    Resolve(#[from] form_resolver::Error),

    #[error(transparent)]
    Value(#[from] form_value::Error),

    #[error("Field '{0}' is not registered")]
    UnregisteredField(String),
}

pub type Result<T> = std::result::Result<T, Error>;
