//! Validation issues and outcomes

use std::fmt;

use form_value::{FieldPath, Value};
use serde::Serialize;

/// Kind of constraint an [`Issue`] reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Value missing or of the wrong shape
    InvalidType,
    /// Below a minimum length or item count
    TooSmall,
    /// Above a maximum length or item count
    TooBig,
    /// Pattern or format mismatch
    InvalidString,
    /// Strict object received undeclared keys
    UnrecognizedKeys,
    /// Refinement predicate failed
    Custom,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::TooSmall => "too_small",
            IssueCode::TooBig => "too_big",
            IssueCode::InvalidString => "invalid_string",
            IssueCode::UnrecognizedKeys => "unrecognized_keys",
            IssueCode::Custom => "custom",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: FieldPath,
    pub code: IssueCode,
    pub message: String,
}

impl Issue {
    pub fn new(path: FieldPath, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            code,
            message: message.into(),
        }
    }

    /// Issue for a missing required field
    pub fn required(path: FieldPath) -> Self {
        Self::new(path, IssueCode::InvalidType, "Required")
    }

    /// Issue for a value of the wrong shape
    pub fn invalid_type(path: FieldPath, expected: &str, received: &Value) -> Self {
        Self::new(
            path,
            IssueCode::InvalidType,
            format!("Expected {expected}, received {}", received.type_name()),
        )
    }
}

/// Result of running a schema over a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The value conforms; `data` is the parsed and normalized value
    Valid { data: Value },
    /// The value was rejected; issues are in evaluation order
    Invalid { issues: Vec<Issue> },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    pub fn issues(&self) -> &[Issue] {
        match self {
            ValidationOutcome::Valid { .. } => &[],
            ValidationOutcome::Invalid { issues } => issues,
        }
    }
}
