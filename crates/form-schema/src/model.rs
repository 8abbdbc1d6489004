//! Schema capability and the closed set of schema variants

use std::sync::Arc;

use form_value::{FieldPath, Value};
use tracing::trace;

use crate::Result;
use crate::array::ArraySchema;
use crate::issue::{Issue, ValidationOutcome};
use crate::object::ObjectSchema;
use crate::string::StringSchema;

/// Something that can validate a candidate value.
///
/// Validation is synchronous and pure. A rejected value is reported as
/// [`ValidationOutcome::Invalid`]; `Err` is reserved for a malformed schema.
pub trait Schema: Send + Sync {
    /// Validate `value`.
    ///
    /// # Errors
    ///
    /// Returns an error when the schema itself is malformed (for example an
    /// uncompilable pattern).
    fn validate(&self, value: &Value) -> Result<ValidationOutcome>;
}

impl<S: Schema + ?Sized> Schema for &S {
    fn validate(&self, value: &Value) -> Result<ValidationOutcome> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn validate(&self, value: &Value) -> Result<ValidationOutcome> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn validate(&self, value: &Value) -> Result<ValidationOutcome> {
        (**self).validate(value)
    }
}

/// Any schema variant
#[derive(Debug, Clone)]
pub enum SchemaNode {
    String(StringSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
}

impl SchemaNode {
    /// Parse `value` located at `path`, appending any issues.
    ///
    /// Returns the parsed value when this subtree produced no issues.
    pub(crate) fn parse(
        &self,
        value: &Value,
        path: &FieldPath,
        issues: &mut Vec<Issue>,
    ) -> Result<Option<Value>> {
        match self {
            SchemaNode::String(schema) => schema.parse(value, path, issues),
            SchemaNode::Object(schema) => schema.parse(value, path, issues),
            SchemaNode::Array(schema) => schema.parse(value, path, issues),
        }
    }

    /// Check the whole subtree for malformed patterns and bounds.
    pub(crate) fn verify(&self, path: &FieldPath) -> Result<()> {
        match self {
            SchemaNode::String(schema) => schema.verify(path),
            SchemaNode::Object(schema) => schema.verify(path),
            SchemaNode::Array(schema) => schema.verify(path),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::String(_) => "string",
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
        }
    }
}

impl From<StringSchema> for SchemaNode {
    fn from(schema: StringSchema) -> Self {
        SchemaNode::String(schema)
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(schema: ObjectSchema) -> Self {
        SchemaNode::Object(schema)
    }
}

impl From<ArraySchema> for SchemaNode {
    fn from(schema: ArraySchema) -> Self {
        SchemaNode::Array(schema)
    }
}

/// Verify the schema, then run a root-level parse and fold the collected
/// issues into an outcome.
pub(crate) fn run_root(
    kind: &str,
    verify: impl FnOnce(&FieldPath) -> Result<()>,
    parse: impl FnOnce(&FieldPath, &mut Vec<Issue>) -> Result<Option<Value>>,
) -> Result<ValidationOutcome> {
    let root = FieldPath::root();
    verify(&root)?;

    let mut issues = Vec::new();
    let parsed = parse(&root, &mut issues)?;

    trace!(kind, issue_count = issues.len(), "schema evaluated");

    match parsed {
        Some(data) if issues.is_empty() => Ok(ValidationOutcome::Valid { data }),
        _ => Ok(ValidationOutcome::Invalid { issues }),
    }
}

impl Schema for SchemaNode {
    fn validate(&self, value: &Value) -> Result<ValidationOutcome> {
        run_root(
            self.kind(),
            |path| self.verify(path),
            |path, issues| self.parse(value, path, issues),
        )
    }
}

impl Schema for StringSchema {
    fn validate(&self, value: &Value) -> Result<ValidationOutcome> {
        run_root(
            "string",
            |path| self.verify(path),
            |path, issues| self.parse(value, path, issues),
        )
    }
}

impl Schema for ObjectSchema {
    fn validate(&self, value: &Value) -> Result<ValidationOutcome> {
        run_root(
            "object",
            |path| self.verify(path),
            |path, issues| self.parse(value, path, issues),
        )
    }
}

impl Schema for ArraySchema {
    fn validate(&self, value: &Value) -> Result<ValidationOutcome> {
        run_root(
            "array",
            |path| self.verify(path),
            |path, issues| self.parse(value, path, issues),
        )
    }
}
