//! Object schema

use std::fmt;
use std::sync::Arc;

use form_value::{FieldPath, Value, Values};

use crate::Result;
use crate::issue::{Issue, IssueCode};
use crate::model::SchemaNode;

/// Policy for keys the schema does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Drop them from the parsed output
    #[default]
    Strip,
    /// Reject the object with an `unrecognized_keys` issue
    Strict,
}

/// A declared field of an object
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: String,
    pub schema: SchemaNode,
    pub optional: bool,
}

type Predicate = Arc<dyn Fn(&Values) -> bool + Send + Sync>;

/// Cross-field check run on the parsed object
#[derive(Clone)]
pub struct Refinement {
    path: FieldPath,
    message: String,
    predicate: Predicate,
}

impl Refinement {
    /// Report `message` at `path` (relative to the object) when `predicate`
    /// returns false for the parsed fields
    pub fn new(
        path: FieldPath,
        message: impl Into<String>,
        predicate: impl Fn(&Values) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            path,
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Require `field` to equal `other`, reporting at `field`
    pub fn fields_equal(
        field: impl Into<String>,
        other: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let other = other.into();
        let path = FieldPath::key(field.clone());
        Self::new(path, message, move |values| {
            values.get(&field) == values.get(&other)
        })
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("path", &self.path)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Schema accepting a mapping of declared fields
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<FieldDefinition>,
    unknown_keys: UnknownKeys,
    refinements: Vec<Refinement>,
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required field. Fields are evaluated in declaration order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<SchemaNode>) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            schema: schema.into(),
            optional: false,
        });
        self
    }

    /// Declare a field that may be absent
    #[must_use]
    pub fn optional_field(
        mut self,
        name: impl Into<String>,
        schema: impl Into<SchemaNode>,
    ) -> Self {
        self.fields.push(FieldDefinition {
            name: name.into(),
            schema: schema.into(),
            optional: true,
        });
        self
    }

    #[must_use]
    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strict;
        self
    }

    #[must_use]
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    #[must_use]
    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn unknown_keys_policy(&self) -> UnknownKeys {
        self.unknown_keys
    }

    pub(crate) fn verify(&self, path: &FieldPath) -> Result<()> {
        for field in &self.fields {
            field.schema.verify(&path.child(field.name.as_str()))?;
        }
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        value: &Value,
        path: &FieldPath,
        issues: &mut Vec<Issue>,
    ) -> Result<Option<Value>> {
        let Some(input) = value.as_map() else {
            issues.push(Issue::invalid_type(path.clone(), "object", value));
            return Ok(None);
        };

        let before = issues.len();
        let mut parsed = Values::new();

        for field in &self.fields {
            let field_path = path.child(field.name.as_str());
            match input.get(&field.name) {
                Some(raw) => {
                    if let Some(value) = field.schema.parse(raw, &field_path, issues)? {
                        parsed.insert(field.name.clone(), value);
                    }
                }
                None if field.optional => {}
                None => issues.push(Issue::required(field_path)),
            }
        }

        if self.unknown_keys == UnknownKeys::Strict {
            let unknown: Vec<&str> = input
                .keys()
                .filter(|k| !self.fields.iter().any(|f| &f.name == *k))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                let listed = unknown
                    .iter()
                    .map(|k| format!("'{k}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                issues.push(Issue::new(
                    path.clone(),
                    IssueCode::UnrecognizedKeys,
                    format!("Unrecognized key(s) in object: {listed}"),
                ));
            }
        }

        if issues.len() > before {
            return Ok(None);
        }

        for refinement in &self.refinements {
            if !(refinement.predicate)(&parsed) {
                issues.push(Issue::new(
                    path.join(&refinement.path),
                    IssueCode::Custom,
                    refinement.message.clone(),
                ));
            }
        }

        if issues.len() > before {
            return Ok(None);
        }
        Ok(Some(Value::Map(parsed)))
    }
}
