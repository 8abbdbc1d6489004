//! Array schema

use form_value::{FieldPath, Value};

use crate::issue::{Issue, IssueCode};
use crate::model::SchemaNode;
use crate::{Error, Result};

/// Item-count bound with an optional custom message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBound {
    pub value: usize,
    pub message: Option<String>,
}

/// Schema accepting a list whose elements share one schema
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element: Box<SchemaNode>,
    min_items: Option<ItemBound>,
    max_items: Option<ItemBound>,
}

impl ArraySchema {
    pub fn new(element: impl Into<SchemaNode>) -> Self {
        Self {
            element: Box::new(element.into()),
            min_items: None,
            max_items: None,
        }
    }

    #[must_use]
    pub fn min_items(mut self, value: usize, message: Option<String>) -> Self {
        self.min_items = Some(ItemBound { value, message });
        self
    }

    #[must_use]
    pub fn max_items(mut self, value: usize, message: Option<String>) -> Self {
        self.max_items = Some(ItemBound { value, message });
        self
    }

    pub fn element(&self) -> &SchemaNode {
        &self.element
    }

    /// Element faults are reported at the first index
    pub(crate) fn verify(&self, path: &FieldPath) -> Result<()> {
        if let (Some(min), Some(max)) = (&self.min_items, &self.max_items) {
            if min.value > max.value {
                return Err(Error::InvalidBounds {
                    path: path.to_string(),
                    min: min.value,
                    max: max.value,
                });
            }
        }
        self.element.verify(&path.child(0))
    }

    pub(crate) fn parse(
        &self,
        value: &Value,
        path: &FieldPath,
        issues: &mut Vec<Issue>,
    ) -> Result<Option<Value>> {
        let Some(items) = value.as_list() else {
            issues.push(Issue::invalid_type(path.clone(), "array", value));
            return Ok(None);
        };

        let before = issues.len();

        if let Some(min) = &self.min_items {
            if items.len() < min.value {
                issues.push(Issue::new(
                    path.clone(),
                    IssueCode::TooSmall,
                    min.message.clone().unwrap_or_else(|| {
                        format!("Array must contain at least {} element(s)", min.value)
                    }),
                ));
            }
        }
        if let Some(max) = &self.max_items {
            if items.len() > max.value {
                issues.push(Issue::new(
                    path.clone(),
                    IssueCode::TooBig,
                    max.message.clone().unwrap_or_else(|| {
                        format!("Array must contain at most {} element(s)", max.value)
                    }),
                ));
            }
        }

        let mut parsed = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if let Some(value) = self.element.parse(item, &path.child(idx), issues)? {
                parsed.push(value);
            }
        }

        if issues.len() > before {
            return Ok(None);
        }
        Ok(Some(Value::List(parsed)))
    }
}
