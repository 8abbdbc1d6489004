//! Candidate values

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::path::{FieldPath, PathSegment};
use crate::{Error, Result};

/// Raw form input keyed by field name
pub type Values = BTreeMap<String, Value>;

/// A single raw input value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Text typed into an input
    String(String),

    /// Repeated field
    List(Vec<Value>),

    /// Group of named fields
    Map(Values),
}

impl Value {
    /// Name of the value's shape, as used in type-mismatch messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::List(_) => "array",
            Value::Map(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Values> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a nested value
    pub fn get_path(&self, path: &FieldPath) -> Option<&Value> {
        walk(self, path.segments())
    }

    /// Convert arbitrary JSON into a candidate value.
    ///
    /// Numbers and booleans are stringified the way an input element would
    /// report them. `null` yields `None` and is dropped from enclosing
    /// mappings and lists, i.e. treated as a missing field.
    pub fn from_json(json: serde_json::Value) -> Option<Value> {
        match json {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Value::String(b.to_string())),
            serde_json::Value::Number(n) => Some(Value::String(n.to_string())),
            serde_json::Value::String(s) => Some(Value::String(s)),
            serde_json::Value::Array(items) => Some(Value::List(
                items.into_iter().filter_map(Value::from_json).collect(),
            )),
            serde_json::Value::Object(fields) => Some(Value::Map(
                fields
                    .into_iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Values> for Value {
    fn from(map: Values) -> Self {
        Value::Map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

fn walk<'a>(start: &'a Value, segments: &[PathSegment]) -> Option<&'a Value> {
    let mut current = start;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Map(map)) => map.get(key)?,
            (PathSegment::Index(index), Value::List(items)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Look up a nested value inside a top-level mapping
pub fn get_at_path<'a>(values: &'a Values, path: &FieldPath) -> Option<&'a Value> {
    match path.segments().split_first()? {
        (PathSegment::Key(first), rest) => walk(values.get(first)?, rest),
        (PathSegment::Index(_), _) => None,
    }
}

/// Convert a top-level JSON object into [`Values`].
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when `json` is not an object.
pub fn values_from_json(json: serde_json::Value) -> Result<Values> {
    let found = json_type_name(&json);
    match Value::from_json(json) {
        Some(Value::Map(values)) => Ok(values),
        _ => Err(Error::type_mismatch("object", found)),
    }
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Store `value` at `path`, creating intermediate mappings and lists.
///
/// A list index may address an existing element or the position one past
/// the end, which appends.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] for the root path, for indices beyond the
/// end of a list, and when an intermediate value has the wrong shape. On
/// error `values` is left unchanged.
pub fn insert_at_path(values: &mut Values, path: &FieldPath, value: Value) -> Result<()> {
    let Some((PathSegment::Key(first), rest)) = path.segments().split_first() else {
        return Err(Error::invalid_path(
            path.to_string(),
            "must start with a field name",
        ));
    };

    trace!(path = %path, "inserting value");

    if rest.is_empty() {
        values.insert(first.clone(), value);
        return Ok(());
    }

    // build on a copy so a failed insert leaves `values` untouched
    let mut slot = values
        .get(first)
        .cloned()
        .unwrap_or_else(|| empty_container_for(&rest[0]));
    insert_into(&mut slot, rest, value, path)?;
    values.insert(first.clone(), slot);
    Ok(())
}

fn insert_into(
    target: &mut Value,
    segments: &[PathSegment],
    value: Value,
    full_path: &FieldPath,
) -> Result<()> {
    let Some((segment, rest)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };

    let slot = match (segment, target) {
        (PathSegment::Key(key), Value::Map(map)) => {
            if rest.is_empty() {
                map.insert(key.clone(), value);
                return Ok(());
            }
            map.entry(key.clone())
                .or_insert_with(|| empty_container_for(&rest[0]))
        }
        (PathSegment::Index(index), Value::List(items)) => {
            if *index > items.len() {
                return Err(Error::invalid_path(
                    full_path.to_string(),
                    format!("index {index} is past the end of a list of {}", items.len()),
                ));
            }
            if *index == items.len() {
                let filler = rest
                    .first()
                    .map_or_else(|| Value::String(String::new()), empty_container_for);
                items.push(filler);
            }
            &mut items[*index]
        }
        (PathSegment::Key(_), other) => {
            return Err(Error::invalid_path(
                full_path.to_string(),
                format!("cannot address a field inside a {}", other.type_name()),
            ));
        }
        (PathSegment::Index(_), other) => {
            return Err(Error::invalid_path(
                full_path.to_string(),
                format!("cannot index into a {}", other.type_name()),
            ));
        }
    };

    insert_into(slot, rest, value, full_path)
}

fn empty_container_for(next: &PathSegment) -> Value {
    match next {
        PathSegment::Key(_) => Value::Map(Values::new()),
        PathSegment::Index(_) => Value::List(Vec::new()),
    }
}
