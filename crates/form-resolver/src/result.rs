//! Resolver output shapes

use std::collections::BTreeMap;

use form_value::Values;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// `type` assigned to every error produced from a schema issue
pub const VALIDATION_ERROR_TYPE: &str = "validation";

/// Error-map key for issues reported against the whole form
pub const ROOT_ERROR_KEY: &str = "root";

/// Error for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Every message reported for this field, keyed by issue code.
    /// Only populated in [`crate::CriteriaMode::All`].
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, Vec<String>>,
}

impl FieldError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: VALIDATION_ERROR_TYPE.to_string(),
            types: BTreeMap::new(),
        }
    }
}

/// Field errors keyed by joined path, in the order they were first reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, FieldError)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.entries
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, error)| error)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FieldError> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == path)
            .map(|(_, error)| error)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Insert unless `path` already has an error. Returns whether the
    /// error was stored.
    pub fn insert_first(&mut self, path: impl Into<String>, error: FieldError) -> bool {
        let path = path.into();
        if self.contains(&path) {
            return false;
        }
        self.entries.push((path, error));
        true
    }

    /// Insert, replacing any existing error for `path` in place
    pub fn set(&mut self, path: impl Into<String>, error: FieldError) {
        let path = path.into();
        match self.get_mut(&path) {
            Some(existing) => *existing = error,
            None => self.entries.push((path, error)),
        }
    }

    pub fn remove(&mut self, path: &str) -> Option<FieldError> {
        let idx = self.entries.iter().position(|(key, _)| key == path)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.entries
            .iter()
            .map(|(key, error)| (key.as_str(), error))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, error)| error.message.as_str())
    }
}

impl FromIterator<(String, FieldError)> for FieldErrors {
    /// Later duplicates are dropped
    fn from_iter<I: IntoIterator<Item = (String, FieldError)>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for (path, error) in iter {
            errors.insert_first(path, error);
        }
        errors
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, error) in &self.entries {
            map.serialize_entry(path, error)?;
        }
        map.end()
    }
}

/// Normalized outcome of one resolution call.
///
/// On success `errors` is empty and `values` holds the parsed data; on
/// failure `values` is empty and `errors` holds at least one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolverResult {
    pub values: Values,
    pub errors: FieldErrors,
}

impl ResolverResult {
    pub fn success(values: Values) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    pub fn failure(errors: FieldErrors) -> Self {
        Self {
            values: Values::new(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_first_keeps_first() {
        let mut errors = FieldErrors::new();
        assert!(errors.insert_first("username", FieldError::validation("first")));
        assert!(!errors.insert_first("username", FieldError::validation("second")));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("username").unwrap().message, "first");
    }

    #[test]
    fn test_order_is_insertion_order() {
        let errors: FieldErrors = [
            ("password".to_string(), FieldError::validation("p")),
            ("username".to_string(), FieldError::validation("u")),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["password", "username"]);
        assert_eq!(errors.messages().collect::<Vec<_>>(), vec!["p", "u"]);
    }

    #[test]
    fn test_set_and_remove() {
        let mut errors = FieldErrors::new();
        errors.set("a", FieldError::validation("one"));
        errors.set("b", FieldError::validation("two"));
        errors.set("a", FieldError::validation("three"));

        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(errors.get("a").unwrap().message, "three");

        assert_eq!(errors.remove("a").unwrap().message, "three");
        assert!(errors.remove("a").is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_serialize_shape() {
        let result = ResolverResult::failure(
            [("username".to_string(), FieldError::validation("required"))]
                .into_iter()
                .collect(),
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "values": {},
                "errors": {
                    "username": { "message": "required", "type": "validation" }
                }
            })
        );
    }

    #[test]
    fn test_success_and_failure_helpers() {
        assert!(ResolverResult::success(Values::new()).is_valid());
        let failed = ResolverResult::failure(
            [("a".to_string(), FieldError::validation("x"))]
                .into_iter()
                .collect(),
        );
        assert!(!failed.is_valid());
        assert!(failed.values.is_empty());
    }
}
