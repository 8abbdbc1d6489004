//! String schema

use form_value::{FieldPath, Value};
use regex::Regex;

use crate::issue::{Issue, IssueCode};
use crate::{Error, Result};

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

/// A single check applied to a string, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringCheck {
    /// At least one character
    NonEmpty { message: Option<String> },
    MinLength {
        value: usize,
        message: Option<String>,
    },
    MaxLength {
        value: usize,
        message: Option<String>,
    },
    /// Regex that must match somewhere in the value
    Pattern {
        regex: String,
        message: Option<String>,
    },
    Email { message: Option<String> },
}

impl StringCheck {
    fn code(&self) -> IssueCode {
        match self {
            StringCheck::NonEmpty { .. } | StringCheck::MinLength { .. } => IssueCode::TooSmall,
            StringCheck::MaxLength { .. } => IssueCode::TooBig,
            StringCheck::Pattern { .. } | StringCheck::Email { .. } => IssueCode::InvalidString,
        }
    }

    fn message_or_default(&self) -> String {
        match self {
            StringCheck::NonEmpty { message } => message
                .clone()
                .unwrap_or_else(|| "String must contain at least 1 character(s)".to_string()),
            StringCheck::MinLength { value, message } => message.clone().unwrap_or_else(|| {
                format!("String must contain at least {value} character(s)")
            }),
            StringCheck::MaxLength { value, message } => message.clone().unwrap_or_else(|| {
                format!("String must contain at most {value} character(s)")
            }),
            StringCheck::Pattern { message, .. } => {
                message.clone().unwrap_or_else(|| "Invalid".to_string())
            }
            StringCheck::Email { message } => {
                message.clone().unwrap_or_else(|| "Invalid email".to_string())
            }
        }
    }

    fn source(&self) -> Option<&str> {
        match self {
            StringCheck::Pattern { regex, .. } => Some(regex.as_str()),
            StringCheck::Email { .. } => Some(EMAIL_PATTERN),
            _ => None,
        }
    }
}

/// Regex compiled once when its check is added
#[derive(Debug, Clone)]
struct Matcher {
    source: String,
    compiled: std::result::Result<Regex, regex::Error>,
}

impl Matcher {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: Regex::new(source),
        }
    }

    fn regex(&self, path: &FieldPath) -> Result<&Regex> {
        self.compiled.as_ref().map_err(|e| Error::InvalidPattern {
            path: path.to_string(),
            pattern: self.source.clone(),
            reason: e.to_string(),
        })
    }
}

/// Schema accepting a string value
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    trim: bool,
    checks: Vec<StringCheck>,
    /// One entry per check; `Some` for regex-backed checks
    matchers: Vec<Option<Matcher>>,
}

impl StringSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip surrounding whitespace before the checks run; the parsed
    /// value is the trimmed string
    #[must_use]
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    #[must_use]
    pub fn non_empty(self, message: impl Into<String>) -> Self {
        self.check(StringCheck::NonEmpty {
            message: Some(message.into()),
        })
    }

    #[must_use]
    pub fn min_length(self, value: usize, message: impl Into<String>) -> Self {
        self.check(StringCheck::MinLength {
            value,
            message: Some(message.into()),
        })
    }

    #[must_use]
    pub fn max_length(self, value: usize, message: impl Into<String>) -> Self {
        self.check(StringCheck::MaxLength {
            value,
            message: Some(message.into()),
        })
    }

    #[must_use]
    pub fn pattern(self, regex: impl Into<String>, message: impl Into<String>) -> Self {
        self.check(StringCheck::Pattern {
            regex: regex.into(),
            message: Some(message.into()),
        })
    }

    #[must_use]
    pub fn email(self, message: impl Into<String>) -> Self {
        self.check(StringCheck::Email {
            message: Some(message.into()),
        })
    }

    /// Append an arbitrary check
    #[must_use]
    pub fn check(mut self, check: StringCheck) -> Self {
        self.matchers.push(check.source().map(Matcher::new));
        self.checks.push(check);
        self
    }

    pub fn checks(&self) -> &[StringCheck] {
        &self.checks
    }

    pub fn trims(&self) -> bool {
        self.trim
    }

    /// Report malformed checks regardless of the value being validated
    pub(crate) fn verify(&self, path: &FieldPath) -> Result<()> {
        self.check_bounds(path)?;
        for matcher in self.matchers.iter().flatten() {
            matcher.regex(path)?;
        }
        Ok(())
    }

    fn check_bounds(&self, path: &FieldPath) -> Result<()> {
        let min = self
            .checks
            .iter()
            .filter_map(|c| match c {
                StringCheck::NonEmpty { .. } => Some(1),
                StringCheck::MinLength { value, .. } => Some(*value),
                _ => None,
            })
            .max();
        let max = self
            .checks
            .iter()
            .filter_map(|c| match c {
                StringCheck::MaxLength { value, .. } => Some(*value),
                _ => None,
            })
            .min();

        match (min, max) {
            (Some(min), Some(max)) if min > max => Err(Error::InvalidBounds {
                path: path.to_string(),
                min,
                max,
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn parse(
        &self,
        value: &Value,
        path: &FieldPath,
        issues: &mut Vec<Issue>,
    ) -> Result<Option<Value>> {
        let Some(raw) = value.as_str() else {
            issues.push(Issue::invalid_type(path.clone(), "string", value));
            return Ok(None);
        };

        let text = if self.trim { raw.trim() } else { raw };

        let before = issues.len();
        let len = text.chars().count();
        for (check, matcher) in self.checks.iter().zip(&self.matchers) {
            let passes = match (check, matcher) {
                (_, Some(matcher)) => matcher.regex(path)?.is_match(text),
                (StringCheck::NonEmpty { .. }, None) => len > 0,
                (StringCheck::MinLength { value: min, .. }, None) => len >= *min,
                (StringCheck::MaxLength { value: max, .. }, None) => len <= *max,
                (StringCheck::Pattern { .. } | StringCheck::Email { .. }, None) => true,
            };
            if !passes {
                issues.push(Issue::new(
                    path.clone(),
                    check.code(),
                    check.message_or_default(),
                ));
            }
        }

        if issues.len() > before {
            return Ok(None);
        }
        Ok(Some(Value::String(text.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;
    use crate::issue::ValidationOutcome;

    fn issues_for(schema: &StringSchema, input: &str) -> Vec<Issue> {
        schema
            .validate(&Value::from(input))
            .unwrap()
            .issues()
            .to_vec()
    }

    #[test]
    fn test_non_empty() {
        let schema = StringSchema::new().non_empty("username field is required");

        let issues = issues_for(&schema, "");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "username field is required");
        assert_eq!(issues[0].code, IssueCode::TooSmall);

        assert!(issues_for(&schema, "alice").is_empty());
    }

    #[test]
    fn test_every_failing_check_reports() {
        let schema = StringSchema::new()
            .min_length(8, "too short")
            .pattern("[0-9]", "needs a digit");

        let issues = issues_for(&schema, "abc");
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["too short", "needs a digit"]);
    }

    #[test]
    fn test_length_counts_characters() {
        let schema = StringSchema::new().max_length(3, "too long");
        assert!(issues_for(&schema, "åäö").is_empty());
        assert_eq!(issues_for(&schema, "åäöx").len(), 1);
    }

    #[test]
    fn test_trim_normalizes_output() {
        let schema = StringSchema::new().trim().non_empty("required");

        assert_eq!(issues_for(&schema, "   ").len(), 1);

        let outcome = schema.validate(&Value::from("  alice ")).unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::Valid {
                data: Value::from("alice")
            }
        );
    }

    #[test]
    fn test_email() {
        let schema = StringSchema::new().email("bad email");
        assert!(issues_for(&schema, "alice@example.com").is_empty());
        assert_eq!(issues_for(&schema, "alice@").len(), 1);
        assert_eq!(issues_for(&schema, "not an email").len(), 1);
    }

    #[test]
    fn test_default_messages() {
        let schema = StringSchema::new()
            .check(StringCheck::MinLength {
                value: 2,
                message: None,
            })
            .check(StringCheck::Email { message: None });

        let issues = issues_for(&schema, "a");
        assert_eq!(
            issues[0].message,
            "String must contain at least 2 character(s)"
        );
        assert_eq!(issues[1].message, "Invalid email");
    }

    #[test]
    fn test_wrong_shape() {
        let schema = StringSchema::new();
        let outcome = schema.validate(&Value::List(Vec::new())).unwrap();
        assert_eq!(outcome.issues()[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn test_bad_pattern_is_a_fault() {
        let schema = StringSchema::new().pattern("([a-z", "never");
        let err = schema.validate(&Value::from("abc")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));

        // the value's shape does not hide the fault
        let err = schema.validate(&Value::List(Vec::new())).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "([a-z"));
    }

    #[test]
    fn test_inverted_bounds_is_a_fault() {
        let schema = StringSchema::new()
            .min_length(5, "short")
            .max_length(2, "long");
        let err = schema.validate(&Value::from("abc")).unwrap_err();
        assert!(matches!(err, Error::InvalidBounds { min: 5, max: 2, .. }));
    }
}
