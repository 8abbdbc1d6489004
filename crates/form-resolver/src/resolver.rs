//! Resolution of form values against a schema

use form_schema::{Issue, Schema, ValidationOutcome};
use form_value::{Value, Values};
use tracing::{debug, trace};

use crate::config::{CriteriaMode, ResolverConfig};
use crate::result::{FieldError, FieldErrors, ROOT_ERROR_KEY, ResolverResult};
use crate::{Error, Result};

/// Validate `values` against `schema` with the default configuration.
///
/// # Errors
///
/// Propagates schema faults; see [`resolve_with`].
pub fn resolve<S: Schema + ?Sized>(values: &Values, schema: &S) -> Result<ResolverResult> {
    resolve_with(values, schema, &ResolverConfig::default())
}

/// Validate `values` against `schema`.
///
/// The schema's outcome is mapped into a [`ResolverResult`]:
/// - accepted: `values` holds the parsed data (or the input, when
///   `config.raw` is set) and `errors` is empty;
/// - rejected: `values` is empty and `errors` maps each issue's joined path
///   to a [`FieldError`] of type `"validation"`. Issues at the root path are
///   keyed [`ROOT_ERROR_KEY`].
///
/// # Errors
///
/// Returns [`Error::Schema`] when the schema itself faults,
/// [`Error::NonObjectData`] when an accepting schema yields something other
/// than an object, and [`Error::NoIssues`] when a rejecting schema reports
/// no issue.
pub fn resolve_with<S: Schema + ?Sized>(
    values: &Values,
    schema: &S,
    config: &ResolverConfig,
) -> Result<ResolverResult> {
    let input = Value::Map(values.clone());

    match schema.validate(&input)? {
        ValidationOutcome::Valid { data } => {
            trace!(field_count = values.len(), raw = config.raw, "values accepted");
            if config.raw {
                return Ok(ResolverResult::success(values.clone()));
            }
            match data {
                Value::Map(parsed) => Ok(ResolverResult::success(parsed)),
                other => Err(Error::NonObjectData {
                    found: other.type_name().to_string(),
                }),
            }
        }
        ValidationOutcome::Invalid { issues } => {
            if issues.is_empty() {
                return Err(Error::NoIssues);
            }
            let errors = collect_errors(&issues, config.criteria_mode);
            debug!(
                issue_count = issues.len(),
                error_count = errors.len(),
                "values rejected"
            );
            Ok(ResolverResult::failure(errors))
        }
    }
}

fn error_key(issue: &Issue) -> String {
    if issue.path.is_root() {
        ROOT_ERROR_KEY.to_string()
    } else {
        issue.path.to_string()
    }
}

fn collect_errors(issues: &[Issue], mode: CriteriaMode) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for issue in issues {
        let key = error_key(issue);

        if mode == CriteriaMode::All {
            if let Some(existing) = errors.get_mut(&key) {
                existing
                    .types
                    .entry(issue.code.to_string())
                    .or_default()
                    .push(issue.message.clone());
                continue;
            }
        }

        let mut error = FieldError::validation(issue.message.clone());
        if mode == CriteriaMode::All {
            error
                .types
                .insert(issue.code.to_string(), vec![issue.message.clone()]);
        }
        if !errors.insert_first(key, error) {
            trace!(path = %issue.path, "dropping later issue for path");
        }
    }

    errors
}

/// Something a form-state manager can call on submit
pub trait Resolver: Send + Sync {
    /// Resolve the current field values.
    ///
    /// # Errors
    ///
    /// Returns an error when resolution faults; validation failures are
    /// reported inside the [`ResolverResult`].
    fn resolve(&self, values: &Values) -> Result<ResolverResult>;
}

impl<F> Resolver for F
where
    F: Fn(&Values) -> Result<ResolverResult> + Send + Sync,
{
    fn resolve(&self, values: &Values) -> Result<ResolverResult> {
        self(values)
    }
}

/// A schema bound to a resolver configuration
#[derive(Debug, Clone)]
pub struct SchemaResolver<S> {
    schema: S,
    config: ResolverConfig,
}

impl<S: Schema> SchemaResolver<S> {
    pub fn new(schema: S) -> Self {
        Self::with_config(schema, ResolverConfig::default())
    }

    pub fn with_config(schema: S, config: ResolverConfig) -> Self {
        Self { schema, config }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl<S: Schema> Resolver for SchemaResolver<S> {
    fn resolve(&self, values: &Values) -> Result<ResolverResult> {
        resolve_with(values, &self.schema, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_schema::{IssueCode, ObjectSchema, StringSchema};
    use form_value::FieldPath;

    fn issue(path: &str, code: IssueCode, message: &str) -> Issue {
        Issue::new(FieldPath::parse(path).unwrap(), code, message)
    }

    #[test]
    fn test_collect_errors_first_wins() {
        let issues = vec![
            issue("password", IssueCode::TooSmall, "too short"),
            issue("password", IssueCode::InvalidString, "needs a digit"),
            issue("username", IssueCode::TooSmall, "required"),
        ];

        let errors = collect_errors(&issues, CriteriaMode::FirstError);
        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["password", "username"]);
        assert_eq!(errors.get("password").unwrap().message, "too short");
        assert!(errors.get("password").unwrap().types.is_empty());
    }

    #[test]
    fn test_collect_errors_all_records_types() {
        let issues = vec![
            issue("password", IssueCode::TooSmall, "too short"),
            issue("password", IssueCode::InvalidString, "needs a digit"),
            issue("password", IssueCode::InvalidString, "needs a letter"),
        ];

        let errors = collect_errors(&issues, CriteriaMode::All);
        let password = errors.get("password").unwrap();
        assert_eq!(password.message, "too short");
        assert_eq!(password.types["too_small"], vec!["too short"]);
        assert_eq!(
            password.types["invalid_string"],
            vec!["needs a digit", "needs a letter"]
        );
    }

    #[test]
    fn test_root_issue_key() {
        let issues = vec![Issue::new(
            FieldPath::root(),
            IssueCode::UnrecognizedKeys,
            "Unrecognized key(s) in object: 'x'",
        )];
        let errors = collect_errors(&issues, CriteriaMode::FirstError);
        assert!(errors.contains(ROOT_ERROR_KEY));
    }

    struct AcceptsAsString;

    impl Schema for AcceptsAsString {
        fn validate(&self, _value: &Value) -> form_schema::Result<ValidationOutcome> {
            Ok(ValidationOutcome::Valid {
                data: Value::from("flat"),
            })
        }
    }

    #[test]
    fn test_non_object_data_is_a_fault() {
        assert!(matches!(
            resolve(&Values::new(), &AcceptsAsString),
            Err(Error::NonObjectData { .. })
        ));
    }

    #[test]
    fn test_non_object_schema_reports_at_root() {
        let result = resolve(&Values::new(), &StringSchema::new()).unwrap();
        assert_eq!(
            result.errors.get(ROOT_ERROR_KEY).unwrap().message,
            "Expected string, received object"
        );
    }

    #[test]
    fn test_schema_resolver_applies_config() {
        let resolver = SchemaResolver::with_config(
            ObjectSchema::new().field("name", StringSchema::new().trim()),
            ResolverConfig::default().raw(true),
        );

        let mut values = Values::new();
        values.insert("name".to_string(), Value::from("  padded  "));

        let result = resolver.resolve(&values).unwrap();
        assert_eq!(result.values, values);
        assert!(resolver.config().raw);
    }

    #[test]
    fn test_closure_is_a_resolver() {
        let resolver =
            |values: &Values| -> Result<ResolverResult> { Ok(ResolverResult::success(values.clone())) };
        let result = Resolver::resolve(&resolver, &Values::new()).unwrap();
        assert!(result.is_valid());
    }
}
