//! Form state and submit handling

use form_resolver::{FieldError, FieldErrors, Resolver};
use form_value::{FieldPath, Value, Values, get_at_path, insert_at_path};
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// What a submit attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Values were accepted and the submit callback ran
    Submitted,
    /// Values were rejected; errors are stored on the form
    Rejected { error_count: usize },
}

/// Submit bookkeeping
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmitStats {
    /// Total submit attempts
    pub submit_count: usize,
    /// Attempts that reached the submit callback
    pub successful: usize,
    /// Attempts rejected by validation
    pub rejected: usize,
    /// Attempts aborted by a resolver fault
    pub faulted: usize,
}

/// Headless form state
#[derive(Debug)]
pub struct FormState<R> {
    resolver: R,
    /// Registered fields in registration order
    fields: Vec<FieldPath>,
    values: Values,
    errors: FieldErrors,
    stats: SubmitStats,
    last_submit_successful: bool,
}

impl<R: Resolver> FormState<R> {
    /// Create a form that validates through `resolver`
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            fields: Vec::new(),
            values: Values::new(),
            errors: FieldErrors::new(),
            stats: SubmitStats::default(),
            last_submit_successful: false,
        }
    }

    /// Register a field by name or path (`address.city`, `items[0].name`).
    ///
    /// The field starts out as an empty string unless a value is already
    /// present. Registering twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is not a valid field path.
    pub fn register_field(&mut self, name: &str) -> Result<()> {
        let path = FieldPath::parse(name)?;
        if self.fields.contains(&path) {
            return Ok(());
        }

        if get_at_path(&self.values, &path).is_none() {
            insert_at_path(&mut self.values, &path, Value::String(String::new()))?;
        }

        debug!(field = %path, "registered field");
        self.fields.push(path);
        Ok(())
    }

    /// Set a registered field's value
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredField`] for unknown fields.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let path = FieldPath::parse(name)?;
        if !self.fields.contains(&path) {
            return Err(Error::UnregisteredField(name.to_string()));
        }
        insert_at_path(&mut self.values, &path, value.into())?;
        Ok(())
    }

    /// Current values of all fields
    pub fn get_values(&self) -> &Values {
        &self.values
    }

    /// Registered field paths in registration order
    pub fn fields(&self) -> &[FieldPath] {
        &self.fields
    }

    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Set or replace the error for one field
    pub fn set_error(&mut self, name: &str, error: FieldError) {
        self.errors.set(name, error);
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Messages that would be rendered as alerts, one per field with an
    /// error, in error order
    pub fn alerts(&self) -> Vec<&str> {
        self.errors.messages().collect()
    }

    /// Validate the current values and, when they are accepted, pass the
    /// resolved values to `on_submit`.
    ///
    /// Rejected values leave the form editable: errors are stored and the
    /// form can be submitted again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolve`] when the resolver faults. `on_submit` is
    /// not called and the stored errors are left untouched.
    pub fn handle_submit<F>(&mut self, on_submit: F) -> Result<SubmitOutcome>
    where
        F: FnOnce(&Values),
    {
        self.stats.submit_count += 1;
        self.last_submit_successful = false;

        let result = match self.resolver.resolve(&self.values) {
            Ok(result) => result,
            Err(e) => {
                self.stats.faulted += 1;
                warn!(error = %e, "resolver fault during submit");
                return Err(e.into());
            }
        };

        if result.is_valid() {
            self.errors.clear();
            on_submit(&result.values);
            self.stats.successful += 1;
            self.last_submit_successful = true;
            info!(submit_count = self.stats.submit_count, "form submitted");
            return Ok(SubmitOutcome::Submitted);
        }

        let error_count = result.errors.len();
        self.errors = result.errors;
        self.stats.rejected += 1;
        info!(
            submit_count = self.stats.submit_count,
            error_count, "form submit rejected"
        );
        Ok(SubmitOutcome::Rejected { error_count })
    }

    /// Reset every registered field to an empty string and clear errors
    ///
    /// # Errors
    ///
    /// Returns an error if a registered path can no longer be written.
    pub fn reset(&mut self) -> Result<()> {
        self.values.clear();
        self.errors.clear();
        for path in &self.fields {
            insert_at_path(&mut self.values, path, Value::String(String::new()))?;
        }
        Ok(())
    }

    pub fn submit_count(&self) -> usize {
        self.stats.submit_count
    }

    /// Whether the most recent submit reached the callback
    pub fn is_submit_successful(&self) -> bool {
        self.last_submit_successful
    }

    pub fn stats(&self) -> &SubmitStats {
        &self.stats
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}
