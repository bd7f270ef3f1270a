//! Domain-level error types.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures. Every variant is request-terminal.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Authentication credentials were not provided.")]
    NotAuthenticated,

    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// A unique key already holds this value.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A foreign key names a row that does not exist (or no longer does).
    #[error("Missing reference: {0}")]
    MissingReference(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

/// Validation messages collected per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// `Ok(value)` when nothing was collected, otherwise a validation error.
    pub fn into_result<T>(self, value: T) -> Result<T, DomainError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(DomainError::Validation(self))
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

impl From<FieldErrors> for DomainError {
    fn from(errors: FieldErrors) -> Self {
        DomainError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_accumulate() {
        let mut errors = FieldErrors::new();
        errors.add("text", "This field is required.");
        errors.add("group", "Invalid pk.");
        errors.add("text", "Second.");

        assert_eq!(errors.messages("text").len(), 2);
        assert!(errors.contains("group"));
        assert_eq!(
            errors.to_string(),
            "group: Invalid pk.; text: This field is required. Second."
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(FieldErrors::new().into_result(5).unwrap(), 5);
        assert!(matches!(
            FieldErrors::single("x", "bad").into_result(()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_constraint_maps_to_conflict() {
        let err: DomainError = RepoError::Constraint("dup".into()).into();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "dup"));

        let err: DomainError = RepoError::Query("boom".into()).into();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn test_missing_reference_is_not_a_conflict() {
        let err: DomainError =
            RepoError::MissingReference("follow user does not exist".into()).into();
        assert!(matches!(err, DomainError::Internal(msg) if msg.contains("follow user")));
    }
}
