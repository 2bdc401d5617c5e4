//! Presenter errors.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Key used for problems that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Per-field validation messages, rendered as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-message shorthand.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<(), PresentError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PresentError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentError {
    /// Input was malformed or referenced something that cannot be resolved.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// A record the caller asked for (or a record points at) does not exist.
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },
}

impl PresentError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        PresentError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            PresentError::Validation(errors) => Some(errors),
            PresentError::NotFound { .. } => None,
        }
    }
}

impl From<ValidationErrors> for PresentError {
    fn from(errors: ValidationErrors) -> Self {
        PresentError::Validation(errors)
    }
}
