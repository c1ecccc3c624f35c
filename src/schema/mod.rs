//! Request-body validation.
//!
//! Validators are pure functions over raw JSON; they run before any store
//! call and either produce typed input or a [`ValidationError`] listing every
//! offending field.

pub mod account;
pub mod dividend;

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

pub use account::{validate_credentials, Credentials};
pub use dividend::{validate_dividend_patch, validate_new_dividend, validate_year_entry, MIN_YEAR};

/// Field-level validation failure, keyed by wire field name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: HashMap<String, String>,
}

impl ValidationError {
    /// Failure that is not attributable to a single field
    pub fn body(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }
}

/// Accumulates per-field failures while a body is walked
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    /// Parse `key` out of `object`. Missing keys are an error only when
    /// `required`; present keys always go through `parse`.
    pub(crate) fn field<T>(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        required: bool,
        parse: impl FnOnce(&Value) -> Result<T, String>,
    ) -> Option<T> {
        match object.get(key) {
            None => {
                if required {
                    self.add(key, "Required");
                }
                None
            }
            Some(value) => match parse(value) {
                Ok(parsed) => Some(parsed),
                Err(message) => {
                    self.add(key, message);
                    None
                }
            },
        }
    }

    pub(crate) fn add(&mut self, key: &str, message: impl Into<String>) {
        self.0.insert(key.to_string(), message.into());
    }

    pub(crate) fn finish(self, message: &str) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                message: message.to_string(),
                field_errors: self.0,
            })
        }
    }
}

pub(crate) fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object()
        .ok_or_else(|| ValidationError::body(format!("Expected object, received {}", kind(body))))
}

/// JSON type name used in error messages
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("Expected string, received {}", kind(other))),
    }
}

pub(crate) fn non_empty_string(value: &Value) -> Result<String, String> {
    let s = string(value)?;
    if s.trim().is_empty() {
        return Err("String must contain at least 1 character(s)".to_string());
    }
    Ok(s)
}
