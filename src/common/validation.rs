// Common validation types and traits

use std::collections::BTreeMap;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Mapping of field key to message; a field without an entry is valid.
///
/// Only the first error recorded for a field is kept, so validators can
/// check their rules in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    errors: BTreeMap<String, String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for (field, message) in other.errors {
            self.add_error(&field, &message);
        }
    }

    /// Message for `field`, if it failed validation
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Keeps only the errors whose field satisfies `keep`
    pub fn filtered(&self, mut keep: impl FnMut(&str) -> bool) -> ValidationResult {
        let mut filtered = ValidationResult::new();
        for (field, message) in &self.errors {
            if keep(field.as_str()) {
                filtered.add_error(field, message);
            }
        }
        filtered
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.errors
            .iter()
            .map(|(field, message)| ValidationError {
                field: field.clone(),
                message: message.clone(),
            })
            .collect()
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}
