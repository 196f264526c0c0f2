//! Validation outcome: a validity flag plus field -> message errors.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result of validating one form payload.
#[derive(Debug, Clone, Serialize, Error)]
#[error("validation failed for {} field(s)", errors.len())]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Field name -> human-readable problem.
    pub errors: BTreeMap<String, String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.insert(field.into(), message.into());
    }

    /// `Ok(value)` when valid, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationReport> {
        if self.is_valid { Ok(value) } else { Err(self) }
    }
}
