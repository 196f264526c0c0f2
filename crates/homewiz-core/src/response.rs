//! Uniform response envelopes.
//!
//! Every CRUD operation resolves to an envelope; a `success = false`
//! envelope is the only failure surface callers ever see.

use serde::Serialize;

use crate::error::EnhancedError;

/// Envelope for single-record operations.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseResponse<T> {
    pub data: Option<T>,
    pub error: Option<EnhancedError>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DatabaseResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    /// A successful operation with no record payload (e.g. delete).
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: None,
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: EnhancedError) -> Self {
        Self {
            data: None,
            message: Some(error.user_message.clone()),
            error: Some(error),
            success: false,
        }
    }
}

/// Envelope for list operations; adds the exact total count when the
/// backend reported one.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: Option<u64>,
    pub error: Option<EnhancedError>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ListResponse<T> {
    pub fn ok(data: Vec<T>, count: Option<u64>) -> Self {
        Self {
            data,
            count,
            error: None,
            success: true,
            message: None,
        }
    }

    pub fn ok_with_message(data: Vec<T>, count: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data, count)
        }
    }

    pub fn failure(error: EnhancedError) -> Self {
        Self {
            data: Vec::new(),
            count: None,
            message: Some(error.user_message.clone()),
            error: Some(error),
            success: false,
        }
    }
}
