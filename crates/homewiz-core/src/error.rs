//! Error taxonomy, classification, and the bounded error log.
//!
//! Raw backend failures never cross this crate's boundary: every error is
//! classified into a category with a fixed severity, a user-safe message,
//! and retry/report flags, then recorded in a bounded log.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Default capacity of the in-memory error log.
pub const ERROR_LOG_CAPACITY: usize = 100;

/// Failure taxonomy. Every backend error maps to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Network,
    Authentication,
    Authorization,
    Validation,
    Conflict,
    NotFound,
    RateLimit,
    ServerError,
    ClientError,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorCategory {
    /// Static severity mapping.
    pub fn severity(self) -> ErrorSeverity {
        match self {
            ErrorCategory::Validation | ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Network
            | ErrorCategory::Conflict
            | ErrorCategory::RateLimit
            | ErrorCategory::ClientError
            | ErrorCategory::Unknown => ErrorSeverity::Medium,
            ErrorCategory::Authentication
            | ErrorCategory::Authorization
            | ErrorCategory::ServerError => ErrorSeverity::High,
        }
    }

    /// Only transient failures are worth retrying.
    pub fn retryable(self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::RateLimit | ErrorCategory::ServerError
        )
    }

    /// Fixed user-facing message; raw backend text is never echoed.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorCategory::Network => {
                "Connection problem. Please check your internet connection and try again."
            }
            ErrorCategory::Authentication => "Your session has expired. Please sign in again.",
            ErrorCategory::Authorization => "You don't have permission to perform this action.",
            ErrorCategory::Validation => "Some of the provided information is invalid.",
            ErrorCategory::Conflict => "This record conflicts with one that already exists.",
            ErrorCategory::NotFound => "The requested record could not be found.",
            ErrorCategory::RateLimit => "Too many requests. Please wait a moment and try again.",
            ErrorCategory::ServerError => {
                "The service is having trouble right now. Please try again shortly."
            }
            ErrorCategory::ClientError => "The request could not be processed.",
            ErrorCategory::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Suggested recovery actions shown alongside the user message.
    pub fn recovery_actions(self) -> &'static [&'static str] {
        match self {
            ErrorCategory::Network => &["Check your connection", "Retry"],
            ErrorCategory::Authentication => &["Sign in again"],
            ErrorCategory::Authorization => &["Contact an administrator"],
            ErrorCategory::Validation => &["Review the highlighted fields"],
            ErrorCategory::Conflict => &["Use a different identifier", "Refresh and retry"],
            ErrorCategory::NotFound => &["Refresh the list"],
            ErrorCategory::RateLimit => &["Wait and retry"],
            ErrorCategory::ServerError => &["Retry", "Contact support if this persists"],
            ErrorCategory::ClientError => &["Refresh and retry"],
            ErrorCategory::Unknown => &["Retry", "Contact support if this persists"],
        }
    }
}

/// A classified failure.
///
/// `message` is the technical description for logs; `user_message` is the
/// only text UI layers are expected to display.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{category:?}: {message}")]
pub struct EnhancedError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub message: String,
    pub user_message: String,
    pub retryable: bool,
    /// Whether the error should be forwarded to a monitoring sink.
    pub reportable: bool,
    /// Operation label, e.g. `buildings.create`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl EnhancedError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        let severity = category.severity();
        Self {
            category,
            severity,
            message: message.into(),
            user_message: category.user_message().to_string(),
            retryable: category.retryable(),
            reportable: severity >= ErrorSeverity::High,
            operation: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn recovery_actions(&self) -> &'static [&'static str] {
        self.category.recovery_actions()
    }
}

/// Classify a structured storage error.
pub fn classify_store_error(err: &StoreError) -> ErrorCategory {
    match err {
        StoreError::NotConfigured(_) => ErrorCategory::ClientError,
        StoreError::Network(_) => ErrorCategory::Network,
        StoreError::NotFound { .. } => ErrorCategory::NotFound,
        StoreError::Conflict { .. } => ErrorCategory::Conflict,
        StoreError::Decode(_) => ErrorCategory::Unknown,
        StoreError::Backend {
            status,
            code,
            message,
        } => classify_parts(message, code.as_deref(), Some(*status)),
    }
}

/// Classify from loosely structured parts: a message, an optional backend
/// error code, and an optional HTTP status. Unparseable input falls back to
/// [`ErrorCategory::Unknown`]; this function never fails.
pub fn classify_parts(message: &str, code: Option<&str>, status: Option<u16>) -> ErrorCategory {
    if let Some(code) = code {
        // PostgREST codes: PGRST116 = no/too many rows, PGRST3xx = JWT.
        if code == "PGRST116" {
            return ErrorCategory::NotFound;
        }
        if code.starts_with("PGRST3") {
            return ErrorCategory::Authentication;
        }
        // SQLSTATE: unique violation / foreign-key or data violations.
        if code == "23505" {
            return ErrorCategory::Conflict;
        }
        if code == "23503" || code.starts_with("22") {
            return ErrorCategory::Validation;
        }
    }

    if let Some(status) = status {
        return match status {
            401 => ErrorCategory::Authentication,
            403 => ErrorCategory::Authorization,
            404 | 406 => ErrorCategory::NotFound,
            409 => ErrorCategory::Conflict,
            400 | 422 => ErrorCategory::Validation,
            429 => ErrorCategory::RateLimit,
            500..=599 => ErrorCategory::ServerError,
            400..=499 => ErrorCategory::ClientError,
            _ => ErrorCategory::Unknown,
        };
    }

    let lower = message.to_ascii_lowercase();
    if ["fetch", "network", "connection", "timeout", "timed out"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return ErrorCategory::Network;
    }

    ErrorCategory::Unknown
}

/// Classify a storage error into an [`EnhancedError`] tagged with the
/// operation that produced it.
pub fn classify(err: &StoreError, operation: &str) -> EnhancedError {
    EnhancedError::new(classify_store_error(err), err.to_string()).with_operation(operation)
}

/// Aggregate counters over the error log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorLogStats {
    pub total: u64,
    pub by_category: HashMap<ErrorCategory, u64>,
    pub by_severity: HashMap<ErrorSeverity, u64>,
}

/// Bounded, in-memory log of classified errors.
///
/// Capacity-bounded circular buffer: the oldest entry is evicted when full.
/// Owned by the service context, not a global.
#[derive(Debug)]
pub struct ErrorLog {
    entries: Mutex<VecDeque<EnhancedError>>,
    capacity: usize,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::with_capacity(ERROR_LOG_CAPACITY)
    }
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record a classified error, evicting the oldest entry when full.
    /// Reportable errors are also forwarded to the tracing sink.
    pub fn record(&self, err: &EnhancedError) {
        if err.reportable {
            tracing::error!(
                category = ?err.category,
                severity = ?err.severity,
                operation = err.operation.as_deref().unwrap_or("-"),
                message = %err.message,
                "reportable error"
            );
        }
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(err.clone());
    }

    /// Most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<EnhancedError> {
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.iter().rev().take(n).rev().cloned().collect()
    }

    pub fn stats(&self) -> ErrorLogStats {
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut stats = ErrorLogStats {
            total: entries.len() as u64,
            ..Default::default()
        };
        for entry in entries.iter() {
            *stats.by_category.entry(entry.category).or_default() += 1;
            *stats.by_severity.entry(entry.severity).or_default() += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_to_exactly_one_retry_class() {
        let retryable = [
            ErrorCategory::Network,
            ErrorCategory::RateLimit,
            ErrorCategory::ServerError,
        ];
        for category in [
            ErrorCategory::Network,
            ErrorCategory::Authentication,
            ErrorCategory::Authorization,
            ErrorCategory::Validation,
            ErrorCategory::Conflict,
            ErrorCategory::NotFound,
            ErrorCategory::RateLimit,
            ErrorCategory::ServerError,
            ErrorCategory::ClientError,
            ErrorCategory::Unknown,
        ] {
            assert_eq!(category.retryable(), retryable.contains(&category));
        }
    }

    #[test]
    fn classifies_network_from_message_substring() {
        assert_eq!(
            classify_parts("failed to fetch rows", None, None),
            ErrorCategory::Network
        );
        assert_eq!(
            classify_parts("connection reset by peer", None, None),
            ErrorCategory::Network
        );
    }

    #[test]
    fn classifies_by_status_and_code() {
        assert_eq!(
            classify_parts("", None, Some(429)),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            classify_parts("", None, Some(503)),
            ErrorCategory::ServerError
        );
        assert_eq!(
            classify_parts("duplicate key", Some("23505"), Some(409)),
            ErrorCategory::Conflict
        );
        assert_eq!(
            classify_parts("no rows", Some("PGRST116"), Some(406)),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn unparseable_errors_fall_back_to_unknown_medium() {
        let err = EnhancedError::new(classify_parts("???", None, None), "???");
        assert_eq!(err.category, ErrorCategory::Unknown);
        assert_eq!(err.severity, ErrorSeverity::Medium);
        assert!(!err.reportable);
    }

    #[test]
    fn log_evicts_oldest_beyond_capacity() {
        let log = ErrorLog::with_capacity(3);
        for i in 0..5 {
            log.record(&EnhancedError::new(
                ErrorCategory::Validation,
                format!("e{i}"),
            ));
        }
        let recent = log.recent(10);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].message, "e2");
        assert_eq!(recent[2].message, "e4");
        assert_eq!(log.stats().total, 3);
    }
}
