//! Field-level validators shared by the form types.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::report::ValidationReport;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern")
    })
}

/// Required string: present and not blank.
pub fn require(report: &mut ValidationReport, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        report.add(field, format!("{field} is required"));
        return false;
    }
    true
}

/// Required email with a basic shape check.
pub fn require_email(report: &mut ValidationReport, field: &str, value: &str) -> bool {
    if !require(report, field, value) {
        return false;
    }
    if !email_pattern().is_match(value.trim()) {
        report.add(field, "must be a valid email address");
        return false;
    }
    true
}

/// Optional ISO date (`YYYY-MM-DD`).
pub fn parse_date(
    report: &mut ValidationReport,
    field: &str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            report.add(field, "must be a date in YYYY-MM-DD format");
            None
        }
    }
}

/// Optional integer field.
pub fn parse_i64(report: &mut ValidationReport, field: &str, value: Option<&str>) -> Option<i64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            report.add(field, "must be a whole number");
            None
        }
    }
}

/// Optional small integer field (counts, floor numbers).
pub fn parse_i32(report: &mut ValidationReport, field: &str, value: Option<&str>) -> Option<i32> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            report.add(field, "must be a whole number");
            None
        }
    }
}

/// Optional non-negative decimal field.
pub fn parse_amount(
    report: &mut ValidationReport,
    field: &str,
    value: Option<&str>,
) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(parsed) if parsed >= 0.0 => Some(parsed),
        Ok(_) => {
            report.add(field, "must not be negative");
            None
        }
        Err(_) => {
            report.add(field, "must be a number");
            None
        }
    }
}

/// Optional enum-like field. Unrecognized values are rejected at this
/// boundary instead of being written through as free-form strings.
pub fn parse_enum<T: DeserializeOwned>(
    report: &mut ValidationReport,
    field: &str,
    value: Option<&str>,
) -> Option<T> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_value(Value::String(raw.to_string())) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            report.add(field, format!("{raw} is not a recognized value"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homewiz_core::models::room::RoomStatus;

    #[test]
    fn email_shape_is_checked() {
        let mut report = ValidationReport::new();
        assert!(require_email(&mut report, "email", "ada@example.com"));
        assert!(!require_email(&mut report, "email", "not-an-email"));
        assert!(!report.is_valid);
    }

    #[test]
    fn unrecognized_enum_values_are_rejected() {
        let mut report = ValidationReport::new();
        let parsed: Option<RoomStatus> = parse_enum(&mut report, "status", Some("AVAILABLE"));
        assert_eq!(parsed, Some(RoomStatus::Available));

        let bogus: Option<RoomStatus> = parse_enum(&mut report, "status", Some("HAUNTED"));
        assert_eq!(bogus, None);
        assert!(report.errors.contains_key("status"));
    }

    #[test]
    fn blank_optionals_are_skipped_without_errors() {
        let mut report = ValidationReport::new();
        assert_eq!(parse_date(&mut report, "d", Some("  ")), None);
        assert_eq!(parse_i64(&mut report, "n", None), None);
        assert!(report.is_valid);
    }
}
