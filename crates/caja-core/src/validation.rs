//! # Validation Module
//!
//! Normalizes what the operator types into the history page controls.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Page controls                                                │
//! │  ├── Confirm buttons disabled until input is usable                    │
//! │  └── No message shown, the action is simply unavailable                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Phone digits, cancel reason, date bounds, search term             │
//! │  └── Same rules the controls use to enable themselves                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: External store                                               │
//! │  └── Owns the cancellation and may still refuse it                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::validation::{normalize_share_phone, validate_cancel_reason};
//!
//! assert_eq!(normalize_share_phone("9 8765-4321"), "98765432");
//! assert!(validate_cancel_reason("   ").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{MAX_SEARCH_LEN, SHARE_PHONE_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Filter Inputs
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches every sale)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

/// Parses a date-range bound from the date picker.
///
/// ## Rules
/// - Empty (after trim) clears the bound → `Ok(None)`
/// - Otherwise must be `YYYY-MM-DD`
///
/// ## Example
/// ```rust
/// use caja_core::validation::parse_date_bound;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_date_bound("dateFrom", "").unwrap(), None);
/// assert_eq!(
///     parse_date_bound("dateFrom", "2024-01-31").unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31)
/// );
/// assert!(parse_date_bound("dateFrom", "31/01/2024").is_err());
/// ```
pub fn parse_date_bound(field: &str, value: &str) -> ValidationResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        })
}

// =============================================================================
// Share Phone
// =============================================================================

/// Normalizes the share-prompt phone input.
///
/// Keeps ASCII digits only and at most 8 of them. The country and mobile
/// prefixes are added later by the link builder.
pub fn normalize_share_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(SHARE_PHONE_DIGITS)
        .collect()
}

/// Validates a normalized local phone number.
///
/// ## Rules
/// - Must have exactly 8 digits (normalization already caps the length)
pub fn validate_share_phone(phone: &str) -> ValidationResult<()> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if digits < SHARE_PHONE_DIGITS {
        return Err(ValidationError::TooShort {
            field: "phone".to_string(),
            min: SHARE_PHONE_DIGITS,
        });
    }

    Ok(())
}

// =============================================================================
// Cancel Reason
// =============================================================================

/// Validates a cancellation reason.
///
/// ## Rules
/// - Must contain something other than whitespace
///
/// ## Returns
/// The trimmed reason, which becomes the sale's `observation`.
pub fn validate_cancel_reason(reason: &str) -> ValidationResult<String> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    Ok(reason.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  1042 ").unwrap(), "1042");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
        assert!(validate_search_query(&"ñ".repeat(100)).is_ok());
    }

    #[test]
    fn test_parse_date_bound() {
        assert_eq!(parse_date_bound("dateTo", "   ").unwrap(), None);
        assert_eq!(
            parse_date_bound("dateTo", " 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_date_bound("dateTo", "2023-02-29").is_err());
        assert!(parse_date_bound("dateTo", "2024-1-1x").is_err());
    }

    #[test]
    fn test_normalize_share_phone() {
        assert_eq!(normalize_share_phone("1234 5678"), "12345678");
        assert_eq!(normalize_share_phone("+56 9 1234 5678"), "56912345");
        assert_eq!(normalize_share_phone("abc"), "");
        assert_eq!(normalize_share_phone("123456789012"), "12345678");
    }

    #[test]
    fn test_validate_share_phone() {
        assert!(validate_share_phone("12345678").is_ok());
        assert!(validate_share_phone("1234567").is_err());
        assert!(validate_share_phone("").is_err());
    }

    #[test]
    fn test_validate_cancel_reason() {
        assert_eq!(
            validate_cancel_reason("  cliente se arrepintió ").unwrap(),
            "cliente se arrepintió"
        );
        assert!(validate_cancel_reason("").is_err());
        assert!(validate_cancel_reason(" \t\n ").is_err());
    }
}
