//! # Error Types
//!
//! Domain-specific error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                          │
//! │  ├── CoreError        - Wraps the two below                            │
//! │  ├── ValidationError  - Page input that cannot be used                 │
//! │  └── ReceiptError     - Document / share-link generation faults        │
//! │                                                                         │
//! │  caja-history errors (separate crate)                                  │
//! │  └── HistoryError     - View actions, store and config failures        │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                              │
//! │        ReceiptError ────┴─► CoreError ─► HistoryError ─► Host alert    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures on the page normally just disable a control. These
//! types exist for callers that bypass the control gating.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Lookups and cancellation state belong to the view, so the core only
/// wraps its input and rendering failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Receipt generation error (wraps ReceiptError).
    #[error("Receipt error: {0}")]
    Receipt(#[from] ReceiptError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Receipt Error
// =============================================================================

/// Failures while rendering a receipt document or share link.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// `price × quantity` does not fit in the money type.
    #[error("Line total overflows for item '{item}': {price} x {quantity}")]
    AmountOverflow {
        item: String,
        price: i64,
        quantity: u32,
    },

    /// The destination phone had no digits left after normalization.
    #[error("Phone number has no digits")]
    EmptyPhone,

    /// The share URL template lacks a required placeholder.
    #[error("Share URL template must contain {placeholder}")]
    InvalidTemplate { placeholder: &'static str },
}

// =============================================================================
// Unit Tests
// =============================================================================
