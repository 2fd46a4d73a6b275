//! # History Error Types
//!
//! Error types for the history view, its collaborators and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      History Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   View          │  │   Store         │  │     Host                │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NoSelection    │  │  Unavailable    │  │  Io                     │ │
//! │  │  SaleNotFound   │  │  InvalidSnapshot│  │                         │ │
//! │  │  Core/Receipt   │  │  Io             │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  Configuration  │   A failed cancellation is NOT an error here:     │
//! │  │                 │   it is reported to the operator through          │
//! │  │  InvalidConfig  │   HostBridge::alert and the view stays as it was. │
//! │  │  LoadFailed     │                                                   │
//! │  │  SaveFailed     │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::{CoreError, ReceiptError, ValidationError};
use thiserror::Error;

/// Result type alias for view operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// View Errors
// =============================================================================

/// Errors raised by `HistoryView` actions.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// An action needs a selected sale and there is none.
    #[error("No sale is selected")]
    NoSelection,

    /// The requested sale is not in the store.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Domain error from caja-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Store failure while reading.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Host refused a save or navigation request.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<ReceiptError> for HistoryError {
    fn from(err: ReceiptError) -> Self {
        HistoryError::Core(CoreError::Receipt(err))
    }
}

impl From<ValidationError> for HistoryError {
    fn from(err: ValidationError) -> Self {
        HistoryError::Core(CoreError::Validation(err))
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the external sales store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or rejected the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A snapshot could not be parsed.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Reading a snapshot file failed.
    #[error("Store I/O failed: {0}")]
    Io(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidSnapshot(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

// =============================================================================
// Host Errors
// =============================================================================

/// Errors from the host environment (browser shell, filesystem).
#[derive(Debug, Error)]
pub enum HostError {
    /// Writing the document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors from loading, validating or saving `caja.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl HistoryError {
    /// Returns true if the error came from operator input rather than the
    /// environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            HistoryError::NoSelection
                | HistoryError::SaleNotFound(_)
                | HistoryError::Core(CoreError::Validation(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_errors_wrap_through_core() {
        let err: HistoryError = ReceiptError::EmptyPhone.into();
        assert!(matches!(err, HistoryError::Core(CoreError::Receipt(_))));
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_user_errors() {
        assert!(HistoryError::NoSelection.is_user_error());
        let validation: HistoryError = ValidationError::Required {
            field: "reason".into(),
        }
        .into();
        assert!(validation.is_user_error());
        assert!(!HistoryError::Store(StoreError::Unavailable("down".into())).is_user_error());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::from(serde_json::from_str::<u32>("x").unwrap_err());
        assert!(err.to_string().starts_with("Invalid snapshot"));
        assert_eq!(
            HistoryError::SaleNotFound("1042".into()).to_string(),
            "Sale not found: 1042"
        );
    }
}
