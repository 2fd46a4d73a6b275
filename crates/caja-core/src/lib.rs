//! # caja-core: Pure Logic for the Sales History Page
//!
//! Everything the sales-history page computes lives here as pure functions
//! with zero I/O dependencies: filtering, aggregate stats, currency
//! formatting, receipt layout and share-link construction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sales History Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web front end (page shell)                   │   │
//! │  │    Filter bar ──► Sale list ──► Detail pane ──► Overlays        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 caja-history (HistoryView)                      │   │
//! │  │    select, download_document, confirm_share, confirm_cancel     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  filter   │  │  receipt  │  │   │
//! │  │   │   Sale    │  │   Money   │  │ SaleFilter│  │ document  │  │   │
//! │  │   │   User    │  │  $15.000  │  │   stats   │  │  share    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, SaleItem, User, PaymentMethod, etc.)
//! - [`money`] - Whole-peso `Money` and the single currency formatter
//! - [`filter`] - Conjunctive sale filter and aggregate stats
//! - [`receipt`] - Printable receipt document and share-link generation
//! - [`error`] - Domain error types
//! - [`validation`] - Input normalization for the page controls
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::money::{format_currency, Money};
//!
//! assert_eq!(format_currency(Money::from_pesos(15000)), "$15.000");
//! assert_eq!(Money::from_pesos(1000).to_string(), "$1.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ReceiptError, ValidationError};
pub use filter::{HistoryStats, PaymentFilter, SaleFilter, SellerFilter};
pub use money::{format_currency, Money};
pub use receipt::{ReceiptDocument, ReceiptOptions};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of digits a local mobile number must have before sharing.
///
/// Country and mobile prefixes are supplied by the share-link builder, so
/// the operator only types the 8 local digits.
pub const SHARE_PHONE_DIGITS: usize = 8;

/// Display label for a sale whose seller cannot be resolved.
pub const UNKNOWN_SELLER: &str = "Desconocido";

/// Maximum length of the free-text search box.
pub const MAX_SEARCH_LEN: usize = 100;

/// Item names longer than this are cut in the share message.
pub const SHARE_ITEM_NAME_MAX: usize = 20;
