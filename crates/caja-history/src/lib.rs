//! # caja-history: Sales History Page
//!
//! The view layer of the sales-history page. It owns filter, selection and
//! prompt state, and drives the three operator actions through injected
//! collaborators.
//!
//! ## Module Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          caja-history                                   │
//! │                                                                         │
//! │   view.rs ──────── HistoryView (filters, selection, actions)            │
//! │      │                                                                  │
//! │      ├── overlay.rs ── Overlay { Idle | SharePrompt | CancelPrompt }    │
//! │      ├── store.rs ──── SalesRepository, SaleCanceller, InMemoryStore    │
//! │      └── host.rs ───── HostBridge (save, open, alert), FsHost           │
//! │                                                                         │
//! │   config.rs ────── HistoryConfig (caja.toml + CAJA_* env)               │
//! │   error.rs ─────── HistoryError, StoreError, HostError, ConfigError     │
//! │   bin/boleta.rs ── prints a sale from a JSON snapshot                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use caja_history::{FsHost, HistoryConfig, HistoryView, InMemoryStore};
//! use caja_core::SaleId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HistoryConfig::load(None)?;
//! let store = Arc::new(InMemoryStore::load("sales.json".as_ref())?);
//! let host = Arc::new(FsHost::new("."));
//!
//! let mut view = HistoryView::new(store.clone(), store, host, config.receipt_options());
//! view.select(&SaleId::from(1042))?;
//! view.download_document()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod overlay;
pub mod store;
pub mod view;

pub use config::HistoryConfig;
pub use error::{ConfigError, HistoryError, HistoryResult, HostError, StoreError};
pub use host::{FsHost, HostBridge};
pub use overlay::Overlay;
pub use store::{InMemoryStore, SaleCanceller, SalesRepository, StoreSnapshot};
pub use view::{CancelRequest, HistoryView};

/// Blocking alert shown when the store does not accept a cancellation.
pub const CANCEL_FAILED_MESSAGE: &str = "No se pudo anular la venta";
