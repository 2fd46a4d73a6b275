//! # Store Interfaces
//!
//! The history page reads sales and users from an external store and asks it
//! to cancel sales. It never owns that data.
//!
//! ## Collaborators
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Boundary                                   │
//! │                                                                         │
//! │   HistoryView                                                           │
//! │       │                                                                 │
//! │       ├──► SalesRepository (sync, read-only)                            │
//! │       │      sales() / users() / current_user()                         │
//! │       │                                                                 │
//! │       └──► SaleCanceller (async)                                        │
//! │              cancel_sale(id, reason) ──► Ok(true)  accepted             │
//! │                                      ──► Ok(false) refused              │
//! │                                      ──► Err(_)    not reachable        │
//! │                                                                         │
//! │   InMemoryStore implements both, loaded from a JSON snapshot:           │
//! │   { "sales": [...], "users": [...], "currentUser": {...} }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use caja_core::{Sale, SaleId, User};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Traits
// =============================================================================

/// Read-only access to the store's collections.
pub trait SalesRepository: Send + Sync {
    /// All sales, in the store's order.
    fn sales(&self) -> Vec<Sale>;

    /// The user directory.
    fn users(&self) -> Vec<User>;

    /// The operator using the page, if known.
    fn current_user(&self) -> Option<User>;
}

/// The single state-changing operation the page may request.
#[async_trait]
pub trait SaleCanceller: Send + Sync {
    /// Requests `Completed → Cancelled` for `id` with `reason` as the
    /// observation.
    ///
    /// `Ok(false)` means the store refused; `Err` means it could not be
    /// reached. The caller treats both as failure.
    async fn cancel_sale(&self, id: &SaleId, reason: &str) -> Result<bool, StoreError>;
}

// =============================================================================
// Snapshot
// =============================================================================

/// Serialized store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub current_user: Option<User>,
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Store held entirely in memory.
///
/// Backs the `boleta` tool and tests. Cancellation updates the held sale so
/// later reads see it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    sales: RwLock<Vec<Sale>>,
    users: Vec<User>,
    current_user: Option<User>,
}

impl InMemoryStore {
    /// Creates a store from a snapshot.
    pub fn new(snapshot: StoreSnapshot) -> Self {
        InMemoryStore {
            sales: RwLock::new(snapshot.sales),
            users: snapshot.users,
            current_user: snapshot.current_user,
        }
    }

    /// Parses a JSON snapshot.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        debug!(
            sales = snapshot.sales.len(),
            users = snapshot.users.len(),
            "Parsed store snapshot"
        );
        Ok(Self::new(snapshot))
    }

    /// Reads a JSON snapshot file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        info!(?path, "Loading store snapshot");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Current contents.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            sales: self.sales(),
            users: self.users.clone(),
            current_user: self.current_user.clone(),
        }
    }
}

impl SalesRepository for InMemoryStore {
    fn sales(&self) -> Vec<Sale> {
        self.sales
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn users(&self) -> Vec<User> {
        self.users.clone()
    }

    fn current_user(&self) -> Option<User> {
        self.current_user.clone()
    }
}

#[async_trait]
impl SaleCanceller for InMemoryStore {
    async fn cancel_sale(&self, id: &SaleId, reason: &str) -> Result<bool, StoreError> {
        let mut sales = self.sales.write().unwrap_or_else(PoisonError::into_inner);

        let Some(sale) = sales.iter_mut().find(|s| s.id.as_ref() == Some(id)) else {
            warn!(sale_id = %id, "Cancel requested for unknown sale");
            return Ok(false);
        };

        if sale.is_cancelled() {
            warn!(sale_id = %id, "Cancel requested for a sale that is already cancelled");
            return Ok(false);
        }

        *sale = sale.cancelled(reason);
        info!(sale_id = %id, "Sale cancelled in store");
        Ok(true)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
