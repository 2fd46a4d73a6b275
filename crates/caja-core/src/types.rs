//! # Domain Types
//!
//! Sale and user records as the external store hands them to the history
//! page.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    SaleItem     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (SaleId)    │   │  name           │   │  id (UserId)    │       │
//! │  │  date           │   │  sku?           │   │  name           │       │
//! │  │  total (Money)  │   │  price (Money)  │   └─────────────────┘       │
//! │  │  status         │   │  quantity       │                              │
//! │  │  paymentMethod  │   └─────────────────┘   ┌─────────────────┐       │
//! │  │  items[]        │                         │     Seller      │       │
//! │  │  user_id?       │ ── resolved against ──► │  Known(name)    │       │
//! │  └─────────────────┘      the directory      │  Unknown        │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Normalization at the Boundary
//! The store mixes numeric and string ids and spells payment methods
//! freely. `SaleId`/`UserId` accept both JSON numbers and strings and
//! always compare as strings; `PaymentMethod` folds known spellings into
//! one variant. Call sites never compare raw values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ReceiptError;
use crate::money::Money;
use crate::UNKNOWN_SELLER;

// =============================================================================
// Identifiers
// =============================================================================

/// Raw id as it arrives from the store: either a number or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Signed(i64),
    Unsigned(u64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
        #[ts(export)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                $name(n.to_string())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| $name(raw.into()))
            }
        }
    };
}

string_id!(
    /// Sale identifier. Numeric store ids are kept in their decimal form.
    SaleId
);

string_id!(
    /// User (seller) identifier, compared as a string.
    UserId
);

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale. The only transition is `Completed → Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Sale was paid and stands.
    #[default]
    Completed,
    /// Sale was voided by an operator.
    #[serde(alias = "canceled")]
    Cancelled,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
///
/// The store sends a free-form string; known spellings (any case, Spanish
/// or English) fold into a variant, anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PaymentMethod {
    /// Physical cash ("Efectivo").
    #[default]
    Cash,
    /// Card on an external terminal ("Tarjeta").
    Card,
    /// Bank transfer ("Transferencia").
    Transfer,
    /// Split tender ("Mixto").
    Mixed,
    /// Unrecognized method, kept as sent.
    Other(String),
}

impl PaymentMethod {
    /// Returns true for cash-equivalent methods.
    ///
    /// Only cash receipts print amount tendered and change.
    #[inline]
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    /// The label shown on screen and printed on the receipt.
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::Mixed => "Mixto",
            PaymentMethod::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.trim().to_lowercase().as_str() {
            "efectivo" | "cash" => PaymentMethod::Cash,
            "tarjeta" | "card" => PaymentMethod::Card,
            "transferencia" | "transfer" => PaymentMethod::Transfer,
            "mixto" | "mixed" => PaymentMethod::Mixed,
            _ => PaymentMethod::Other(s.trim().to_string()),
        };
        Ok(method)
    }
}

impl From<&str> for PaymentMethod {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl Serialize for PaymentMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PaymentMethod::from(raw.as_str()))
    }
}

// =============================================================================
// Payment Details
// =============================================================================

/// Cash tender details. Present only for cash-like payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentDetails {
    /// Amount the customer handed over.
    #[serde(default)]
    pub amount: Option<Money>,
    /// Change returned to the customer.
    #[serde(default)]
    pub change: Option<Money>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale, frozen at the time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Unit price.
    pub price: Money,
    /// Units sold. Unsigned, so a negative count is refused when parsing.
    pub quantity: u32,
}

impl SaleItem {
    /// Line total (`price × quantity`).
    ///
    /// ## Errors
    /// `ReceiptError::AmountOverflow` if the product does not fit.
    pub fn line_total(&self) -> Result<Money, ReceiptError> {
        self.price
            .checked_mul_quantity(i64::from(self.quantity))
            .ok_or_else(|| ReceiptError::AmountOverflow {
                item: self.name.clone(),
                price: self.price.pesos(),
                quantity: self.quantity,
            })
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A past sale as held by the external store. Read-only on this page
/// except for the cancellation transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default)]
    pub id: Option<SaleId>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub total: Money,
    #[serde(default)]
    pub status: SaleStatus,
    #[ts(as = "String")]
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_details: Option<PaymentDetails>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    /// Cancellation reason, set only when cancelled.
    #[serde(default)]
    pub observation: Option<String>,
    #[serde(rename = "user_id", alias = "userId", default)]
    pub user_id: Option<UserId>,
    /// Optional precomputed text (e.g. item names) searched by the filter.
    #[serde(default)]
    pub summary: Option<String>,
}

impl Sale {
    /// Checks whether the sale has been voided.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == SaleStatus::Cancelled
    }

    /// The id as text, empty when the store sent none.
    pub fn id_text(&self) -> &str {
        self.id.as_ref().map(SaleId::as_str).unwrap_or("")
    }

    /// Returns a copy reflecting a confirmed cancellation.
    ///
    /// Only `status` and `observation` change; `total` is untouched.
    pub fn cancelled(&self, reason: impl Into<String>) -> Sale {
        Sale {
            status: SaleStatus::Cancelled,
            observation: Some(reason.into()),
            ..self.clone()
        }
    }

    /// Amount tendered for cash receipts, defaulting to the sale total.
    pub fn amount_tendered(&self) -> Money {
        self.payment_details
            .and_then(|d| d.amount)
            .unwrap_or(self.total)
    }

    /// Change returned for cash receipts, defaulting to zero.
    pub fn change_given(&self) -> Money {
        self.payment_details
            .and_then(|d| d.change)
            .unwrap_or_default()
    }
}

// =============================================================================
// User & Seller
// =============================================================================

/// A user from the external directory. Only the name is used here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// The seller printed on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seller {
    /// Resolved from the user directory.
    Known(String),
    /// `user_id` absent or not in the directory.
    Unknown,
}

impl Seller {
    /// Resolves a seller by id. Missing or unmatched ids degrade to
    /// `Seller::Unknown`.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::{Seller, User, UserId};
    ///
    /// let users = vec![User { id: UserId::from(7), name: "Ana".into() }];
    /// assert_eq!(Seller::resolve(&users, Some(&UserId::from("7"))).name(), "Ana");
    /// assert_eq!(Seller::resolve(&users, None).name(), "Desconocido");
    /// ```
    pub fn resolve(users: &[User], user_id: Option<&UserId>) -> Seller {
        user_id
            .and_then(|id| users.iter().find(|u| &u.id == id))
            .map(|u| Seller::Known(u.name.clone()))
            .unwrap_or(Seller::Unknown)
    }

    /// Display name, with the placeholder for unknown sellers.
    pub fn name(&self) -> &str {
        match self {
            Seller::Known(name) => name,
            Seller::Unknown => UNKNOWN_SELLER,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
