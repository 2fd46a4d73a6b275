//! # Sale Filter
//!
//! Derives the visible list and its totals from the full sale collection.
//!
//! ## Conjunctive Filter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A sale is visible iff ALL four predicates hold:                        │
//! │                                                                         │
//! │   text    : id contains term  OR  summary contains term (any case)     │
//! │   date    : dateFrom <= local calendar day <= dateTo  (both inclusive) │
//! │   payment : "all"  OR  paymentMethod == selected                       │
//! │   seller  : "all"  OR  user_id == selected (as strings)                │
//! │                                                                         │
//! │  Unset predicates are always true. The collection is borrowed, never   │
//! │  mutated, and the input order is kept.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::filter::{HistoryStats, SaleFilter};
//! use chrono::Utc;
//!
//! let sales = Vec::new();
//! let filter = SaleFilter::default();
//! let visible = filter.apply(&sales, &Utc);
//! let stats = HistoryStats::from_sales(visible.iter().copied());
//! assert_eq!(stats.sale_count, 0);
//! ```

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{PaymentMethod, Sale, UserId};

/// Select value meaning "no filter".
pub const ALL: &str = "all";

// =============================================================================
// Payment / Seller Selectors
// =============================================================================

/// The payment-method select box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaymentFilter {
    #[default]
    All,
    Method(PaymentMethod),
}

impl PaymentFilter {
    /// Parses a select value; `"all"` or empty means no filter.
    pub fn from_select(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
            PaymentFilter::All
        } else {
            PaymentFilter::Method(PaymentMethod::from(value))
        }
    }

    /// Checks a sale against the selected method.
    pub fn matches(&self, sale: &Sale) -> bool {
        match self {
            PaymentFilter::All => true,
            PaymentFilter::Method(method) => &sale.payment_method == method,
        }
    }
}

/// The seller select box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SellerFilter {
    #[default]
    All,
    User(UserId),
}

impl SellerFilter {
    /// Parses a select value; `"all"` or empty means no filter.
    pub fn from_select(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
            SellerFilter::All
        } else {
            SellerFilter::User(UserId::from(value))
        }
    }

    /// Checks a sale against the selected seller. Sales without a seller
    /// only pass when no seller is selected.
    pub fn matches(&self, sale: &Sale) -> bool {
        match self {
            SellerFilter::All => true,
            SellerFilter::User(id) => sale.user_id.as_ref() == Some(id),
        }
    }
}

impl fmt::Display for PaymentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFilter::All => f.write_str(ALL),
            PaymentFilter::Method(method) => write!(f, "{}", method),
        }
    }
}

impl fmt::Display for SellerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SellerFilter::All => f.write_str(ALL),
            SellerFilter::User(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for PaymentFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PaymentFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PaymentFilter::from_select(&raw))
    }
}

impl Serialize for SellerFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SellerFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SellerFilter::from_select(&raw))
    }
}

// =============================================================================
// Sale Filter
// =============================================================================

/// Every filter input on the history page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleFilter {
    /// Free-text term; empty matches all.
    pub search: String,
    /// Inclusive lower bound on the local calendar day.
    #[ts(as = "Option<String>")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the local calendar day.
    #[ts(as = "Option<String>")]
    pub date_to: Option<NaiveDate>,
    #[ts(as = "String")]
    pub payment: PaymentFilter,
    #[ts(as = "String")]
    pub seller: SellerFilter,
}

impl SaleFilter {
    /// Returns true if no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.payment == PaymentFilter::All
            && self.seller == SellerFilter::All
    }

    /// Text predicate: id substring, or summary substring ignoring case.
    pub fn matches_text(&self, sale: &Sale) -> bool {
        let term = self.search.as_str();
        if term.is_empty() {
            return true;
        }

        if sale.id_text().contains(term) {
            return true;
        }

        sale.summary
            .as_deref()
            .map(|summary| summary.to_lowercase().contains(&term.to_lowercase()))
            .unwrap_or(false)
    }

    /// Date predicate on the sale's calendar day in `tz`. Both bounds are
    /// inclusive; a missing bound is open.
    pub fn matches_date<Tz: TimeZone>(&self, sale: &Sale, tz: &Tz) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }

        let day = sale.date.with_timezone(tz).date_naive();

        if let Some(from) = self.date_from {
            if day < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if day > to {
                return false;
            }
        }
        true
    }

    /// Conjunction of all four predicates.
    pub fn matches<Tz: TimeZone>(&self, sale: &Sale, tz: &Tz) -> bool {
        self.matches_text(sale)
            && self.matches_date(sale, tz)
            && self.payment.matches(sale)
            && self.seller.matches(sale)
    }

    /// Derives the visible list, keeping the collection's order.
    pub fn apply<'a, Tz: TimeZone>(&self, sales: &'a [Sale], tz: &Tz) -> Vec<&'a Sale> {
        sales.iter().filter(|s| self.matches(s, tz)).collect()
    }
}

// =============================================================================
// Aggregate Stats
// =============================================================================

/// Totals shown above the list, computed over the filtered view.
///
/// Cancelled sales stay visible in the list but add nothing to
/// `total_sold` or `sale_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_sold: Money,
    pub sale_count: usize,
    pub cancelled_count: usize,
}

impl HistoryStats {
    /// Aggregates over any iterator of sales.
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        sales
            .into_iter()
            .fold(HistoryStats::default(), |mut stats, sale| {
                if sale.is_cancelled() {
                    stats.cancelled_count += 1;
                } else {
                    stats.total_sold = match stats.total_sold.checked_add(sale.total) {
                        Some(total) => total,
                        None => {
                            warn!(sale_id = %sale.id_text(), "Sales total overflows; saturating");
                            if sale.total.is_negative() {
                                Money::from_pesos(i64::MIN)
                            } else {
                                Money::from_pesos(i64::MAX)
                            }
                        }
                    };
                    stats.sale_count += 1;
                }
                stats
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SaleId, SaleStatus};
    use chrono::{DateTime, FixedOffset, Utc};

    fn santiago() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        santiago()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sale(id: &str, date: DateTime<Utc>, total: i64, method: &str, user: Option<&str>) -> Sale {
        Sale {
            id: Some(SaleId::from(id)),
            date,
            total: Money::from_pesos(total),
            status: SaleStatus::Completed,
            payment_method: PaymentMethod::from(method),
            payment_details: None,
            items: Vec::new(),
            observation: None,
            user_id: user.map(UserId::from),
            summary: None,
        }
    }

    fn fixture() -> Vec<Sale> {
        let mut voided = sale("1044", local(2024, 1, 20, 12), 9000, "Tarjeta", Some("8"));
        voided.status = SaleStatus::Cancelled;

        let mut with_summary = sale("2001", local(2024, 1, 31, 23), 4500, "Transferencia", Some("7"));
        with_summary.summary = Some("Leche Entera, Pan Amasado".to_string());

        vec![
            sale("1042", local(2024, 1, 1, 0), 15000, "Efectivo", Some("7")),
            sale("1043", local(2024, 1, 15, 10), 3000, "efectivo", None),
            voided,
            with_summary,
            sale("2002", local(2024, 2, 1, 0), 7000, "Efectivo", Some("7")),
        ]
    }

    fn ids(sales: &[&Sale]) -> Vec<String> {
        sales.iter().map(|s| s.id_text().to_string()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let sales = fixture();
        let filter = SaleFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&sales, &santiago()).len(), sales.len());
    }

    #[test]
    fn test_text_filter_id_and_summary() {
        let sales = fixture();
        let mut filter = SaleFilter {
            search: "104".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&sales, &santiago())), ["1042", "1043", "1044"]);

        filter.search = "pan amasado".to_string();
        assert_eq!(ids(&filter.apply(&sales, &santiago())), ["2001"]);

        filter.search = "LECHE".to_string();
        assert_eq!(ids(&filter.apply(&sales, &santiago())), ["2001"]);
    }

    #[test]
    fn test_date_range_is_inclusive_on_both_ends() {
        let sales = fixture();
        let filter = SaleFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        // 1042 sits exactly on dateFrom, 2001 late on dateTo, 2002 on Feb 1st.
        assert_eq!(
            ids(&filter.apply(&sales, &santiago())),
            ["1042", "1043", "1044", "2001"]
        );
    }

    #[test]
    fn test_date_uses_viewer_zone() {
        // 2024-01-31 23:00 in Santiago is 2024-02-01 02:00 UTC.
        let sales = vec![sale("1", local(2024, 1, 31, 23), 100, "Efectivo", None)];
        let filter = SaleFilter {
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        assert_eq!(filter.apply(&sales, &santiago()).len(), 1);
        assert_eq!(filter.apply(&sales, &Utc).len(), 0);
    }

    #[test]
    fn test_open_bounds() {
        let sales = fixture();
        let only_from = SaleFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        assert_eq!(ids(&only_from.apply(&sales, &santiago())), ["2001", "2002"]);

        let only_to = SaleFilter {
            date_to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert_eq!(ids(&only_to.apply(&sales, &santiago())), ["1042"]);
    }

    #[test]
    fn test_payment_filter_normalizes_spelling() {
        let sales = fixture();
        let filter = SaleFilter {
            payment: PaymentFilter::from_select("Efectivo"),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter.apply(&sales, &santiago())),
            ["1042", "1043", "2002"]
        );
        assert_eq!(PaymentFilter::from_select("all"), PaymentFilter::All);
    }

    #[test]
    fn test_seller_filter_compares_as_strings() {
        let sales = fixture();
        let filter = SaleFilter {
            seller: SellerFilter::User(UserId::from(7)),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter.apply(&sales, &santiago())),
            ["1042", "2001", "2002"]
        );
        assert_eq!(SellerFilter::from_select("ALL"), SellerFilter::All);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let sales = fixture();
        let filter = SaleFilter {
            search: "20".to_string(),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            payment: PaymentFilter::from_select("Transferencia"),
            seller: SellerFilter::from_select("7"),
            ..Default::default()
        };

        for s in &sales {
            let expected = filter.matches_text(s)
                && filter.matches_date(s, &santiago())
                && filter.payment.matches(s)
                && filter.seller.matches(s);
            assert_eq!(filter.matches(s, &santiago()), expected);
        }
        assert_eq!(ids(&filter.apply(&sales, &santiago())), ["2001"]);
    }

    #[test]
    fn test_apply_does_not_mutate() {
        let sales = fixture();
        let before = sales.clone();
        let filter = SaleFilter {
            search: "1".to_string(),
            ..Default::default()
        };
        let _ = filter.apply(&sales, &santiago());
        assert_eq!(sales, before);
    }

    #[test]
    fn test_stats_total_saturates() {
        let sales = vec![
            sale("1", local(2024, 1, 10, 12), i64::MAX - 10, "Efectivo", None),
            sale("2", local(2024, 1, 10, 13), 100, "Efectivo", None),
        ];
        let stats = HistoryStats::from_sales(&sales);

        assert_eq!(stats.total_sold, Money::from_pesos(i64::MAX));
        assert_eq!(stats.sale_count, 2);
    }

    #[test]
    fn test_stats_exclude_cancelled() {
        let sales = fixture();
        let filter = SaleFilter {
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let visible = filter.apply(&sales, &santiago());
        let stats = HistoryStats::from_sales(visible.iter().copied());

        assert_eq!(visible.len(), 4);
        assert_eq!(stats.total_sold, Money::from_pesos(15000 + 3000 + 4500));
        assert_eq!(stats.sale_count, 3);
        assert_eq!(stats.cancelled_count, 1);
    }

    #[test]
    fn test_filter_wire_shape() {
        let json = r#"{"search":"","dateFrom":"2024-01-01","dateTo":null,"payment":"all","seller":"7"}"#;
        let filter: SaleFilter = serde_json::from_str(json).unwrap();
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.payment, PaymentFilter::All);
        assert_eq!(filter.seller, SellerFilter::User(UserId::from("7")));

        let back = serde_json::to_value(&filter).unwrap();
        assert_eq!(back["payment"], "all");
        assert_eq!(back["seller"], "7");
    }
}
