//! # Receipt Formatter
//!
//! Turns a sale and its seller into the two artifacts the history page hands
//! to the host: a printable ticket and a prefilled share link.
//!
//! ## Output Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Receipt Formatter                                 │
//! │                                                                         │
//! │   Sale + Seller + ReceiptOptions                                        │
//! │        │                                                                │
//! │        ├──► ReceiptDocument::build ──► rows (cursor) ──► encode()       │
//! │        │                                   ESC/POS bytes, boleta_N.prn  │
//! │        │                                                                │
//! │        └──► share_link ──► plain text ──► percent-encode ──► URL        │
//! │                                                                         │
//! │   Both share: ticket_code, format_receipt_date, format_currency         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every fixed string (store name, address, footer, phone prefix, URL
//! template) and the viewer's UTC offset come in through [`ReceiptOptions`],
//! so identical input always yields identical output. The one exception is
//! [`ticket_code`] for a sale without an id.

pub mod document;
pub mod escpos;
pub mod layout;
pub mod share;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::Sale;

pub use document::{Align, DocumentLine, Ink, LineStyle, ReceiptDocument, TextSize};
pub use share::{share_link, share_text};

/// Extension for saved receipt documents (raw printer data).
pub const DOCUMENT_EXTENSION: &str = "prn";

/// Default share deep link. `{phone}` and `{text}` are substituted.
pub const DEFAULT_SHARE_URL: &str = "https://wa.me/{phone}?text={text}";

/// Chile country code (56) followed by the mobile prefix (9).
pub const DEFAULT_PHONE_PREFIX: &str = "569";

// =============================================================================
// Options
// =============================================================================

/// Store header and footer printed on every receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreInfo {
    pub name: String,
    pub address: String,
    pub footer: Vec<String>,
}

impl Default for StoreInfo {
    fn default() -> Self {
        StoreInfo {
            name: "Caja POS".to_string(),
            address: "Av. Principal 123, Santiago".to_string(),
            footer: vec![
                "¡Gracias por su compra!".to_string(),
                "Conserve esta boleta".to_string(),
            ],
        }
    }
}

/// Thermal paper roll width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperWidth {
    #[serde(rename = "58mm")]
    Mm58,
    #[default]
    #[serde(rename = "80mm")]
    Mm80,
}

impl PaperWidth {
    /// Characters per line in the printer's default font.
    pub const fn columns(&self) -> usize {
        match self {
            PaperWidth::Mm58 => 32,
            PaperWidth::Mm80 => 48,
        }
    }
}

impl std::str::FromStr for PaperWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "58" | "58mm" => Ok(PaperWidth::Mm58),
            "80" | "80mm" => Ok(PaperWidth::Mm80),
            other => Err(format!("Unknown paper width: '{}'. Valid: 58mm, 80mm", other)),
        }
    }
}

/// Share-link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
    /// Prepended to the local digits.
    pub phone_prefix: String,
    /// Deep link with `{phone}` and `{text}` placeholders.
    pub url_template: String,
    /// Column budget used to align descriptions and amounts.
    pub columns: usize,
}

impl Default for ShareSettings {
    fn default() -> Self {
        ShareSettings {
            phone_prefix: DEFAULT_PHONE_PREFIX.to_string(),
            url_template: DEFAULT_SHARE_URL.to_string(),
            columns: 32,
        }
    }
}

/// Everything the formatter needs besides the sale and seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOptions {
    pub store: StoreInfo,
    pub paper: PaperWidth,
    pub share: ShareSettings,
    /// The viewer's UTC offset, used for printed dates.
    pub offset: FixedOffset,
}

impl Default for ReceiptOptions {
    fn default() -> Self {
        ReceiptOptions {
            store: StoreInfo::default(),
            paper: PaperWidth::default(),
            share: ShareSettings::default(),
            offset: Utc.fix(),
        }
    }
}

// =============================================================================
// Shared Fields
// =============================================================================

/// Ticket code printed as "Boleta: T-XXXXXX".
///
/// Last 6 characters of the sale id, left-padded with `0`. A sale without an
/// id gets the last 6 digits of the current millisecond clock instead; that
/// code is not reproducible and is logged.
///
/// ## Example
/// ```rust
/// use caja_core::receipt::ticket_code;
/// use caja_core::{Sale, SaleId};
/// # let mut sale: Sale = serde_json::from_str(r#"{"date":"2024-01-15T14:30:00Z","total":0}"#).unwrap();
/// sale.id = Some(SaleId::from(1042));
/// assert_eq!(ticket_code(&sale), "T-001042");
/// ```
pub fn ticket_code(sale: &Sale) -> String {
    match sale.id.as_ref().map(|id| id.as_str()).filter(|id| !id.is_empty()) {
        Some(id) => {
            let chars: Vec<char> = id.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(6)..].iter().collect();
            format!("T-{:0>6}", tail)
        }
        None => {
            let millis = Utc::now().timestamp_millis();
            warn!(millis, "Sale has no id; ticket code taken from the clock");
            format!("T-{:06}", millis.rem_euclid(1_000_000))
        }
    }
}

/// Sale timestamp as printed: `dd-mm-YYYY HH:MM` at the viewer's offset.
pub fn format_receipt_date(date: &DateTime<Utc>, offset: &FixedOffset) -> String {
    date.with_timezone(offset).format("%d-%m-%Y %H:%M").to_string()
}

/// Suggested file name for a saved document: `boleta_<id>.prn`.
///
/// Characters other than ASCII letters, digits and `-` become `_`, so a
/// free-form id cannot name a directory.
pub fn document_filename(sale: &Sale) -> String {
    let id: String = match sale.id_text() {
        "" => "sin_id".to_string(),
        id => id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect(),
    };
    format!("boleta_{}.{}", id, DOCUMENT_EXTENSION)
}

// =============================================================================
// Unit Tests
// =============================================================================
