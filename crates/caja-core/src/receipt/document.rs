//! # Printable Receipt
//!
//! Lays a sale out as fixed-column rows for a thermal printer.
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                   Caja POS                     │  bold, large
//! │          Av. Principal 123, Santiago           │
//! │                                                │
//! │ ---------------------------------------------- │
//! │ Boleta: T-001042                               │  bold
//! │ Fecha: 15-01-2024 14:30                        │
//! │ Vendedor: Ana                                  │
//! │ ---------------------------------------------- │
//! │ Pan                                            │  wrapped name
//! │   3 x $1.000                            $3.000 │  qty × price, line total
//! │                                                │  item spacing
//! │ ============================================== │
//! │ TOTAL                                  $15.000 │  bold, tall
//! │              *** VENTA ANULADA ***             │  red, only if cancelled
//! │ ---------------------------------------------- │
//! │ Medio de pago:                        Efectivo │
//! │ Pagó con:                              $20.000 │  cash only
//! │ Vuelto:                                 $5.000 │  cash only
//! │                                                │
//! │            ¡Gracias por su compra!             │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Rows are placed with a running cursor: each item advances it by the
//! number of wrapped name lines plus the quantity line plus a fixed gap.
//! The document height is the final cursor, so long item lists never get
//! cut off.

use crate::error::ReceiptError;
use crate::receipt::layout::{pad_between, rule, wrap_text};
use crate::receipt::{escpos, format_receipt_date, ticket_code, ReceiptOptions};
use crate::types::{Sale, Seller};

/// Blank rows after each item block.
const ITEM_SPACING: usize = 1;

/// Printed after the total of a cancelled sale.
pub const VOID_MARKER: &str = "*** VENTA ANULADA ***";

// =============================================================================
// Line Styles
// =============================================================================

/// Horizontal alignment of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Character size. `Large` doubles width, so only half the columns fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    #[default]
    Normal,
    /// Double height.
    Tall,
    /// Double height and width.
    Large,
}

/// Ink color on two-color printers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ink {
    #[default]
    Black,
    Red,
}

/// Per-row print style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineStyle {
    pub bold: bool,
    pub size: TextSize,
    pub ink: Ink,
}

impl LineStyle {
    pub const PLAIN: LineStyle = LineStyle {
        bold: false,
        size: TextSize::Normal,
        ink: Ink::Black,
    };

    pub const fn bold(self) -> Self {
        LineStyle { bold: true, ..self }
    }

    pub const fn size(self, size: TextSize) -> Self {
        LineStyle { size, ..self }
    }

    pub const fn red(self) -> Self {
        LineStyle {
            ink: Ink::Red,
            ..self
        }
    }
}

/// One positioned row of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLine {
    /// Zero-based row on the page.
    pub row: usize,
    pub text: String,
    pub align: Align,
    pub style: LineStyle,
}

// =============================================================================
// Document
// =============================================================================

/// A receipt laid out as positioned rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDocument {
    columns: usize,
    lines: Vec<DocumentLine>,
    height: usize,
}

impl ReceiptDocument {
    /// Lays out `sale` for the configured paper width.
    ///
    /// ## Errors
    /// `ReceiptError::AmountOverflow` if an item's line total overflows.
    pub fn build(
        sale: &Sale,
        seller: &Seller,
        options: &ReceiptOptions,
    ) -> Result<Self, ReceiptError> {
        let mut page = Page::new(options.paper.columns());
        let store = &options.store;

        // Header
        page.wrapped(
            &store.name,
            Align::Center,
            LineStyle::PLAIN.bold().size(TextSize::Large),
        );
        page.wrapped(&store.address, Align::Center, LineStyle::PLAIN);
        page.gap(1);
        page.rule('-');
        page.line(
            format!("Boleta: {}", ticket_code(sale)),
            Align::Left,
            LineStyle::PLAIN.bold(),
        );
        page.line(
            format!("Fecha: {}", format_receipt_date(&sale.date, &options.offset)),
            Align::Left,
            LineStyle::PLAIN,
        );
        page.wrapped(
            &format!("Vendedor: {}", seller.name()),
            Align::Left,
            LineStyle::PLAIN,
        );
        page.rule('-');

        // Items
        for item in &sale.items {
            let line_total = item.line_total()?;
            page.wrapped(&item.name, Align::Left, LineStyle::PLAIN);
            page.pair(
                &format!("  {} x {}", item.quantity, item.price),
                &line_total.to_string(),
                LineStyle::PLAIN,
            );
            page.gap(ITEM_SPACING);
        }

        // Total and void marker
        page.rule('=');
        page.pair(
            "TOTAL",
            &sale.total.to_string(),
            LineStyle::PLAIN.bold().size(TextSize::Tall),
        );
        if sale.is_cancelled() {
            page.wrapped(VOID_MARKER, Align::Center, LineStyle::PLAIN.bold().red());
            if let Some(reason) = sale.observation.as_deref().filter(|r| !r.is_empty()) {
                page.wrapped(
                    &format!("Motivo: {}", reason),
                    Align::Center,
                    LineStyle::PLAIN.red(),
                );
            }
        }
        page.rule('-');

        // Payment
        page.pair(
            "Medio de pago:",
            sale.payment_method.label(),
            LineStyle::PLAIN,
        );
        if sale.payment_method.is_cash() {
            page.pair("Pagó con:", &sale.amount_tendered().to_string(), LineStyle::PLAIN);
            page.pair("Vuelto:", &sale.change_given().to_string(), LineStyle::PLAIN);
        }

        // Footer
        if !store.footer.is_empty() {
            page.gap(1);
            for text in &store.footer {
                page.wrapped(text, Align::Center, LineStyle::PLAIN);
            }
        }

        Ok(page.finish())
    }

    /// Characters per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Rows in placement order.
    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    /// Total rows, including blank spacing rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw printer bytes (ESC/POS), ready to save as a `.prn` file.
    pub fn encode(&self) -> Vec<u8> {
        escpos::encode(self)
    }

    /// Plain-text rendering with alignment applied, one string per row.
    ///
    /// Used for on-screen previews and logs; style is dropped.
    pub fn preview(&self) -> String {
        let mut rows = vec![String::new(); self.height];
        for line in &self.lines {
            let width = line_width(self.columns, line.style.size);
            let len = line.text.chars().count();
            let indent = match line.align {
                Align::Left => 0,
                Align::Center => width.saturating_sub(len) / 2,
            };
            let indent = match line.style.size {
                // Double-width glyphs take two columns each.
                TextSize::Large => indent * 2,
                _ => indent,
            };
            rows[line.row] = format!("{}{}", " ".repeat(indent), line.text);
        }
        rows.join("\n")
    }
}

fn line_width(columns: usize, size: TextSize) -> usize {
    match size {
        TextSize::Large => columns / 2,
        _ => columns,
    }
}

// =============================================================================
// Page Builder
// =============================================================================

/// Row cursor plus the rows placed so far.
struct Page {
    columns: usize,
    cursor: usize,
    lines: Vec<DocumentLine>,
}

impl Page {
    fn new(columns: usize) -> Self {
        Page {
            columns,
            cursor: 0,
            lines: Vec::new(),
        }
    }

    fn line(&mut self, text: String, align: Align, style: LineStyle) {
        self.lines.push(DocumentLine {
            row: self.cursor,
            text,
            align,
            style,
        });
        self.cursor += 1;
    }

    /// Places `text` wrapped to the width available at `style`'s size.
    fn wrapped(&mut self, text: &str, align: Align, style: LineStyle) {
        for part in wrap_text(text, line_width(self.columns, style.size)) {
            self.line(part, align, style);
        }
    }

    fn pair(&mut self, left: &str, right: &str, style: LineStyle) {
        let text = pad_between(left, right, line_width(self.columns, style.size));
        self.line(text, Align::Left, style);
    }

    fn rule(&mut self, ch: char) {
        self.line(rule(ch, self.columns), Align::Left, LineStyle::PLAIN);
    }

    fn gap(&mut self, rows: usize) {
        self.cursor += rows;
    }

    fn finish(self) -> ReceiptDocument {
        ReceiptDocument {
            columns: self.columns,
            lines: self.lines,
            height: self.cursor,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
