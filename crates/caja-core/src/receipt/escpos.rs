//! ESC/POS encoding for thermal printers.
//!
//! The printer is put in code page PC858 (Latin-1 with €), which covers the
//! Spanish characters receipts use. Anything outside it prints as `?`.

use crate::receipt::document::{Align, Ink, ReceiptDocument, TextSize};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// `ESC t n` table number for PC858.
const CODE_PAGE_PC858: u8 = 19;

/// Lines fed before the cut so the last row clears the cutter.
const FEED_BEFORE_CUT: u8 = 4;

/// Encodes a laid-out receipt as a single ESC/POS job.
pub fn encode(doc: &ReceiptDocument) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + doc.lines().len() * (doc.columns() + 16));

    out.extend_from_slice(&[ESC, b'@']);
    out.extend_from_slice(&[ESC, b't', CODE_PAGE_PC858]);

    let mut row = 0;
    for line in doc.lines() {
        while row < line.row {
            out.push(LF);
            row += 1;
        }

        out.extend_from_slice(&[ESC, b'a', align_code(line.align)]);
        out.extend_from_slice(&[ESC, b'E', u8::from(line.style.bold)]);
        out.extend_from_slice(&[GS, b'!', size_code(line.style.size)]);
        out.extend_from_slice(&[ESC, b'r', ink_code(line.style.ink)]);
        push_text(&mut out, &line.text);
        out.push(LF);
        row += 1;
    }

    while row < doc.height() {
        out.push(LF);
        row += 1;
    }

    // Reset styles so the next job starts clean
    out.extend_from_slice(&[ESC, b'a', 0, ESC, b'E', 0, GS, b'!', 0, ESC, b'r', 0]);
    out.extend_from_slice(&[ESC, b'd', FEED_BEFORE_CUT]);
    out.extend_from_slice(&[GS, b'V', 0]);

    out
}

fn align_code(align: Align) -> u8 {
    match align {
        Align::Left => 0,
        Align::Center => 1,
    }
}

/// `GS !` argument: high nibble is width multiplier, low nibble height.
fn size_code(size: TextSize) -> u8 {
    match size {
        TextSize::Normal => 0x00,
        TextSize::Tall => 0x01,
        TextSize::Large => 0x11,
    }
}

fn ink_code(ink: Ink) -> u8 {
    match ink {
        Ink::Black => 0,
        Ink::Red => 1,
    }
}

fn push_text(out: &mut Vec<u8>, text: &str) {
    out.extend(text.chars().map(pc858_byte));
}

/// Maps a character to its PC858 byte.
fn pc858_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        'á' => 0xA0,
        'é' => 0x82,
        'í' => 0xA1,
        'ó' => 0xA2,
        'ú' => 0xA3,
        'ñ' => 0xA4,
        'Ñ' => 0xA5,
        'ü' => 0x81,
        'Ü' => 0x9A,
        'Á' => 0xB5,
        'É' => 0x90,
        'Í' => 0xD6,
        'Ó' => 0xE0,
        'Ú' => 0xE9,
        '¿' => 0xA8,
        '¡' => 0xAD,
        '°' => 0xF8,
        '€' => 0xD5,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::tests::{example_sale, santiago_options};
    use crate::types::Seller;

    fn example_bytes() -> Vec<u8> {
        ReceiptDocument::build(
            &example_sale(),
            &Seller::Known("Ana".to_string()),
            &santiago_options(),
        )
        .unwrap()
        .encode()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_job_framing() {
        let bytes = example_bytes();
        assert!(bytes.starts_with(&[ESC, b'@', ESC, b't', CODE_PAGE_PC858]));
        assert!(bytes.ends_with(&[ESC, b'd', FEED_BEFORE_CUT, GS, b'V', 0]));
    }

    #[test]
    fn test_text_is_present() {
        let bytes = example_bytes();
        assert!(contains(&bytes, b"Boleta: T-001042"));
        assert!(contains(&bytes, b"$15.000"));
        // "Pagó con:" with ó in PC858
        assert!(contains(&bytes, &[b'P', b'a', b'g', 0xA2, b' ', b'c', b'o', b'n', b':']));
    }

    #[test]
    fn test_line_feeds_cover_document_height() {
        let doc = ReceiptDocument::build(
            &example_sale(),
            &Seller::Unknown,
            &santiago_options(),
        )
        .unwrap();
        let feeds = doc.encode().iter().filter(|&&b| b == LF).count();
        assert_eq!(feeds, doc.height());
    }

    #[test]
    fn test_red_ink_for_void_marker() {
        let sale = example_sale().cancelled("duplicada");
        let bytes = ReceiptDocument::build(&sale, &Seller::Unknown, &santiago_options())
            .unwrap()
            .encode();
        let mut marker = vec![ESC, b'r', 1];
        marker.extend_from_slice(b"*** VENTA ANULADA ***");
        assert!(contains(&bytes, &marker));
    }

    #[test]
    fn test_pc858_mapping() {
        let mut out = Vec::new();
        push_text(&mut out, "¡Año!");
        assert_eq!(out, [0xAD, b'A', 0xA4, b'o', b'!']);

        out.clear();
        push_text(&mut out, "☕\n");
        assert_eq!(out, [b'?', b'?']);
    }
}
