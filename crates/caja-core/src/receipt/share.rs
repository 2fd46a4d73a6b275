//! # Share Link
//!
//! Builds the plain-text receipt sent through a messaging deep link.
//!
//! ````text
//! *Caja POS*
//! Av. Principal 123, Santiago
//! Boleta: T-001042
//! Fecha: 15-01-2024 14:30
//! Vendedor: Ana
//! *** VENTA ANULADA ***                ◄── cancelled sales only
//! ```                                  ◄── monospace block opens
//! Pan
//! 3 x $1.000                $3.000     ◄── padded to the column budget
//! --------------------------------
//! TOTAL:                   $15.000
//! ```                                  ◄── monospace block closes
//! Medio de pago: Efectivo
//! Pagó con: $20.000                    ◄── cash only
//! Vuelto: $5.000                       ◄── cash only
//!
//! ¡Gracias por su compra!
//! ````
//!
//! The text is percent-encoded and substituted into the configured URL
//! template along with the destination number (prefix + local digits).

use crate::error::ReceiptError;
use crate::receipt::document::VOID_MARKER;
use crate::receipt::layout::{pad_between, rule, truncate_chars};
use crate::receipt::{format_receipt_date, ticket_code, ReceiptOptions};
use crate::types::{Sale, Seller};
use crate::SHARE_ITEM_NAME_MAX;

const PHONE_PLACEHOLDER: &str = "{phone}";
const TEXT_PLACEHOLDER: &str = "{text}";
const MONOSPACE_FENCE: &str = "```";

/// Plain-text receipt for a messaging app.
///
/// ## Errors
/// `ReceiptError::AmountOverflow` if an item's line total overflows.
pub fn share_text(
    sale: &Sale,
    seller: &Seller,
    options: &ReceiptOptions,
) -> Result<String, ReceiptError> {
    let columns = options.share.columns;
    let store = &options.store;
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("*{}*", store.name));
    if !store.address.is_empty() {
        lines.push(store.address.clone());
    }
    lines.push(format!("Boleta: {}", ticket_code(sale)));
    lines.push(format!(
        "Fecha: {}",
        format_receipt_date(&sale.date, &options.offset)
    ));
    lines.push(format!("Vendedor: {}", seller.name()));
    if sale.is_cancelled() {
        lines.push(VOID_MARKER.to_string());
        if let Some(reason) = sale.observation.as_deref().filter(|r| !r.is_empty()) {
            lines.push(format!("Motivo: {}", reason));
        }
    }

    lines.push(MONOSPACE_FENCE.to_string());
    for item in &sale.items {
        let line_total = item.line_total()?;
        lines.push(truncate_chars(&item.name, SHARE_ITEM_NAME_MAX));
        lines.push(pad_between(
            &format!("{} x {}", item.quantity, item.price),
            &line_total.to_string(),
            columns,
        ));
    }
    lines.push(rule('-', columns));
    lines.push(pad_between("TOTAL:", &sale.total.to_string(), columns));
    lines.push(MONOSPACE_FENCE.to_string());

    lines.push(format!("Medio de pago: {}", sale.payment_method.label()));
    if sale.payment_method.is_cash() {
        lines.push(format!("Pagó con: {}", sale.amount_tendered()));
        lines.push(format!("Vuelto: {}", sale.change_given()));
    }

    if !store.footer.is_empty() {
        lines.push(String::new());
        lines.extend(store.footer.iter().cloned());
    }

    Ok(lines.join("\n"))
}

/// Share deep link for `sale`, addressed to `phone`.
///
/// `phone` is the local number; non-digits are dropped and the configured
/// prefix is prepended.
///
/// ## Errors
/// - `ReceiptError::EmptyPhone` if `phone` has no digits
/// - `ReceiptError::InvalidTemplate` if the URL template lacks a placeholder
/// - `ReceiptError::AmountOverflow` from the text body
pub fn share_link(
    sale: &Sale,
    seller: &Seller,
    phone: &str,
    options: &ReceiptOptions,
) -> Result<String, ReceiptError> {
    let template = &options.share.url_template;
    for placeholder in [PHONE_PLACEHOLDER, TEXT_PLACEHOLDER] {
        if !template.contains(placeholder) {
            return Err(ReceiptError::InvalidTemplate { placeholder });
        }
    }

    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ReceiptError::EmptyPhone);
    }
    let destination = format!("{}{}", options.share.phone_prefix, digits);

    let text = share_text(sale, seller, options)?;

    Ok(template
        .replace(PHONE_PLACEHOLDER, &destination)
        .replace(TEXT_PLACEHOLDER, &urlencoding::encode(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::tests::{example_sale, santiago_options};
    use crate::types::PaymentMethod;

    fn ana() -> Seller {
        Seller::Known("Ana".to_string())
    }

    #[test]
    fn test_example_share_text() {
        let text = share_text(&example_sale(), &ana(), &santiago_options()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines.contains(&"Boleta: T-001042"));
        assert!(lines.contains(&"Fecha: 15-01-2024 14:30"));
        assert!(lines.contains(&"Vendedor: Ana"));
        assert!(lines.contains(&"Pagó con: $20.000"));
        assert!(lines.contains(&"Vuelto: $5.000"));

        let qty = lines.iter().find(|l| l.starts_with("3 x $1.000")).unwrap();
        assert_eq!(qty.chars().count(), 32);
        assert!(qty.ends_with(" $3.000"));

        let total = lines.iter().find(|l| l.starts_with("TOTAL:")).unwrap();
        assert!(total.ends_with("$15.000"));
        assert_eq!(total.chars().count(), 32);
    }

    #[test]
    fn test_items_and_total_inside_monospace_block() {
        let text = share_text(&example_sale(), &ana(), &santiago_options()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        let open = lines.iter().position(|l| *l == "```").unwrap();
        let close = open + 1 + lines[open + 1..].iter().position(|l| *l == "```").unwrap();
        let qty = lines.iter().position(|l| l.starts_with("3 x")).unwrap();
        let total = lines.iter().position(|l| l.starts_with("TOTAL:")).unwrap();

        assert!(open < qty && qty < total && total < close);
    }

    #[test]
    fn test_long_item_names_are_cut() {
        let mut sale = example_sale();
        sale.items[0].name = "Galletas de chocolate con chips".to_string();
        let text = share_text(&sale, &ana(), &santiago_options()).unwrap();
        assert!(text.lines().any(|l| l == "Galletas de chocolat"));
        assert!(!text.contains("chips"));
    }

    #[test]
    fn test_non_cash_has_no_tender_lines() {
        let mut sale = example_sale();
        sale.payment_method = PaymentMethod::Transfer;
        let text = share_text(&sale, &ana(), &santiago_options()).unwrap();
        assert!(text.contains("Medio de pago: Transferencia"));
        assert!(!text.contains("Pagó con"));
        assert!(!text.contains("Vuelto"));
    }

    #[test]
    fn test_cancelled_share_text_is_marked() {
        let sale = example_sale().cancelled("error de cobro");
        let text = share_text(&sale, &ana(), &santiago_options()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        let seller = lines.iter().position(|l| *l == "Vendedor: Ana").unwrap();
        let marker = lines.iter().position(|l| *l == VOID_MARKER).unwrap();
        let reason = lines
            .iter()
            .position(|l| *l == "Motivo: error de cobro")
            .unwrap();
        let item = lines.iter().position(|l| *l == "Pan").unwrap();

        assert!(seller < marker && marker < reason && reason < item);
    }

    #[test]
    fn test_completed_share_text_has_no_marker() {
        let text = share_text(&example_sale(), &ana(), &santiago_options()).unwrap();
        assert!(!text.contains(VOID_MARKER));
        assert!(!text.contains("Motivo:"));
    }

    #[test]
    fn test_share_link_prefixes_and_encodes() {
        let link = share_link(&example_sale(), &ana(), "1234 5678", &santiago_options()).unwrap();

        assert!(link.starts_with("https://wa.me/56912345678?text="));
        let (_, encoded) = link.split_once("?text=").unwrap();
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('\n'));

        let decoded = urlencoding::decode(encoded).unwrap();
        assert_eq!(
            decoded,
            share_text(&example_sale(), &ana(), &santiago_options()).unwrap()
        );
    }

    #[test]
    fn test_share_link_custom_template_and_prefix() {
        let mut opts = santiago_options();
        opts.share.phone_prefix = "54911".to_string();
        opts.share.url_template = "https://api.whatsapp.com/send?phone={phone}&text={text}".to_string();

        let link = share_link(&example_sale(), &ana(), "22223333", &opts).unwrap();
        assert!(link.starts_with("https://api.whatsapp.com/send?phone=5491122223333&text="));
    }

    #[test]
    fn test_share_link_errors() {
        let opts = santiago_options();
        assert!(matches!(
            share_link(&example_sale(), &ana(), "sin número", &opts),
            Err(ReceiptError::EmptyPhone)
        ));

        let mut bad = santiago_options();
        bad.share.url_template = "https://wa.me/{phone}".to_string();
        assert!(matches!(
            share_link(&example_sale(), &ana(), "12345678", &bad),
            Err(ReceiptError::InvalidTemplate { placeholder: "{text}" })
        ));
    }
}
