//! # History View
//!
//! State and actions of the sales-history page.
//!
//! ## Action Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       History View Actions                              │
//! │                                                                         │
//! │  Page Event                View Operation             Effect            │
//! │  ──────────                ──────────────             ──────            │
//! │                                                                         │
//! │  Type / pick filter ─────► set_search() etc ───────► filtered_sales()  │
//! │                                                       stats()           │
//! │                                                                         │
//! │  Click row ──────────────► select() ───────────────► stale prompt      │
//! │                                                       dismissed         │
//! │                                                                         │
//! │  Descargar ──────────────► download_document() ────► host.save_document│
//! │                                                                         │
//! │  Compartir ──► phone ────► confirm_share() ────────► host.open_url     │
//! │                                                                         │
//! │  Anular ──► reason ──────► confirm_cancel() ───────► store.cancel_sale │
//! │                              │                         │                │
//! │                              │   Ok(true)  ◄───────────┤                │
//! │                              │   local copy cancelled, prompt closed    │
//! │                              │                         │                │
//! │                              │   Ok(false) / Err ◄─────┘                │
//! │                              └── host.alert, prompt stays, sale as-is   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The view never marks a sale cancelled before the store confirms. While a
//! cancellation is in flight the prompt reports `submitting` and refuses a
//! second confirmation.

use std::sync::Arc;

use caja_core::receipt::{document_filename, share_link};
use caja_core::validation::{
    normalize_share_phone, parse_date_bound, validate_cancel_reason, validate_search_query,
    validate_share_phone,
};
use caja_core::{
    HistoryStats, PaymentFilter, ReceiptDocument, ReceiptOptions, Sale, SaleFilter, SaleId,
    Seller, SellerFilter, User,
};
use tracing::{debug, info, warn};

use crate::error::{HistoryError, HistoryResult, StoreError};
use crate::host::HostBridge;
use crate::overlay::Overlay;
use crate::store::{SaleCanceller, SalesRepository};
use crate::CANCEL_FAILED_MESSAGE;

/// A confirmed cancellation, ready to send to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub sale_id: SaleId,
    /// Trimmed reason, stored as the sale's observation.
    pub reason: String,
}

/// The sales-history page.
pub struct HistoryView {
    repo: Arc<dyn SalesRepository>,
    canceller: Arc<dyn SaleCanceller>,
    host: Arc<dyn HostBridge>,
    options: ReceiptOptions,
    filter: SaleFilter,
    selected: Option<Sale>,
    overlay: Overlay,
}

impl HistoryView {
    /// Creates a view with no filter, no selection and no prompt.
    pub fn new(
        repo: Arc<dyn SalesRepository>,
        canceller: Arc<dyn SaleCanceller>,
        host: Arc<dyn HostBridge>,
        options: ReceiptOptions,
    ) -> Self {
        HistoryView {
            repo,
            canceller,
            host,
            options,
            filter: SaleFilter::default(),
            selected: None,
            overlay: Overlay::Idle,
        }
    }

    pub fn options(&self) -> &ReceiptOptions {
        &self.options
    }

    /// The operator using the page.
    pub fn operator(&self) -> Option<User> {
        self.repo.current_user()
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn filter(&self) -> &SaleFilter {
        &self.filter
    }

    /// Sets the free-text term (trimmed, at most 100 characters).
    pub fn set_search(&mut self, query: &str) -> HistoryResult<()> {
        self.filter.search = validate_search_query(query)?;
        debug!(search = %self.filter.search, "Search changed");
        Ok(())
    }

    /// Sets the inclusive lower date bound from `YYYY-MM-DD`; empty clears it.
    pub fn set_date_from(&mut self, value: &str) -> HistoryResult<()> {
        self.filter.date_from = parse_date_bound("dateFrom", value)?;
        debug!(date_from = ?self.filter.date_from, "Date from changed");
        Ok(())
    }

    /// Sets the inclusive upper date bound from `YYYY-MM-DD`; empty clears it.
    pub fn set_date_to(&mut self, value: &str) -> HistoryResult<()> {
        self.filter.date_to = parse_date_bound("dateTo", value)?;
        debug!(date_to = ?self.filter.date_to, "Date to changed");
        Ok(())
    }

    /// Sets the payment select; `"all"` removes the filter.
    pub fn set_payment_filter(&mut self, value: &str) {
        self.filter.payment = PaymentFilter::from_select(value);
        debug!(payment = %self.filter.payment, "Payment filter changed");
    }

    /// Sets the seller select; `"all"` removes the filter.
    pub fn set_seller_filter(&mut self, value: &str) {
        self.filter.seller = SellerFilter::from_select(value);
        debug!(seller = %self.filter.seller, "Seller filter changed");
    }

    pub fn clear_filters(&mut self) {
        self.filter = SaleFilter::default();
        debug!("Filters cleared");
    }

    /// The visible list, in store order.
    ///
    /// A cancellation confirmed here is reflected even while the store
    /// still reports the sale as completed. Otherwise the store's row wins.
    pub fn filtered_sales(&self) -> Vec<Sale> {
        let mut sales = self.repo.sales();
        if let Some(selected) = self.selected.as_ref().filter(|s| s.is_cancelled()) {
            if let Some(slot) = sales
                .iter_mut()
                .find(|s| s.id == selected.id && !s.is_cancelled())
            {
                *slot = selected.clone();
            }
        }

        let visible: Vec<Sale> = self
            .filter
            .apply(&sales, &self.options.offset)
            .into_iter()
            .cloned()
            .collect();

        debug!(total = sales.len(), visible = visible.len(), "Filter applied");
        visible
    }

    /// Totals over the visible list.
    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_sales(self.filtered_sales().iter())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects a sale by id.
    ///
    /// A prompt opened for a different sale is closed, except a cancel
    /// prompt with a request in flight: it stays until the store answers,
    /// so no second cancellation can start meanwhile.
    ///
    /// ## Errors
    /// `HistoryError::SaleNotFound` if the store has no such sale.
    pub fn select(&mut self, id: &SaleId) -> HistoryResult<&Sale> {
        let sale = self
            .repo
            .sales()
            .into_iter()
            .find(|s| s.id.as_ref() == Some(id))
            .ok_or_else(|| HistoryError::SaleNotFound(id.to_string()))?;

        if self.overlay.is_submitting() {
            debug!(sale_id = %id, "Cancellation in flight; keeping its prompt");
        } else if self.overlay.sale_id().is_some_and(|open| open != id) {
            debug!(sale_id = %id, "Closing prompt for previous selection");
            self.overlay = Overlay::Idle;
        }

        debug!(sale_id = %id, "Sale selected");
        Ok(&*self.selected.insert(sale))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.overlay = Overlay::Idle;
    }

    pub fn selected(&self) -> Option<&Sale> {
        self.selected.as_ref()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Resolves the seller of `sale` from the user directory.
    pub fn seller_for(&self, sale: &Sale) -> Seller {
        let seller = Seller::resolve(&self.repo.users(), sale.user_id.as_ref());
        if seller == Seller::Unknown {
            warn!(
                sale_id = %sale.id_text(),
                user_id = ?sale.user_id,
                "Seller not found in directory"
            );
        }
        seller
    }

    fn require_selection(&self) -> HistoryResult<&Sale> {
        self.selected.as_ref().ok_or(HistoryError::NoSelection)
    }

    // =========================================================================
    // Download
    // =========================================================================

    /// Generates the selected sale's receipt and hands it to the host.
    ///
    /// ## Returns
    /// The suggested file name (`boleta_<id>.prn`).
    pub fn download_document(&self) -> HistoryResult<String> {
        let sale = self.require_selection()?;
        let seller = self.seller_for(sale);

        let document = ReceiptDocument::build(sale, &seller, &self.options)?;
        let bytes = document.encode();
        let filename = document_filename(sale);

        self.host.save_document(&filename, &bytes)?;

        info!(
            sale_id = %sale.id_text(),
            filename = %filename,
            bytes = bytes.len(),
            "Receipt downloaded"
        );
        Ok(filename)
    }

    // =========================================================================
    // Share
    // =========================================================================

    /// Opens the phone prompt for the selected sale.
    pub fn open_share(&mut self) -> bool {
        if self.overlay.is_submitting() {
            return false;
        }
        let Some(sale_id) = self.selected.as_ref().and_then(|s| s.id.clone()) else {
            return false;
        };

        self.overlay = Overlay::SharePrompt {
            sale_id,
            phone: String::new(),
        };
        true
    }

    /// Updates the phone input, keeping at most 8 digits.
    pub fn set_share_phone(&mut self, input: &str) {
        if let Overlay::SharePrompt { phone, .. } = &mut self.overlay {
            *phone = normalize_share_phone(input);
        }
    }

    /// True once the phone prompt has a full local number.
    pub fn can_share(&self) -> bool {
        match &self.overlay {
            Overlay::SharePrompt { phone, .. } => validate_share_phone(phone).is_ok(),
            _ => false,
        }
    }

    /// Builds the share link, asks the host to open it and closes the prompt.
    ///
    /// ## Returns
    /// `Ok(None)` if the prompt is not ready; otherwise the opened URL.
    pub fn confirm_share(&mut self) -> HistoryResult<Option<String>> {
        if !self.can_share() {
            return Ok(None);
        }
        let Overlay::SharePrompt { phone, .. } = &self.overlay else {
            return Ok(None);
        };

        let sale = self.require_selection()?;
        let seller = self.seller_for(sale);
        let link = share_link(sale, &seller, phone, &self.options)?;

        self.host.open_url(&link)?;
        info!(sale_id = %sale.id_text(), "Receipt shared");

        self.overlay = Overlay::Idle;
        Ok(Some(link))
    }

    /// Closes the open prompt. Refused while a cancellation is in flight.
    pub fn dismiss(&mut self) -> bool {
        if self.overlay.is_submitting() {
            return false;
        }
        self.overlay = Overlay::Idle;
        true
    }

    // =========================================================================
    // Cancel
    // =========================================================================

    /// Opens the reason prompt.
    ///
    /// No-op returning `false` when nothing is selected or the sale is
    /// already cancelled.
    pub fn open_cancel(&mut self) -> bool {
        if self.overlay.is_submitting() {
            return false;
        }
        let Some(sale) = self.selected.as_ref() else {
            return false;
        };
        if sale.is_cancelled() {
            debug!(sale_id = %sale.id_text(), "Sale already cancelled; cancel unavailable");
            return false;
        }
        let Some(sale_id) = sale.id.clone() else {
            return false;
        };

        self.overlay = Overlay::CancelPrompt {
            sale_id,
            reason: String::new(),
            submitting: false,
        };
        true
    }

    /// Updates the reason input. Ignored while submitting.
    pub fn set_cancel_reason(&mut self, text: &str) {
        if let Overlay::CancelPrompt {
            reason,
            submitting: false,
            ..
        } = &mut self.overlay
        {
            *reason = text.to_string();
        }
    }

    /// True when the reason is usable and no request is in flight.
    pub fn can_confirm_cancel(&self) -> bool {
        let Overlay::CancelPrompt {
            sale_id,
            reason,
            submitting,
        } = &self.overlay
        else {
            return false;
        };

        let still_open = self
            .selected
            .as_ref()
            .is_some_and(|s| s.id.as_ref() == Some(sale_id) && !s.is_cancelled());

        still_open && !submitting && validate_cancel_reason(reason).is_ok()
    }

    /// Marks the prompt as submitting and returns the request to send.
    ///
    /// Returns `None` if confirmation is not available, including when a
    /// request is already in flight.
    pub fn begin_cancel(&mut self) -> Option<CancelRequest> {
        if !self.can_confirm_cancel() {
            return None;
        }
        let Overlay::CancelPrompt {
            sale_id,
            reason,
            submitting,
        } = &mut self.overlay
        else {
            return None;
        };

        let reason = validate_cancel_reason(reason).ok()?;
        *submitting = true;

        Some(CancelRequest {
            sale_id: sale_id.clone(),
            reason,
        })
    }

    /// Applies the store's answer to `request`.
    ///
    /// ## Returns
    /// `true` if the sale is now cancelled locally.
    pub fn finish_cancel(
        &mut self,
        request: &CancelRequest,
        outcome: Result<bool, StoreError>,
    ) -> bool {
        let prompt_is_for_request = matches!(
            &self.overlay,
            Overlay::CancelPrompt { sale_id, .. } if sale_id == &request.sale_id
        );

        match outcome {
            Ok(true) => {
                if let Some(sale) = self
                    .selected
                    .as_mut()
                    .filter(|s| s.id.as_ref() == Some(&request.sale_id))
                {
                    *sale = sale.cancelled(request.reason.as_str());
                }
                if prompt_is_for_request {
                    self.overlay = Overlay::Idle;
                }

                let operator = self.operator().map(|u| u.name);
                info!(
                    sale_id = %request.sale_id,
                    reason = %request.reason,
                    operator = ?operator,
                    "Sale cancelled"
                );
                true
            }
            failure => {
                match &failure {
                    Ok(_) => warn!(sale_id = %request.sale_id, "Store refused cancellation"),
                    Err(e) => warn!(sale_id = %request.sale_id, error = %e, "Cancellation failed"),
                }
                let still_selected = self
                    .selected
                    .as_ref()
                    .is_some_and(|s| s.id.as_ref() == Some(&request.sale_id));
                if prompt_is_for_request {
                    if still_selected {
                        if let Overlay::CancelPrompt { submitting, .. } = &mut self.overlay {
                            *submitting = false;
                        }
                    } else {
                        self.overlay = Overlay::Idle;
                    }
                }
                self.host.alert(CANCEL_FAILED_MESSAGE);
                false
            }
        }
    }

    /// Sends the cancellation for the open prompt and applies the result.
    ///
    /// ## Returns
    /// `true` if the sale was cancelled. `false` if confirmation was not
    /// available (no external call) or the store did not accept it (the
    /// operator was alerted).
    pub async fn confirm_cancel(&mut self) -> bool {
        let Some(request) = self.begin_cancel() else {
            return false;
        };

        info!(sale_id = %request.sale_id, "Requesting cancellation");
        let canceller = Arc::clone(&self.canceller);
        let outcome = canceller
            .cancel_sale(&request.sale_id, &request.reason)
            .await;

        self.finish_cancel(&request, outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
