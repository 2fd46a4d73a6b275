//! # Overlay State
//!
//! The share and cancel prompts as one tagged state. Only one prompt can be
//! open, and each one names the sale it was opened for.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Overlay Transitions                              │
//! │                                                                         │
//! │                 open_share                 confirm_share / dismiss      │
//! │      ┌──────┐ ─────────────► SharePrompt ─────────────────────┐         │
//! │      │ Idle │                                                  │         │
//! │      └──────┘ ◄───────────────────────────────────────────────┘         │
//! │         │  ▲                                                            │
//! │         │  │ success / dismiss                                          │
//! │         │  │                                                            │
//! │         │  CancelPrompt { submitting: false } ◄── failure (alert)       │
//! │         │        │                 ▲                                    │
//! │ open_   │        │ begin_cancel    │ finish_cancel                      │
//! │ cancel  └──────► │                 │                                    │
//! │                  ▼                 │                                    │
//! │           CancelPrompt { submitting: true } ── awaiting the store       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::SaleId;
use serde::Serialize;

/// Which prompt, if any, is open over the detail pane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Overlay {
    /// No prompt.
    #[default]
    Idle,

    /// Collecting the local phone number for the share link.
    #[serde(rename_all = "camelCase")]
    SharePrompt {
        sale_id: SaleId,
        /// Digits only, at most 8.
        phone: String,
    },

    /// Collecting the cancellation reason.
    #[serde(rename_all = "camelCase")]
    CancelPrompt {
        sale_id: SaleId,
        reason: String,
        /// A cancellation request is in flight; the prompt is read-only.
        submitting: bool,
    },
}

impl Overlay {
    pub fn is_idle(&self) -> bool {
        matches!(self, Overlay::Idle)
    }

    /// The sale the open prompt refers to.
    pub fn sale_id(&self) -> Option<&SaleId> {
        match self {
            Overlay::Idle => None,
            Overlay::SharePrompt { sale_id, .. } | Overlay::CancelPrompt { sale_id, .. } => {
                Some(sale_id)
            }
        }
    }

    /// True when a cancellation request is outstanding.
    pub fn is_submitting(&self) -> bool {
        matches!(
            self,
            Overlay::CancelPrompt {
                submitting: true,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_id() {
        assert_eq!(Overlay::Idle.sale_id(), None);
        let share = Overlay::SharePrompt {
            sale_id: SaleId::from(1042),
            phone: String::new(),
        };
        assert_eq!(share.sale_id(), Some(&SaleId::from("1042")));
        assert!(!share.is_submitting());
    }

    #[test]
    fn test_wire_shape() {
        let overlay = Overlay::CancelPrompt {
            sale_id: SaleId::from(7),
            reason: "error".to_string(),
            submitting: true,
        };
        let json = serde_json::to_value(&overlay).unwrap();
        assert_eq!(json["kind"], "cancelPrompt");
        assert_eq!(json["saleId"], "7");
        assert_eq!(json["submitting"], true);
        assert!(overlay.is_submitting());

        let idle = serde_json::to_value(Overlay::Idle).unwrap();
        assert_eq!(idle["kind"], "idle");
    }
}
