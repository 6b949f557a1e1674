//! Total derivation. Pure functions, recomputed on every read.
//!
//! Percent tax and percent discount are both taken off the same subtotal;
//! the discount never reduces the base the tax is computed on.

use std::str::FromStr;

use serde::Serialize;

use crate::draft::{InvoiceDraft, InvoiceItem};

/// What to do when discounts push the total below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalPolicy {
    /// Never report a negative total.
    #[default]
    FloorAtZero,
    /// Report `subtotal + tax - discount + shipping` as is.
    Unclamped,
}

impl TotalPolicy {
    pub fn apply(self, total: f64) -> f64 {
        match self {
            Self::FloorAtZero => total.max(0.0),
            Self::Unclamped => total,
        }
    }
}

impl FromStr for TotalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" | "floor_at_zero" | "floor-at-zero" => Ok(Self::FloorAtZero),
            "unclamped" | "none" => Ok(Self::Unclamped),
            other => Err(format!("unknown total policy '{}'", other)),
        }
    }
}

pub fn subtotal(items: &[InvoiceItem]) -> f64 {
    items.iter().map(InvoiceItem::line_total).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub shipping: f64,
    pub total: f64,
}

impl Totals {
    pub fn compute(draft: &InvoiceDraft, policy: TotalPolicy) -> Self {
        let subtotal = subtotal(draft.items.as_slice());
        let tax = draft.tax.amount_for(subtotal);
        let discount = draft.discount.amount_for(subtotal);
        let shipping = draft.shipping.amount();
        let total = policy.apply(subtotal + tax - discount + shipping);

        Self {
            subtotal,
            tax,
            discount,
            shipping,
            total,
        }
    }
}
