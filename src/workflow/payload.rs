//! Wire payloads sent to the invoice backend.

use serde::{Deserialize, Serialize};

use crate::adjustment::{AdjustmentMode, TotalPolicy};
use crate::draft::{InvoiceDraft, InvoiceItem};

use super::WorkflowError;

/// Flat invoice document understood by the renderer and stored as `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePayload {
    pub from: String,
    pub to: String,
    pub items: Vec<InvoiceItem>,
    pub invoice_number: String,
    pub issued_date: String,
    pub due_date: String,
    pub payment_details: String,
    pub terms: String,
    pub tax_type: AdjustmentMode,
    pub tax_percent: f64,
    pub discount_type: AdjustmentMode,
    pub discount_percent: f64,
    pub shipping_type: AdjustmentMode,
    pub shipping_amount: f64,
    pub show_tax: bool,
    pub show_discount: bool,
    pub show_shipping: bool,
    pub logo_url: Option<String>,
    pub currency: String,
    pub currency_symbol: String,
    pub currency_label: String,
    pub subtotal: f64,
    pub total: f64,
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Map a draft to its wire form. Deterministic and side-effect free.
pub fn build_payload(draft: &InvoiceDraft, policy: TotalPolicy) -> InvoicePayload {
    let totals = draft.totals(policy);

    InvoicePayload {
        from: draft.from.clone(),
        to: draft.to.clone(),
        items: draft.items.as_slice().to_vec(),
        invoice_number: draft.invoice_number.clone(),
        issued_date: format_date(draft.issued_date),
        due_date: format_date(draft.due_date),
        payment_details: draft.payment_details.clone(),
        terms: draft.terms.clone(),
        tax_type: draft.tax.mode(),
        tax_percent: draft.tax.value(),
        discount_type: draft.discount.mode(),
        discount_percent: draft.discount.value(),
        shipping_type: AdjustmentMode::Fixed,
        shipping_amount: draft.shipping.value(),
        show_tax: draft.tax.enabled(),
        show_discount: draft.discount.enabled(),
        show_shipping: draft.shipping.enabled(),
        logo_url: draft.logo_url.clone(),
        currency: draft.currency.code.clone(),
        currency_symbol: draft.currency.symbol.clone(),
        currency_label: draft.currency.label.clone(),
        subtotal: totals.subtotal,
        total: totals.total,
    }
}

/// Payload for the renderer: unnamed lines are dropped, and rendering is
/// refused when there is nothing meaningful to render.
pub fn render_payload(draft: &InvoiceDraft, policy: TotalPolicy) -> Result<InvoicePayload, WorkflowError> {
    if draft.from.trim().is_empty() || draft.to.trim().is_empty() {
        return Err(WorkflowError::NotRenderable(
            "Fill \"From\" and \"To\" fields.".to_string(),
        ));
    }

    let mut payload = build_payload(draft, policy);
    payload.items.retain(InvoiceItem::has_name);
    if payload.items.is_empty() {
        return Err(WorkflowError::NotRenderable(
            "Add at least one valid item.".to_string(),
        ));
    }
    Ok(payload)
}

/// Body of `POST /api/invoices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveInvoiceRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub data: InvoicePayload,
    pub issued_date: String,
    pub due_date: String,
    pub status: InvoiceStatus,
    pub currency: String,
    pub currency_symbol: String,
    pub currency_label: String,
}

impl SaveInvoiceRequest {
    pub fn draft(user_id: impl Into<String>, client_id: Option<String>, data: InvoicePayload) -> Self {
        Self {
            user_id: user_id.into(),
            client_id,
            issued_date: data.issued_date.clone(),
            due_date: data.due_date.clone(),
            status: InvoiceStatus::Draft,
            currency: data.currency.clone(),
            currency_symbol: data.currency_symbol.clone(),
            currency_label: data.currency_label.clone(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!(
                "invalid status '{}'. Must be one of: draft, sent, paid, overdue, cancelled",
                other
            )),
        }
    }
}

/// Body of `PUT /api/invoices/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdateRequest {
    pub status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
