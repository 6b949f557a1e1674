//! Loading a stored invoice `data` document back into a draft.
//!
//! Stored documents come from several client generations, so every field is
//! optional and a few legacy spellings are accepted.

use chrono::NaiveDate;
use serde::Deserialize;

use super::items::ItemList;
use super::models::{InvoiceDraft, InvoiceItem, ItemId};
use crate::adjustment::{AdjustmentMode, AdjustmentSetting, ShippingSetting};
use crate::currency::{find_currency, Currency};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SavedItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit_cost: Option<f64>,
    #[serde(alias = "showDescription", alias = "showDesc")]
    pub show_description: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SavedCurrency {
    Code(String),
    Full(Currency),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SavedInvoiceData {
    pub from: Option<String>,
    pub to: Option<String>,
    pub items: Vec<SavedItem>,
    pub invoice_number: Option<String>,
    pub issued_date: Option<String>,
    pub due_date: Option<String>,
    pub payment_details: Option<String>,
    pub terms: Option<String>,
    pub tax_percent: Option<f64>,
    pub discount_percent: Option<f64>,
    pub shipping_amount: Option<f64>,
    pub tax_type: Option<String>,
    pub discount_type: Option<String>,
    pub show_tax: Option<bool>,
    pub show_discount: Option<bool>,
    pub show_shipping: Option<bool>,
    pub logo_url: Option<String>,
    pub currency: Option<SavedCurrency>,
    pub currency_symbol: Option<String>,
    pub currency_label: Option<String>,
}

impl SavedItem {
    fn into_item(self) -> InvoiceItem {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .map(ItemId::from)
            .unwrap_or_else(ItemId::generate);

        let mut item = InvoiceItem::with_id(id);
        item.name = self.name.unwrap_or_default();
        item.description = self.description.unwrap_or_default();
        item.set_quantity(self.quantity.unwrap_or(1.0));
        item.set_unit_cost(self.unit_cost.unwrap_or(0.0));
        item.show_description = self.show_description.unwrap_or(false);
        item
    }
}

fn parse_date(field: &str, value: Option<String>) -> Option<NaiveDate> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Stored values are either plain dates or full ISO timestamps.
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("dropping unparseable {} '{}': {}", field, raw, e);
            None
        }
    }
}

fn parse_mode(value: Option<String>) -> AdjustmentMode {
    value
        .as_deref()
        .and_then(AdjustmentMode::from_wire)
        .unwrap_or_default()
}

fn resolve_currency(data: &SavedInvoiceData) -> Currency {
    match &data.currency {
        Some(SavedCurrency::Full(currency)) => currency.clone(),
        Some(SavedCurrency::Code(code)) => {
            let mut currency = find_currency(code).unwrap_or_else(|| Currency {
                code: code.clone(),
                symbol: code.clone(),
                label: code.clone(),
            });
            if let Some(symbol) = &data.currency_symbol {
                currency.symbol = symbol.clone();
            }
            if let Some(label) = &data.currency_label {
                currency.label = label.clone();
            }
            currency
        }
        None => Currency::default(),
    }
}

impl InvoiceDraft {
    /// Replace-wholesale constructor used when an existing invoice is opened.
    pub fn from_saved(data: SavedInvoiceData) -> Self {
        let currency = resolve_currency(&data);

        let items: Vec<InvoiceItem> = data.items.into_iter().map(SavedItem::into_item).collect();
        let items = if items.is_empty() {
            ItemList::with_blank_item()
        } else {
            ItemList::from_items(items)
        };

        let tax = AdjustmentSetting::restore(
            data.show_tax.unwrap_or(true),
            parse_mode(data.tax_type),
            data.tax_percent.unwrap_or(0.0),
        );
        let discount = AdjustmentSetting::restore(
            data.show_discount.unwrap_or(false),
            parse_mode(data.discount_type),
            data.discount_percent.unwrap_or(0.0),
        );
        let shipping = ShippingSetting::restore(
            data.show_shipping.unwrap_or(true),
            data.shipping_amount.unwrap_or(0.0),
        );

        Self {
            from: data.from.unwrap_or_default(),
            to: data.to.unwrap_or_default(),
            invoice_number: data.invoice_number.unwrap_or_default(),
            issued_date: parse_date("issued_date", data.issued_date),
            due_date: parse_date("due_date", data.due_date),
            items,
            payment_details: data.payment_details.unwrap_or_default(),
            terms: data.terms.unwrap_or_default(),
            tax,
            discount,
            shipping,
            logo_url: data.logo_url.filter(|url| !url.trim().is_empty()),
            currency,
        }
    }
}
