use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::items::ItemList;
use super::parse::non_negative;
use crate::adjustment::{AdjustmentSetting, ShippingSetting, TotalPolicy, Totals};
use crate::currency::Currency;

/// Stable identity of a line item. Assigned once, never regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItem {
    id: ItemId,
    pub name: String,
    pub description: String,
    quantity: f64,
    unit_cost: f64,
    pub show_description: bool,
}

impl InvoiceItem {
    /// A fresh blank line: quantity 1, unit cost 0, description hidden.
    pub fn blank() -> Self {
        Self::with_id(ItemId::generate())
    }

    pub(crate) fn with_id(id: ItemId) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            quantity: 1.0,
            unit_cost: 0.0,
            show_description: false,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn set_quantity(&mut self, quantity: f64) {
        self.quantity = non_negative(quantity);
    }

    pub fn set_unit_cost(&mut self, unit_cost: f64) {
        self.unit_cost = non_negative(unit_cost);
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_cost
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Editable fields of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
    Description,
    Quantity,
    UnitCost,
}

impl FromStr for ItemField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "quantity" => Ok(Self::Quantity),
            "unit_cost" | "unitCost" => Ok(Self::UnitCost),
            other => Err(format!("unknown item field '{}'", other)),
        }
    }
}

/// The invoice currently being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub from: String,
    pub to: String,
    pub invoice_number: String,
    pub issued_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub items: ItemList,
    pub payment_details: String,
    pub terms: String,
    pub tax: AdjustmentSetting,
    pub discount: AdjustmentSetting,
    pub shipping: ShippingSetting,
    pub logo_url: Option<String>,
    pub currency: Currency,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceDraft {
    /// Empty draft with one blank item. Tax and shipping start shown,
    /// discount hidden, both moded adjustments in percent.
    pub fn new() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            invoice_number: String::new(),
            issued_date: None,
            due_date: None,
            items: ItemList::with_blank_item(),
            payment_details: String::new(),
            terms: String::new(),
            tax: AdjustmentSetting::new(true),
            discount: AdjustmentSetting::new(false),
            shipping: ShippingSetting::new(true),
            logo_url: None,
            currency: Currency::default(),
        }
    }

    pub fn subtotal(&self) -> f64 {
        crate::adjustment::subtotal(self.items.as_slice())
    }

    pub fn totals(&self, policy: TotalPolicy) -> Totals {
        Totals::compute(self, policy)
    }
}
