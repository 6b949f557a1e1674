//! Ordered line items with stable identity.
//!
//! Every operation is total: an index outside the list is ignored rather than
//! reported, since callers only ever address rows they are displaying.

use serde::Serialize;

use super::models::{InvoiceItem, ItemField, ItemId};
use super::parse::parse_number;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ItemList {
    items: Vec<InvoiceItem>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blank_item() -> Self {
        Self {
            items: vec![InvoiceItem::blank()],
        }
    }

    pub(crate) fn from_items(items: Vec<InvoiceItem>) -> Self {
        Self { items }
    }

    /// Append a blank item and return its id.
    pub fn add_item(&mut self) -> ItemId {
        let item = InvoiceItem::blank();
        let id = item.id().clone();
        self.items.push(item);
        id
    }

    pub fn remove_item(&mut self, index: usize) -> Option<InvoiceItem> {
        if index >= self.items.len() {
            log::debug!("ignoring remove of item {} (len {})", index, self.items.len());
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Apply raw form input to one field of one item. Numeric fields go
    /// through `parse_number` and are clamped to be non-negative.
    pub fn update_field(&mut self, index: usize, field: ItemField, value: &str) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            log::debug!("ignoring update of item {} (len {})", index, self.items.len());
            return false;
        };

        match field {
            ItemField::Name => item.name = value.to_string(),
            ItemField::Description => item.description = value.to_string(),
            ItemField::Quantity => item.set_quantity(parse_number(value)),
            ItemField::UnitCost => item.set_unit_cost(parse_number(value)),
        }
        true
    }

    pub fn toggle_description(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.show_description = !item.show_description;
                true
            }
            None => false,
        }
    }

    /// Move the item at `source` to `destination`, shifting the ones between.
    /// A missing destination (drag cancelled) leaves the list untouched.
    pub fn reorder(&mut self, source: usize, destination: Option<usize>) -> bool {
        let Some(destination) = destination else {
            return false;
        };
        if source >= self.items.len() || destination >= self.items.len() {
            log::debug!(
                "ignoring reorder {} -> {} (len {})",
                source,
                destination,
                self.items.len()
            );
            return false;
        }
        if source != destination {
            let moved = self.items.remove(source);
            self.items.insert(destination, moved);
        }
        true
    }

    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, index: usize) -> Option<&InvoiceItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InvoiceItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn named_items(&self) -> impl Iterator<Item = &InvoiceItem> {
        self.items.iter().filter(|item| item.has_name())
    }
}
