//! Draft module - the in-memory invoice being edited.
//!
//! - `models` - items, ids and the draft aggregate
//! - `items` - ordered item list operations
//! - `saved` - loading stored invoice documents
//! - `parse` - lenient numeric input

pub mod items;
pub mod models;
pub mod parse;
pub mod saved;

pub use items::ItemList;
pub use models::{InvoiceDraft, InvoiceItem, ItemField, ItemId};
pub use saved::{SavedInvoiceData, SavedItem};
