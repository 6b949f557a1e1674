//! Invoice draft controller.
//!
//! Holds the in-memory invoice being edited, derives its totals, and drives the
//! save / generate / preview calls against the invoice backend.

pub mod adjustment;
pub mod config;
pub mod currency;
pub mod draft;
pub mod editor;
pub mod validation;
pub mod workflow;

pub use crate::adjustment::{AdjustmentMode, AdjustmentSetting, ShippingSetting, TotalPolicy, Totals};
pub use crate::config::BackendConfig;
pub use crate::currency::Currency;
pub use crate::draft::{InvoiceDraft, InvoiceItem, ItemField, ItemId, ItemList};
pub use crate::editor::InvoiceEditor;
pub use crate::workflow::{ArtifactWorkflow, PreviewHandle, SaveOutcome, SubmitOutcome, WorkflowError};

/// Initialise `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
