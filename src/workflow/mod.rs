//! Workflow module - turning a draft into artifacts and saved records.
//!
//! - `payload` - wire schema and the draft to payload mapping
//! - `backend` - the `InvoiceBackend` seam and its error type
//! - `http` - `reqwest` implementation of the backend
//! - `artifact` - rendered binaries and MIME detection
//! - `handle` - released-exactly-once handles to artifacts
//! - `download` - download sinks and filenames

pub mod artifact;
pub mod backend;
pub mod download;
pub mod handle;
pub mod http;
pub mod payload;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::adjustment::TotalPolicy;
use crate::config::BackendConfig;
use crate::draft::InvoiceDraft;
use crate::validation::{validate_draft, ValidationErrors};

pub use artifact::{Artifact, ArtifactKind};
pub use backend::{ApiAck, BackendError, InvoiceBackend, SaveInvoiceResponse};
pub use download::{download_filename, DirectoryDownloadSink, DownloadSink};
pub use handle::{BlobHandle, HandleStats, ObjectUrlRegistry, PreviewHandle, PreviewSlot};
pub use http::HttpInvoiceBackend;
pub use payload::{build_payload, render_payload, InvoicePayload, InvoiceStatus, SaveInvoiceRequest};

const SAVE_FAILED_FALLBACK: &str = "Failed to save invoice.";

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The draft has nothing the renderer can use.
    #[error("{0}")]
    NotRenderable(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("could not write download: {0}")]
    Delivery(#[from] io::Error),
}

impl WorkflowError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NotRenderable(message) => message.clone(),
            Self::Backend(err) => err.user_message(),
            Self::Delivery(err) => format!("Could not save the downloaded invoice: {}", err),
        }
    }
}

/// Result of `save_draft`. Validation failures never reach the network.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { invoice_id: Option<String> },
    ValidationFailed(ValidationErrors),
    RequestFailed(String),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Saved { .. } => "Invoice saved.".to_string(),
            Self::ValidationFailed(errors) => errors.to_user_message(),
            Self::RequestFailed(message) => message.clone(),
        }
    }
}

/// Progress of the combined save-then-download action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Saving,
    Saved,
    SaveFailed,
    Downloading,
    Done,
    /// Downloaded, but the save did not go through.
    DoneWithWarning,
    /// The download itself failed.
    Failed,
}

impl SubmitState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::DoneWithWarning | Self::Failed)
    }
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub save: SaveOutcome,
    pub download: Result<PathBuf, WorkflowError>,
}

impl SubmitOutcome {
    pub fn state(&self) -> SubmitState {
        match (&self.download, self.save.is_saved()) {
            (Err(_), _) => SubmitState::Failed,
            (Ok(_), true) => SubmitState::Done,
            (Ok(_), false) => SubmitState::DoneWithWarning,
        }
    }

    pub fn invoice_id(&self) -> Option<&str> {
        match &self.save {
            SaveOutcome::Saved { invoice_id } => invoice_id.as_deref(),
            _ => None,
        }
    }

    /// The message shown to the user. Each terminal path reads differently.
    pub fn message(&self) -> String {
        match (&self.download, self.save.is_saved()) {
            (Ok(_), true) => "Invoice saved and downloaded successfully!".to_string(),
            (Ok(_), false) => format!(
                "Invoice downloaded (not saved to database). {}",
                self.save.message()
            ),
            (Err(err), true) => format!("Invoice saved, but the download failed: {}", err.user_message()),
            (Err(err), false) => format!(
                "Invoice was not saved and the download failed: {}\n{}",
                err.user_message(),
                self.save.message()
            ),
        }
    }
}

/// Drives generate, preview and save against an `InvoiceBackend`.
pub struct ArtifactWorkflow {
    backend: Arc<dyn InvoiceBackend>,
    sink: Arc<dyn DownloadSink>,
    registry: ObjectUrlRegistry,
    policy: TotalPolicy,
    state: watch::Sender<SubmitState>,
}

impl ArtifactWorkflow {
    pub fn new(backend: Arc<dyn InvoiceBackend>, sink: Arc<dyn DownloadSink>, policy: TotalPolicy) -> Self {
        let (state, _) = watch::channel(SubmitState::Idle);
        Self {
            backend,
            sink,
            registry: ObjectUrlRegistry::new(),
            policy,
            state,
        }
    }

    /// HTTP backend and directory downloads, both taken from `config`.
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let backend = HttpInvoiceBackend::new(config.clone())?;
        let sink = DirectoryDownloadSink::new(config.download_dir.clone());
        Ok(Self::new(Arc::new(backend), Arc::new(sink), config.total_policy))
    }

    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    pub fn policy(&self) -> TotalPolicy {
        self.policy
    }

    pub fn state(&self) -> SubmitState {
        *self.state.borrow()
    }

    /// Watch submit progress.
    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    fn set_state(&self, next: SubmitState) {
        log::debug!("submit state -> {:?}", next);
        self.state.send_replace(next);
    }

    pub fn build_payload(&self, draft: &InvoiceDraft) -> InvoicePayload {
        build_payload(draft, self.policy)
    }

    /// Generate the PDF and hand it to the download sink. The transient handle
    /// is released as soon as delivery returns, whatever the outcome.
    pub async fn request_download(&self, draft: &InvoiceDraft) -> Result<PathBuf, WorkflowError> {
        let payload = render_payload(draft, self.policy)?;
        let artifact = self.backend.generate_invoice(&payload).await?;

        let handle = self.registry.create(artifact);
        let filename = download_filename(&draft.to);
        let delivered = self.sink.deliver(&handle, &filename).await;
        handle.release();

        let path = delivered?;
        log::info!("invoice '{}' downloaded to {}", draft.invoice_number, path.display());
        Ok(path)
    }

    /// Render a preview. The caller owns the returned handle and must release
    /// the previous one before holding a new one (see `PreviewSlot`).
    pub async fn request_preview(&self, draft: &InvoiceDraft) -> Result<PreviewHandle, WorkflowError> {
        let payload = render_payload(draft, self.policy)?;
        let artifact = self.backend.preview_invoice(&payload).await?;
        Ok(self.registry.create(artifact))
    }

    pub async fn save_draft(&self, draft: &InvoiceDraft, user_id: Option<&str>) -> SaveOutcome {
        self.save_draft_for_client(draft, user_id, None).await
    }

    /// Validate, then persist the draft with status `draft`.
    pub async fn save_draft_for_client(
        &self,
        draft: &InvoiceDraft,
        user_id: Option<&str>,
        client_id: Option<&str>,
    ) -> SaveOutcome {
        if let Err(errors) = validate_draft(draft, user_id) {
            log::warn!("invoice not saved, {} required fields missing", errors.len());
            return SaveOutcome::ValidationFailed(errors);
        }

        let request = SaveInvoiceRequest::draft(
            user_id.unwrap_or_default(),
            client_id.map(str::to_string),
            self.build_payload(draft),
        );

        match self.backend.save_invoice(&request).await {
            Ok(response) if response.success => {
                log::info!(
                    "invoice '{}' saved (id {:?})",
                    draft.invoice_number,
                    response.invoice_id
                );
                SaveOutcome::Saved {
                    invoice_id: response.invoice_id,
                }
            }
            Ok(response) => {
                let message = response
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| SAVE_FAILED_FALLBACK.to_string());
                log::warn!("invoice save rejected: {}", message);
                SaveOutcome::RequestFailed(message)
            }
            Err(err) => {
                log::error!("invoice save failed: {}", err);
                SaveOutcome::RequestFailed(err.user_message())
            }
        }
    }

    /// Save, then download regardless of how the save went.
    pub async fn submit(&self, draft: &InvoiceDraft, user_id: Option<&str>) -> SubmitOutcome {
        self.set_state(SubmitState::Saving);
        let save = self.save_draft(draft, user_id).await;
        self.set_state(if save.is_saved() {
            SubmitState::Saved
        } else {
            SubmitState::SaveFailed
        });

        self.set_state(SubmitState::Downloading);
        let download = self.request_download(draft).await;

        let outcome = SubmitOutcome { save, download };
        self.set_state(outcome.state());
        outcome
    }

    pub async fn update_status(
        &self,
        invoice_id: &str,
        status: InvoiceStatus,
        user_id: Option<&str>,
    ) -> Result<ApiAck, WorkflowError> {
        Ok(self.backend.update_status(invoice_id, status, user_id).await?)
    }

    pub async fn delete_invoice(&self, invoice_id: &str, user_id: Option<&str>) -> Result<ApiAck, WorkflowError> {
        Ok(self.backend.delete_invoice(invoice_id, user_id).await?)
    }

    /// Upload a logo and return its hosted URL.
    pub async fn upload_logo(&self, filename: &str, data: Vec<u8>) -> Result<String, WorkflowError> {
        Ok(self.backend.upload_logo(filename, data).await?)
    }
}
