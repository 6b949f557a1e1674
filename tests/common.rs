#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use invoice_draft::workflow::backend::{ApiAck, BackendError, InvoiceBackend, SaveInvoiceResponse};
use invoice_draft::workflow::{Artifact, BlobHandle, DownloadSink, InvoicePayload, InvoiceStatus, SaveInvoiceRequest};
use invoice_draft::{InvoiceDraft, ItemField};

pub const PDF_BYTES: &[u8] = b"%PDF-1.7 test invoice";
pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// A draft that passes validation and renders.
pub fn complete_draft() -> InvoiceDraft {
    let mut draft = InvoiceDraft::new();
    draft.from = "Acme Ltd".into();
    draft.to = "Globex Corp".into();
    draft.invoice_number = "INV-100".into();
    draft.issued_date = NaiveDate::from_ymd_opt(2025, 5, 1);
    draft.due_date = NaiveDate::from_ymd_opt(2025, 5, 31);
    draft.items.update_field(0, ItemField::Name, "Consulting");
    draft.items.update_field(0, ItemField::Quantity, "3");
    draft.items.update_field(0, ItemField::UnitCost, "120");
    draft
}

#[derive(Debug, Clone)]
pub enum SaveBehavior {
    Accept(Option<String>),
    Reject(String),
    Fail(u16, String),
}

#[derive(Debug, Default)]
struct MockState {
    generated: Vec<InvoicePayload>,
    previewed: Vec<InvoicePayload>,
    saved: Vec<SaveInvoiceRequest>,
    status_updates: Vec<(String, InvoiceStatus)>,
    deleted: Vec<String>,
    logos: HashMap<String, Vec<u8>>,
}

/// In-memory `InvoiceBackend` that records every call.
pub struct MockInvoiceBackend {
    state: Arc<tokio::sync::Mutex<MockState>>,
    save_behavior: SaveBehavior,
    generate_error: Option<(u16, String)>,
    logo_upload_fails: bool,
}

impl MockInvoiceBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(tokio::sync::Mutex::new(MockState::default())),
            save_behavior: SaveBehavior::Accept(Some("inv-1".to_string())),
            generate_error: None,
            logo_upload_fails: false,
        }
    }

    pub fn with_save(mut self, behavior: SaveBehavior) -> Self {
        self.save_behavior = behavior;
        self
    }

    pub fn with_generate_error(mut self, status: u16, message: &str) -> Self {
        self.generate_error = Some((status, message.to_string()));
        self
    }

    pub fn with_failing_logo_upload(mut self) -> Self {
        self.logo_upload_fails = true;
        self
    }

    pub async fn saved(&self) -> Vec<SaveInvoiceRequest> {
        self.state.lock().await.saved.clone()
    }

    pub async fn generated(&self) -> Vec<InvoicePayload> {
        self.state.lock().await.generated.clone()
    }

    pub async fn previewed_count(&self) -> usize {
        self.state.lock().await.previewed.len()
    }

    pub async fn status_updates(&self) -> Vec<(String, InvoiceStatus)> {
        self.state.lock().await.status_updates.clone()
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.state.lock().await.deleted.clone()
    }

    pub async fn has_logo(&self, filename: &str) -> bool {
        self.state.lock().await.logos.contains_key(filename)
    }
}

#[async_trait::async_trait]
impl InvoiceBackend for MockInvoiceBackend {
    async fn generate_invoice(&self, payload: &InvoicePayload) -> Result<Artifact, BackendError> {
        self.state.lock().await.generated.push(payload.clone());
        if let Some((status, message)) = &self.generate_error {
            return Err(BackendError::Server {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(Artifact::new("invoice.pdf", Some("application/pdf"), PDF_BYTES.to_vec()))
    }

    async fn preview_invoice(&self, payload: &InvoicePayload) -> Result<Artifact, BackendError> {
        self.state.lock().await.previewed.push(payload.clone());
        Ok(Artifact::new("preview", None, PNG_BYTES.to_vec()))
    }

    async fn save_invoice(&self, request: &SaveInvoiceRequest) -> Result<SaveInvoiceResponse, BackendError> {
        self.state.lock().await.saved.push(request.clone());
        match &self.save_behavior {
            SaveBehavior::Accept(id) => Ok(SaveInvoiceResponse {
                success: true,
                error: None,
                invoice_id: id.clone(),
            }),
            SaveBehavior::Reject(error) => Ok(SaveInvoiceResponse {
                success: false,
                error: Some(error.clone()),
                invoice_id: None,
            }),
            SaveBehavior::Fail(status, message) => Err(BackendError::Server {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    async fn update_status(
        &self,
        invoice_id: &str,
        status: InvoiceStatus,
        _user_id: Option<&str>,
    ) -> Result<ApiAck, BackendError> {
        self.state
            .lock()
            .await
            .status_updates
            .push((invoice_id.to_string(), status));
        Ok(ApiAck {
            success: true,
            ..Default::default()
        })
    }

    async fn delete_invoice(&self, invoice_id: &str, _user_id: Option<&str>) -> Result<ApiAck, BackendError> {
        self.state.lock().await.deleted.push(invoice_id.to_string());
        Ok(ApiAck {
            success: true,
            ..Default::default()
        })
    }

    async fn upload_logo(&self, filename: &str, data: Vec<u8>) -> Result<String, BackendError> {
        if self.logo_upload_fails {
            return Err(BackendError::Transport("connection reset".to_string()));
        }
        self.state.lock().await.logos.insert(filename.to_string(), data);
        Ok(format!("http://test.example.com/logos/{}", filename))
    }
}

/// Download sink that keeps delivered files in memory.
#[derive(Default)]
pub struct MemoryDownloadSink {
    files: Arc<tokio::sync::Mutex<Vec<(String, Vec<u8>)>>>,
    fail: bool,
}

impl MemoryDownloadSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl DownloadSink for MemoryDownloadSink {
    async fn deliver(&self, handle: &BlobHandle, filename: &str) -> io::Result<PathBuf> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.files
            .lock()
            .await
            .push((filename.to_string(), handle.artifact().data.clone()));
        Ok(PathBuf::from(filename))
    }
}
