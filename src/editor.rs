//! The editing session around a draft.
//!
//! Requests run without borrowing the editor: take a `SessionTicket` with
//! `begin_request`, run the workflow call on a snapshot of the draft, then hand
//! the result back through one of the `finish_*` methods. Results whose ticket
//! belongs to an earlier session are dropped, which also releases any preview
//! handle they carry.

use crate::draft::{InvoiceDraft, SavedInvoiceData};
use crate::workflow::{PreviewHandle, PreviewSlot, SaveOutcome, SubmitOutcome, SubmitState, WorkflowError};

pub const LOGO_UPLOADED_MESSAGE: &str = "Logo uploaded successfully!";
pub const LOGO_PREVIEW_ONLY_MESSAGE: &str = "Logo preview only (upload failed)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl EditorMessage {
    fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Identifies the session a request was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct InvoiceEditor {
    draft: InvoiceDraft,
    invoice_id: Option<String>,
    generation: u64,
    loading: bool,
    message: Option<EditorMessage>,
    preview: PreviewSlot,
}

impl Default for InvoiceEditor {
    fn default() -> Self {
        Self::new_invoice()
    }
}

impl InvoiceEditor {
    pub fn new_invoice() -> Self {
        Self {
            draft: InvoiceDraft::new(),
            invoice_id: None,
            generation: 0,
            loading: false,
            message: None,
            preview: PreviewSlot::new(),
        }
    }

    /// Open a stored invoice. Starts a new session.
    pub fn load_invoice(&mut self, invoice_id: impl Into<String>, data: SavedInvoiceData) {
        self.start_session(InvoiceDraft::from_saved(data));
        self.invoice_id = Some(invoice_id.into());
    }

    /// Discard the current draft and start over with a blank one.
    pub fn reset(&mut self) {
        self.start_session(InvoiceDraft::new());
    }

    /// Leave the editor. In-flight results become stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.preview.dismiss();
        self.loading = false;
        log::debug!("editor closed, session {} ended", self.generation - 1);
    }

    fn start_session(&mut self, draft: InvoiceDraft) {
        self.close();
        self.draft = draft;
        self.invoice_id = None;
        self.message = None;
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut InvoiceDraft {
        &mut self.draft
    }

    pub fn invoice_id(&self) -> Option<&str> {
        self.invoice_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> Option<&EditorMessage> {
        self.message.as_ref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.current()
    }

    /// Release the shown preview, if any.
    pub fn dismiss_preview(&mut self) -> bool {
        self.preview.dismiss()
    }

    /// Start a request. Returns `None` while another request is running.
    pub fn begin_request(&mut self) -> Option<SessionTicket> {
        if self.loading {
            log::debug!("request ignored, another one is in flight");
            return None;
        }
        self.loading = true;
        self.message = None;
        Some(SessionTicket {
            generation: self.generation,
        })
    }

    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        ticket.generation == self.generation
    }

    fn accept(&mut self, ticket: &SessionTicket, what: &str) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "dropping stale {} result from session {} (current {})",
                what,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.loading = false;
        true
    }

    /// Show a finished preview, replacing (and releasing) the previous one.
    pub fn finish_preview(&mut self, ticket: SessionTicket, result: Result<PreviewHandle, WorkflowError>) -> bool {
        if !self.accept(&ticket, "preview") {
            return false;
        }
        match result {
            Ok(handle) => self.preview.replace(handle),
            Err(err) => self.message = Some(EditorMessage::new(MessageLevel::Error, err.user_message())),
        }
        true
    }

    pub fn finish_save(&mut self, ticket: SessionTicket, outcome: SaveOutcome) -> bool {
        if !self.accept(&ticket, "save") {
            return false;
        }
        let level = match &outcome {
            SaveOutcome::Saved { invoice_id } => {
                if let Some(id) = invoice_id {
                    self.invoice_id = Some(id.clone());
                }
                MessageLevel::Success
            }
            SaveOutcome::ValidationFailed(_) => MessageLevel::Warning,
            SaveOutcome::RequestFailed(_) => MessageLevel::Error,
        };
        self.message = Some(EditorMessage::new(level, outcome.message()));
        true
    }

    pub fn finish_submit(&mut self, ticket: SessionTicket, outcome: SubmitOutcome) -> bool {
        if !self.accept(&ticket, "submit") {
            return false;
        }
        if let Some(id) = outcome.invoice_id() {
            self.invoice_id = Some(id.to_string());
        }
        let level = match outcome.state() {
            SubmitState::Done => MessageLevel::Success,
            SubmitState::DoneWithWarning => MessageLevel::Warning,
            _ => MessageLevel::Error,
        };
        self.message = Some(EditorMessage::new(level, outcome.message()));
        true
    }

    pub fn finish_download(&mut self, ticket: SessionTicket, result: Result<std::path::PathBuf, WorkflowError>) -> bool {
        if !self.accept(&ticket, "download") {
            return false;
        }
        if let Err(err) = result {
            self.message = Some(EditorMessage::new(MessageLevel::Error, err.user_message()));
        }
        true
    }

    /// Apply a logo upload. A failed upload leaves the draft without a hosted
    /// logo; the local preview is all the user gets.
    pub fn finish_logo_upload(&mut self, ticket: SessionTicket, result: Result<String, WorkflowError>) -> bool {
        if !self.accept(&ticket, "logo upload") {
            return false;
        }
        match result {
            Ok(url) => {
                self.draft.logo_url = Some(url);
                self.message = Some(EditorMessage::new(MessageLevel::Success, LOGO_UPLOADED_MESSAGE));
            }
            Err(err) => {
                log::warn!("logo upload failed: {}", err);
                self.draft.logo_url = None;
                self.message = Some(EditorMessage::new(MessageLevel::Warning, LOGO_PREVIEW_ONLY_MESSAGE));
            }
        }
        true
    }
}
