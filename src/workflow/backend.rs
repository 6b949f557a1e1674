//! The invoice service seam.
//!
//! The workflow only ever talks to `dyn InvoiceBackend`; the HTTP client lives
//! in `http`, tests plug in an in-memory implementation.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::artifact::Artifact;
use super::payload::{InvoicePayload, InvoiceStatus, SaveInvoiceRequest};

/// Shown when the request never produced a response.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Could not reach the invoice service. Please check your connection and try again.";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl BackendError {
    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::Decode(detail) => format!("Unexpected response from the invoice service: {}", detail),
            Self::Rejected(message) => message.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body the service sends with non-2xx responses. Either key may carry
/// the message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .filter(|e| !e.trim().is_empty())
            .or(self.message.filter(|m| !m.trim().is_empty()))
    }
}

/// Response to `POST /api/invoices`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SaveInvoiceResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, alias = "id")]
    pub invoice_id: Option<String>,
}

/// Generic `{ success, error?, message? }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiAck {
    /// Turn `success: false` into `BackendError::Rejected`.
    pub fn into_result(self, fallback: &str) -> Result<Self, BackendError> {
        if self.success {
            return Ok(self);
        }
        let message = self
            .error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| fallback.to_string());
        Err(BackendError::Rejected(message))
    }
}

#[async_trait]
pub trait InvoiceBackend: Send + Sync {
    /// `POST /generate-invoice`, returns the PDF.
    async fn generate_invoice(&self, payload: &InvoicePayload) -> Result<Artifact, BackendError>;

    /// `POST /api/preview-invoice`, returns an image or PDF.
    async fn preview_invoice(&self, payload: &InvoicePayload) -> Result<Artifact, BackendError>;

    /// `POST /api/invoices`.
    async fn save_invoice(&self, request: &SaveInvoiceRequest) -> Result<SaveInvoiceResponse, BackendError>;

    /// `PUT /api/invoices/{id}/status`.
    async fn update_status(
        &self,
        invoice_id: &str,
        status: InvoiceStatus,
        user_id: Option<&str>,
    ) -> Result<ApiAck, BackendError>;

    /// `DELETE /api/invoices/{id}`.
    async fn delete_invoice(&self, invoice_id: &str, user_id: Option<&str>) -> Result<ApiAck, BackendError>;

    /// Multipart `POST upload-logo`, returns the hosted logo URL.
    async fn upload_logo(&self, filename: &str, data: Vec<u8>) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_by_kind() {
        assert_eq!(
            BackendError::Transport("connection refused".into()).user_message(),
            NETWORK_FAILURE_MESSAGE
        );
        let server = BackendError::Server {
            status: 422,
            message: "Missing invoice number".into(),
        };
        assert_eq!(server.user_message(), "Missing invoice number");
        assert_eq!(server.status(), Some(422));
    }

    #[test]
    fn test_error_body_prefers_error_key() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"bad","message":"worse"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad"));

        let body: ApiErrorBody = serde_json::from_str(r#"{"message":"only message"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("only message"));

        let body: ApiErrorBody = serde_json::from_str(r#"{"error":""}"#).unwrap();
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn test_save_response_accepts_id_alias() {
        let response: SaveInvoiceResponse =
            serde_json::from_str(r#"{"success":true,"id":"inv-9"}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.invoice_id.as_deref(), Some("inv-9"));
    }

    #[test]
    fn test_ack_into_result() {
        let ok = ApiAck {
            success: true,
            ..Default::default()
        };
        assert!(ok.into_result("x").is_ok());

        let rejected = ApiAck::default().into_result("Failed to delete invoice");
        assert!(matches!(rejected, Err(BackendError::Rejected(m)) if m == "Failed to delete invoice"));
    }
}
