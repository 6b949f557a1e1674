//! `reqwest` implementation of `InvoiceBackend`.

use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;

use super::artifact::{filename_from_disposition, Artifact};
use super::backend::{ApiAck, ApiErrorBody, BackendError, InvoiceBackend, SaveInvoiceResponse};
use super::payload::{InvoicePayload, InvoiceStatus, SaveInvoiceRequest, StatusUpdateRequest};
use crate::config::BackendConfig;

#[derive(Debug, Deserialize)]
struct LogoUploadResponse {
    logo_url: Option<String>,
}

#[derive(Clone)]
pub struct HttpInvoiceBackend {
    config: BackendConfig,
    client: Client,
}

impl HttpInvoiceBackend {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(std::time::Duration::from_secs(900))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Reuse an existing client, e.g. one shared with other services.
    pub fn with_client(config: BackendConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn fetch_artifact(
        &self,
        path: &str,
        payload: &InvoicePayload,
        default_name: &str,
    ) -> Result<Artifact, BackendError> {
        let url = self.config.endpoint(path);
        log::info!("POST {} for invoice '{}'", url, payload.invoice_number);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let declared = header_str(&response, CONTENT_TYPE.as_str());
        let filename = header_str(&response, CONTENT_DISPOSITION.as_str())
            .and_then(|value| filename_from_disposition(&value))
            .unwrap_or_else(|| default_name.to_string());
        let data = response.bytes().await.map_err(transport_error)?.to_vec();

        let artifact = Artifact::new(filename, declared.as_deref(), data);
        log::info!(
            "received {} ({}, {} bytes)",
            artifact.filename,
            artifact.mime_type(),
            artifact.size_bytes()
        );
        Ok(artifact)
    }

    fn invoice_url(&self, invoice_id: &str) -> String {
        format!("{}/{}", self.config.endpoint(&self.config.invoices_path), invoice_id)
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    log::error!("invoice service request failed: {}", err);
    BackendError::Transport(err.to_string())
}

fn header_str(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Pass 2xx responses through; turn anything else into `BackendError::Server`
/// with the most specific message the body offers.
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let is_json = header_str(&response, CONTENT_TYPE.as_str())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);
    let body = response.text().await.unwrap_or_default();

    let extracted = if is_json {
        serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(ApiErrorBody::into_message)
    } else {
        Some(body.trim().to_string()).filter(|text| !text.is_empty())
    };
    let message =
        extracted.unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    log::warn!("invoice service returned {}: {}", status, message);
    Err(BackendError::Server {
        status: status.as_u16(),
        message,
    })
}

async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl InvoiceBackend for HttpInvoiceBackend {
    async fn generate_invoice(&self, payload: &InvoicePayload) -> Result<Artifact, BackendError> {
        self.fetch_artifact(&self.config.generate_path, payload, "invoice.pdf")
            .await
    }

    async fn preview_invoice(&self, payload: &InvoicePayload) -> Result<Artifact, BackendError> {
        self.fetch_artifact(&self.config.preview_path, payload, "preview")
            .await
    }

    async fn save_invoice(&self, request: &SaveInvoiceRequest) -> Result<SaveInvoiceResponse, BackendError> {
        let url = self.config.endpoint(&self.config.invoices_path);
        log::info!("POST {} for user {}", url, request.user_id);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }

    async fn update_status(
        &self,
        invoice_id: &str,
        status: InvoiceStatus,
        user_id: Option<&str>,
    ) -> Result<ApiAck, BackendError> {
        let url = format!("{}/status", self.invoice_url(invoice_id));
        log::info!("PUT {} -> {}", url, status.as_str());

        let body = StatusUpdateRequest {
            status,
            user_id: user_id.map(str::to_string),
        };
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json::<ApiAck>(response)
            .await?
            .into_result("Failed to update invoice status")
    }

    async fn delete_invoice(&self, invoice_id: &str, user_id: Option<&str>) -> Result<ApiAck, BackendError> {
        let url = self.invoice_url(invoice_id);
        log::info!("DELETE {}", url);

        let mut request = self.client.delete(&url);
        if let Some(user_id) = user_id {
            request = request.query(&[("user_id", user_id)]);
        }
        let response = request.send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        decode_json::<ApiAck>(response)
            .await?
            .into_result("Failed to delete invoice")
    }

    async fn upload_logo(&self, filename: &str, data: Vec<u8>) -> Result<String, BackendError> {
        let url = self.config.endpoint(&self.config.upload_logo_path);
        let safe_name = sanitize_filename::sanitize(filename);
        let mime = mime_guess::from_path(&safe_name).first_or_octet_stream();
        log::info!("uploading logo {} ({}, {} bytes)", safe_name, mime, data.len());

        let part = Part::bytes(data)
            .file_name(safe_name)
            .mime_str(mime.as_ref())
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let form = Form::new().part("logo", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;
        let body: LogoUploadResponse = decode_json(response).await?;

        body.logo_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| BackendError::Rejected("Upload succeeded but no logo URL was returned".to_string()))
    }
}
