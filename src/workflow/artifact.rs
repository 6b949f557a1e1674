//! Rendered artifacts returned by the backend, and MIME detection.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Artifact formats the renderer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Pdf,
    Png,
    Jpeg,
    Unknown,
}

impl ArtifactKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Unknown => "application/octet-stream",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Unknown => "bin",
        }
    }

    /// Parse a `Content-Type` value, ignoring parameters.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Self::Pdf,
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            _ => Self::Unknown,
        }
    }

    /// Detect from magic bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        if data.starts_with(b"%PDF") {
            Self::Pdf
        } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else {
            Self::Unknown
        }
    }
}

/// A binary produced by the renderer. Opaque apart from its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub kind: ArtifactKind,
    pub data: Vec<u8>,
}

impl Artifact {
    /// Build an artifact, trusting the declared type unless it is missing or
    /// generic, in which case the bytes decide.
    pub fn new(filename: impl Into<String>, declared_mime: Option<&str>, data: Vec<u8>) -> Self {
        let declared = declared_mime.map(ArtifactKind::from_mime).unwrap_or(ArtifactKind::Unknown);
        let kind = match declared {
            ArtifactKind::Unknown => ArtifactKind::from_bytes(&data),
            known => known,
        };
        Self {
            filename: filename.into(),
            kind,
            data,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Inline `data:` URL for embedding the artifact in a view.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), BASE64.encode(&self.data))
    }
}

/// Extract `filename=` from a `Content-Disposition` header.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
