//! Delivering generated invoices to the host.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tokio::io::AsyncWriteExt;

use super::handle::BlobHandle;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("whitespace pattern is valid");
}

const MAX_FILENAME_BYTES: usize = 255;
const PDF_EXTENSION: &str = ".pdf";

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// `invoice-<recipient>.pdf`, whitespace collapsed to `_` and made safe for
/// the filesystem. Long recipients are cut so the extension always survives.
pub fn download_filename(to: &str) -> String {
    let recipient = WHITESPACE_RUN.replace_all(to.trim(), "_");
    let stem = sanitize_filename::sanitize(format!("invoice-{}", recipient));
    let stem = truncate_on_char_boundary(&stem, MAX_FILENAME_BYTES - PDF_EXTENSION.len());
    format!("{}{}", stem, PDF_EXTENSION)
}

/// `name`, then `name (1)`, `name (2)`... keeping the extension.
fn numbered_filename(filename: &str, n: usize) -> String {
    if n == 0 {
        return filename.to_string();
    }
    match filename.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({}){}", &filename[..dot], n, &filename[dot..]),
        _ => format!("{} ({})", filename, n),
    }
}

/// Where a finished download goes. The handle stays owned by the caller and is
/// released once `deliver` returns.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, handle: &BlobHandle, filename: &str) -> io::Result<PathBuf>;
}

/// Writes downloads into a directory, creating it on first use. An existing
/// file is never overwritten: the new one gets a ` (n)` suffix instead.
#[derive(Debug, Clone)]
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloadSink {
    async fn deliver(&self, handle: &BlobHandle, filename: &str) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let filename = sanitize_filename::sanitize(filename);

        let mut n = 0;
        let (path, mut file) = loop {
            let path = self.dir.join(numbered_filename(&filename, n));
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e),
            }
        };

        file.write_all(&handle.artifact().data).await?;
        file.flush().await?;
        log::info!(
            "wrote {} ({} bytes)",
            path.display(),
            handle.artifact().size_bytes()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::artifact::Artifact;
    use crate::workflow::handle::ObjectUrlRegistry;

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename("Globex Corp"), "invoice-Globex_Corp.pdf");
        assert_eq!(download_filename("  Acme \t Ltd \n"), "invoice-Acme_Ltd.pdf");
        assert_eq!(download_filename("a/b:c"), "invoice-abc.pdf");
    }

    #[test]
    fn test_download_filename_keeps_extension_for_long_recipient() {
        let to = "Globex Corporation\nAccounts Payable Department\n".repeat(8);
        let name = download_filename(&to);
        assert!(name.ends_with(".pdf"));
        assert!(name.len() <= MAX_FILENAME_BYTES);
        assert!(name.starts_with("invoice-Globex_Corporation_Accounts_Payable"));

        let name = download_filename(&"Ünïcødé Gmbh ".repeat(40));
        assert!(name.ends_with(".pdf"));
        assert!(name.len() <= MAX_FILENAME_BYTES);
    }

    #[test]
    fn test_numbered_filename() {
        assert_eq!(numbered_filename("invoice-Globex.pdf", 0), "invoice-Globex.pdf");
        assert_eq!(numbered_filename("invoice-Globex.pdf", 2), "invoice-Globex (2).pdf");
        assert_eq!(numbered_filename("invoice", 1), "invoice (1)");
    }

    #[tokio::test]
    async fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryDownloadSink::new(dir.path().join("nested"));
        let registry = ObjectUrlRegistry::new();
        let handle = registry.create(Artifact::new("x.pdf", Some("application/pdf"), b"%PDF-1.4".to_vec()));

        let path = sink.deliver(&handle, "invoice-Globex.pdf").await.unwrap();
        assert_eq!(path, dir.path().join("nested").join("invoice-Globex.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_directory_sink_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectoryDownloadSink::new(dir.path());
        let registry = ObjectUrlRegistry::new();
        let first = registry.create(Artifact::new("a.pdf", Some("application/pdf"), b"%PDF-first".to_vec()));
        let second = registry.create(Artifact::new("b.pdf", Some("application/pdf"), b"%PDF-second".to_vec()));

        let first_path = sink.deliver(&first, "invoice-Globex.pdf").await.unwrap();
        let second_path = sink.deliver(&second, "invoice-Globex.pdf").await.unwrap();

        assert_eq!(first_path, dir.path().join("invoice-Globex.pdf"));
        assert_eq!(second_path, dir.path().join("invoice-Globex (1).pdf"));
        assert_eq!(std::fs::read(&first_path).unwrap(), b"%PDF-first");
        assert_eq!(std::fs::read(&second_path).unwrap(), b"%PDF-second");
    }
}
