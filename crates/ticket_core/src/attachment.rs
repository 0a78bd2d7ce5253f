//! File handles from the file-selection surface and their base64 encoding.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::protocol::AttachmentPayload;

use crate::error::EncodeError;

const BASE64_MARKER: &str = "base64,";
const FALLBACK_FILENAME: &str = "attachment.bin";

#[async_trait]
pub trait FileHandle: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;
    async fn read(&self) -> std::io::Result<Vec<u8>>;
}

pub type SelectedFile = Arc<dyn FileHandle>;

/// File picked from the local filesystem; read lazily at submit time.
#[derive(Debug, Clone)]
pub struct PathFile {
    path: PathBuf,
    name: String,
}

impl PathFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileHandle for PathFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

#[derive(Clone)]
pub struct MemoryFile {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for MemoryFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[async_trait]
impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Renders bytes as a `data:` URL, with the MIME type guessed from the name.
pub fn data_url(filename: &str, bytes: &[u8]) -> String {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    format!("data:{};{BASE64_MARKER}{}", mime.essence_str(), STANDARD.encode(bytes))
}

/// Everything after the first `base64,` marker, or `None` without one.
pub fn strip_data_url_prefix(data_url: &str) -> Option<&str> {
    data_url
        .split_once(BASE64_MARKER)
        .map(|(_, payload)| payload)
}

/// Reads the file once and produces the inline attachment for the payload.
pub async fn encode_attachment(file: &dyn FileHandle) -> Result<AttachmentPayload, EncodeError> {
    let filename = file.name().to_string();
    let bytes = file.read().await.map_err(|source| EncodeError::Read {
        filename: filename.clone(),
        source,
    })?;

    let url = data_url(&filename, &bytes);
    let base64 = strip_data_url_prefix(&url)
        .ok_or_else(|| EncodeError::MissingMarker {
            filename: filename.clone(),
        })?
        .to_string();

    tracing::debug!(
        filename = %filename,
        raw_len = bytes.len(),
        encoded_len = base64.len(),
        "attachment encoded"
    );

    Ok(AttachmentPayload { filename, base64 })
}

#[cfg(test)]
#[path = "tests/attachment_tests.rs"]
mod tests;
