//! Image ingestion: turns the multipart `images` field into [`UploadedImage`]s.
//!
//! Uploads are held in memory unless a spool directory is configured, in
//! which case each one is written to a [`NamedTempFile`] that is removed when
//! the `UploadedImage` is dropped, whichever way the request ends.

use std::io::Write;
use std::path::Path;

use axum::extract::Multipart;
use tempfile::NamedTempFile;

use crate::config::UploadConfig;
use crate::error::{Result, ScanError};

/// Multipart field carrying the images.
pub const IMAGES_FIELD: &str = "images";

enum Storage {
    Memory(Vec<u8>),
    Spooled(NamedTempFile),
}

pub struct UploadedImage {
    file_name: Option<String>,
    len: usize,
    storage: Storage,
}

impl UploadedImage {
    pub fn in_memory(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            len: bytes.len(),
            storage: Storage::Memory(bytes),
        }
    }

    /// Write `bytes` to a fresh temporary file inside `dir`.
    pub fn spooled(file_name: Option<String>, bytes: &[u8], dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            file_name,
            len: bytes.len(),
            storage: Storage::Spooled(file),
        })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Path of the spooled copy, if any.
    pub fn spool_path(&self) -> Option<&Path> {
        match &self.storage {
            Storage::Memory(_) => None,
            Storage::Spooled(file) => Some(file.path()),
        }
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.storage {
            Storage::Memory(bytes) => Ok(bytes.clone()),
            Storage::Spooled(file) => Ok(tokio::fs::read(file.path()).await?),
        }
    }
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("len", &self.len)
            .field("spool_path", &self.spool_path())
            .finish()
    }
}

/// Accept a part when either its declared type or its magic bytes say image.
pub fn is_image(declared_content_type: Option<&str>, bytes: &[u8]) -> bool {
    let declared = declared_content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);
    declared || infer::is_image(bytes)
}

/// Validate one uploaded part and store it according to `config`.
pub fn accept_image(
    config: &UploadConfig,
    file_name: Option<String>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<UploadedImage> {
    let label = file_name.as_deref().unwrap_or("<unnamed>").to_string();

    if bytes.len() > config.max_file_size {
        return Err(ScanError::PayloadTooLarge(format!(
            "File {label} too large: {} bytes (max {} bytes)",
            bytes.len(),
            config.max_file_size
        )));
    }

    if bytes.is_empty() {
        return Err(ScanError::Validation(format!("File {label} is empty")));
    }

    if !is_image(content_type, bytes) {
        return Err(ScanError::UnsupportedMedia(format!(
            "File {label} is not an image"
        )));
    }

    match &config.spool_dir {
        Some(dir) => UploadedImage::spooled(file_name, bytes, dir),
        None => Ok(UploadedImage::in_memory(file_name, bytes.to_vec())),
    }
}

/// Drain a multipart body, collecting every `images` part in upload order.
pub async fn collect_images(
    mut multipart: Multipart,
    config: &UploadConfig,
) -> Result<Vec<UploadedImage>> {
    let mut images = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(ScanError::Validation(format!(
                    "Malformed multipart body: {e}"
                )))
            }
        };

        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }

        if images.len() >= config.max_files {
            return Err(ScanError::Validation(format!(
                "Too many images: at most {} per request",
                config.max_files
            )));
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field.bytes().await.map_err(|e| {
            ScanError::Validation(format!("Failed to read uploaded file: {e}"))
        })?;

        images.push(accept_image(
            config,
            file_name,
            content_type.as_deref(),
            &bytes,
        )?);
    }

    if images.is_empty() {
        return Err(ScanError::Validation(format!(
            "No images uploaded: expected one or more files in the '{IMAGES_FIELD}' field"
        )));
    }

    tracing::debug!(count = images.len(), "Collected uploaded images");
    Ok(images)
}
