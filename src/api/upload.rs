//! File uploads
//!
//! Files attached to forms (thumbnails, avatars, ebook PDFs, podcast media)
//! are read from disk up front and checked against the upload configuration
//! before any request is built.

use serde::{Serialize, Serializer};
use std::path::Path;
use std::sync::Arc;

use crate::config::UploadConfig;

/// Errors raised while preparing an upload
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to read file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("File too large. Maximum size: {max} bytes ({} MB)", .max / 1024 / 1024)]
    TooLarge { size: u64, max: u64 },

    #[error("Invalid file type: {0}")]
    InvalidType(String),
}

/// A file ready to be sent as a multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Arc<Vec<u8>>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: Arc::new(data),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension
    pub async fn from_path(path: &Path, config: &UploadConfig) -> Result<Self, UploadError> {
        let data = tokio::fs::read(path).await.map_err(|e| UploadError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = content_type_for(&file_name).to_string();

        let upload = Self::new(file_name, content_type, data);
        upload.check_size(config)?;
        Ok(upload)
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Reject files larger than the configured maximum
    pub fn check_size(&self, config: &UploadConfig) -> Result<(), UploadError> {
        if self.size() > config.max_file_size {
            return Err(UploadError::TooLarge {
                size: self.size(),
                max: config.max_file_size,
            });
        }
        Ok(())
    }

    /// Reject files that are not an allowed image type
    pub fn check_image(&self, config: &UploadConfig) -> Result<(), UploadError> {
        self.check_size(config)?;
        if !config.is_image_allowed(&self.content_type) {
            return Err(UploadError::InvalidType(format!(
                "{}. Allowed types: {:?}",
                self.content_type, config.allowed_image_types
            )));
        }
        Ok(())
    }
}

/// Forms validate through their JSON encoding; a file encodes as its name.
impl Serialize for FileUpload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.file_name)
    }
}

/// Guess a MIME type from a file name's extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "epub" => "application/epub+zip",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}
