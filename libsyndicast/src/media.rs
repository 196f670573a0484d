//! Media upload via presigned URLs
//!
//! Each file is presigned, transferred, then classified as image or video.
//! Files go up one at a time in the order given; the first failure stops
//! the batch.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::api::{ApiClient, PresignRequest};
use crate::error::UploadError;
use crate::types::{MediaItem, MediaKind};

/// Content type used when the extension is not recognized
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Guess a MIME type from the file extension (case-insensitive)
pub fn mime_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK_MIME_TYPE;
    };

    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Uploads local files through the publishing API
pub struct MediaUploader<'a> {
    api: &'a dyn ApiClient,
}

impl<'a> MediaUploader<'a> {
    pub fn new(api: &'a dyn ApiClient) -> Self {
        Self { api }
    }

    /// Upload one file and return its public reference.
    ///
    /// # Errors
    ///
    /// - `UploadError::NotFound` if the path does not exist
    /// - `UploadError::PresignFailed` if the API refuses an upload target
    /// - `UploadError::UploadFailed` if the byte transfer is rejected
    pub async fn upload(&self, path: &Path) -> Result<MediaItem, UploadError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(UploadError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(UploadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if !metadata.is_file() {
            return Err(UploadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a regular file",
                ),
            });
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = mime_type_for(path);

        debug!(
            file = %path.display(),
            content_type,
            size = metadata.len(),
            "Requesting upload target"
        );

        let request = PresignRequest {
            filename: filename.clone(),
            content_type: content_type.to_string(),
            size: metadata.len(),
        };
        let target = self
            .api
            .presign_media(&request)
            .await
            .map_err(|source| UploadError::PresignFailed {
                filename: filename.clone(),
                source,
            })?;

        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.api
            .upload_bytes(&target.upload_url, content_type, bytes)
            .await
            .map_err(|source| UploadError::UploadFailed {
                filename: filename.clone(),
                source,
            })?;

        let kind = MediaKind::from_mime(content_type);
        info!(file = %filename, %kind, url = %target.public_url, "Uploaded media");

        Ok(MediaItem {
            url: target.public_url,
            kind,
            filename,
        })
    }

    /// Upload files strictly in order, stopping at the first failure
    pub async fn upload_all(&self, paths: &[PathBuf]) -> Result<Vec<MediaItem>, UploadError> {
        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            items.push(self.upload(path).await?);
        }
        Ok(items)
    }
}
