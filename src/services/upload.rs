use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone)]
pub struct UploadConfig {
    pub upload_dir: String,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
        }
    }
}

const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024; // 5 MB
const MAX_VIDEO_SIZE: usize = 100 * 1024 * 1024; // 100 MB

/// Upper bound for a whole multipart body, used by the media route.
pub const MAX_UPLOAD_BODY: usize = MAX_VIDEO_SIZE + 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" | "image/png" | "image/gif" | "image/webp" => Some(Self::Image),
            "video/mp4" | "video/webm" | "video/quicktime" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn max_size(&self) -> usize {
        match self {
            Self::Image => MAX_IMAGE_SIZE,
            Self::Video => MAX_VIDEO_SIZE,
        }
    }

    fn subdirectory(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }
}

/// Validate file magic bytes match the declared content type.
fn validate_magic_bytes(data: &[u8], content_type: &str) -> bool {
    match content_type {
        "image/jpeg" => data.len() >= 3 && data[..3] == [0xFF, 0xD8, 0xFF],
        "image/png" => data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47],
        "image/gif" => data.len() >= 4 && data[..4] == [0x47, 0x49, 0x46, 0x38],
        "image/webp" => {
            data.len() >= 12
                && data[..4] == [0x52, 0x49, 0x46, 0x46]
                && data[8..12] == [0x57, 0x45, 0x42, 0x50]
        }
        // ISO base media: box size, then "ftyp"
        "video/mp4" | "video/quicktime" => data.len() >= 8 && data[4..8] == *b"ftyp",
        // EBML header
        "video/webm" => data.len() >= 4 && data[..4] == [0x1A, 0x45, 0xDF, 0xA3],
        _ => false,
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    Some(match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => return None,
    })
}

/// A file written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub kind: MediaKind,
    /// Public path, e.g. `/uploads/images/<uuid>.jpg`.
    pub url: String,
    pub path: PathBuf,
}

pub struct UploadService;

impl UploadService {
    /// Checks type, size and content of an upload without touching disk.
    pub fn inspect(data: &[u8], content_type: &str) -> AppResult<MediaKind> {
        let kind = MediaKind::from_content_type(content_type).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported file type: {}. Allowed: jpeg, png, gif, webp, mp4, webm, quicktime",
                content_type
            ))
        })?;

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        if data.len() > kind.max_size() {
            return Err(AppError::PayloadTooLarge);
        }

        if !validate_magic_bytes(data, content_type) {
            return Err(AppError::Validation(
                "File content does not match declared content type".to_string(),
            ));
        }

        Ok(kind)
    }

    /// Save an uploaded file to disk under a fresh name.
    pub async fn save_file(
        config: &UploadConfig,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<StoredFile> {
        let kind = Self::inspect(data, content_type)?;
        let ext = extension_for(content_type)
            .ok_or_else(|| AppError::Validation("Unsupported file type".to_string()))?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let dir = Path::new(&config.upload_dir).join(kind.subdirectory());
        fs::create_dir_all(&dir).await?;

        let path = dir.join(&filename);
        fs::write(&path, data).await?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "stored upload");

        Ok(StoredFile {
            kind,
            url: format!("/uploads/{}/{}", kind.subdirectory(), filename),
            path,
        })
    }

    /// Best-effort removal of a file whose metadata could not be recorded.
    pub async fn discard(file: &StoredFile) {
        if let Err(e) = fs::remove_file(&file.path).await {
            tracing::warn!("Failed to remove orphaned upload {}: {}", file.path.display(), e);
        }
    }
}
