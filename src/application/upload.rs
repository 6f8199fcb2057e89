// Upload validation - Checked before anything leaves the client
use bytes::Bytes;
use thiserror::Error;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please upload an image first")]
    Missing,
    #[error("Please upload a valid image (JPEG, PNG, WebP)")]
    UnsupportedMediaType { media_type: String },
    #[error("Image size should be less than 10MB")]
    TooLarge { size: usize },
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn validate(&self) -> Result<(), UploadRejection> {
        if self.bytes.is_empty() {
            return Err(UploadRejection::Missing);
        }

        let media_type = self.media_type.trim().to_ascii_lowercase();
        if !ACCEPTED_MEDIA_TYPES.contains(&media_type.as_str()) {
            return Err(UploadRejection::UnsupportedMediaType {
                media_type: self.media_type.clone(),
            });
        }

        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadRejection::TooLarge {
                size: self.bytes.len(),
            });
        }

        Ok(())
    }
}
