//! Ticket attachment metadata and upload limits.
//!
//! The bytes themselves are handled by the file storage layer; this module
//! only decides whether an upload is acceptable and what it is stored as.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uploads larger than this are rejected.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("attachment is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
    #[error("only images allowed, got {0:?}")]
    NotAnImage(String),
}

/// An uploaded file as described by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl AttachmentUpload {
    pub fn validate(&self) -> Result<(), AttachmentError> {
        if self.size_bytes > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                size: self.size_bytes,
                limit: MAX_ATTACHMENT_BYTES,
            });
        }
        if !self.content_type.starts_with("image/") {
            return Err(AttachmentError::NotAnImage(self.content_type.clone()));
        }
        Ok(())
    }

    /// Unique storage name that keeps the original extension.
    ///
    /// `screen shot.PNG` becomes something like `1760000000000-3f2a...c1.PNG`.
    pub fn storage_name(&self, now_millis: i64) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        match Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
        {
            Some(ext) => format!("{now_millis}-{suffix}.{ext}"),
            None => format!("{now_millis}-{suffix}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, size_bytes: u64) -> AttachmentUpload {
        AttachmentUpload {
            file_name: "screenshot.png".into(),
            content_type: content_type.into(),
            size_bytes,
        }
    }

    #[test]
    fn accepts_image_within_limit() {
        assert!(upload("image/png", 1024).validate().is_ok());
        assert!(upload("image/jpeg", MAX_ATTACHMENT_BYTES).validate().is_ok());
    }

    #[test]
    fn rejects_oversized() {
        let err = upload("image/png", MAX_ATTACHMENT_BYTES + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { .. }));
    }

    #[test]
    fn rejects_non_image() {
        let err = upload("application/pdf", 10).validate().unwrap_err();
        assert_eq!(err, AttachmentError::NotAnImage("application/pdf".into()));
    }

    #[test]
    fn storage_name_keeps_extension() {
        let name = upload("image/png", 10).storage_name(1_700_000_000_000);
        assert!(name.starts_with("1700000000000-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn storage_name_without_extension() {
        let mut up = upload("image/png", 10);
        up.file_name = "blob".into();
        let name = up.storage_name(42);
        assert!(name.starts_with("42-"));
        assert!(!name.contains('.'));
    }
}
