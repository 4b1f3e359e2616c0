use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Violations};

const IMAGE_MIME: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/svg+xml",
];

const VIDEO_MIME: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Video,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn allows_mime(&self, mimetype: &str) -> bool {
        match self {
            Self::Image => IMAGE_MIME.contains(&mimetype),
            Self::Video => VIDEO_MIME.contains(&mimetype),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        match self {
            Self::Image => 10 * 1024 * 1024,
            Self::Video => 200 * 1024 * 1024,
        }
    }
}

/// Both store realizations run the same checks before "storing" bytes.
pub fn validate_upload(kind: UploadKind, mimetype: &str, size: u64) -> Result<(), DomainError> {
    let mut violations = Violations::default();
    if !kind.allows_mime(mimetype) {
        violations.push(
            "file",
            match kind {
                UploadKind::Image => "invalid image type",
                UploadKind::Video => "invalid video type",
            },
        );
    }
    if size == 0 {
        violations.push("file", "is empty");
    } else if size > kind.max_bytes() {
        violations.push("file", "exceeds the size limit");
    }
    violations.into_result()
}

/// Keeps only `[a-zA-Z0-9._-]`, everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub stored_as: String,
    pub url: String,
    pub path: String,
    pub size: u64,
    pub mimetype: String,
}

#[cfg(test)]
mod tests {
    use super::{UploadKind, sanitize_file_name, validate_upload};

    #[test]
    fn image_kind_accepts_png_rejects_mp4() {
        assert!(UploadKind::Image.allows_mime("image/png"));
        assert!(!UploadKind::Image.allows_mime("video/mp4"));
        assert!(UploadKind::Video.allows_mime("video/mp4"));
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let too_big = UploadKind::Image.max_bytes() + 1;
        assert!(validate_upload(UploadKind::Image, "image/png", too_big).is_err());
        assert!(validate_upload(UploadKind::Image, "image/png", 1024).is_ok());
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert!(validate_upload(UploadKind::Video, "video/mp4", 0).is_err());
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(
            sanitize_file_name("my photo (1).png"),
            "my_photo__1_.png"
        );
        assert_eq!(sanitize_file_name("safe-name_01.jpg"), "safe-name_01.jpg");
    }
}
