use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateUrl;

use crate::error::{DomainError, Violations};
use crate::like::Like;
use crate::user::Author;

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MIN_CHARS: usize = 10;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: Vec<Like>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl CreatePost {
    /// Normalizes and validates the request, reporting every violated field.
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::default();

        let title = self.title.trim().to_string();
        check_title(&title, &mut violations);

        let content = self.content.trim().to_string();
        check_content(&content, &mut violations);

        let tags = normalize_tags(self.tags);
        let image_url = normalize_create_url("image_url", self.image_url, &mut violations);
        let video_url = normalize_create_url("video_url", self.video_url, &mut violations);

        violations.into_result()?;
        Ok(Self {
            title,
            content,
            tags,
            image_url,
            video_url,
        })
    }

    /// Builds the post a validated request describes. `author` is immutable
    /// from here on.
    pub fn into_post(self, id: Uuid, author: Author, now: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author,
            image_url: self.image_url,
            video_url: self.video_url,
            tags: self.tags,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update: absent fields keep their prior values, an empty url string
/// clears the corresponding media field.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl UpdatePost {
    /// Re-validates and re-normalizes only the touched fields.
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::default();

        let title = self.title.map(|title| {
            let title = title.trim().to_string();
            check_title(&title, &mut violations);
            title
        });
        let content = self.content.map(|content| {
            let content = content.trim().to_string();
            check_content(&content, &mut violations);
            content
        });
        let tags = self.tags.map(normalize_tags);
        let image_url = normalize_update_url("image_url", self.image_url, &mut violations);
        let video_url = normalize_update_url("video_url", self.video_url, &mut violations);

        violations.into_result()?;
        Ok(Self {
            title,
            content,
            tags,
            image_url,
            video_url,
        })
    }

    /// Merges a validated patch into the post and bumps `updated_at`.
    pub fn apply(self, post: &mut Post, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = non_empty(image_url);
        }
        if let Some(video_url) = self.video_url {
            post.video_url = non_empty(video_url);
        }
        post.updated_at = now;
    }
}

fn check_title(title: &str, violations: &mut Violations) {
    if title.is_empty() {
        violations.push("title", "is required");
    } else if title.chars().count() > TITLE_MAX_CHARS {
        violations.push("title", "cannot exceed 200 characters");
    }
}

fn check_content(content: &str, violations: &mut Violations) {
    if content.is_empty() {
        violations.push("content", "is required");
    } else if content.chars().count() < CONTENT_MIN_CHARS {
        violations.push("content", "must be at least 10 characters");
    }
}

/// Lowercase, trim, drop empties, de-duplicate preserving first occurrence.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || out.contains(&tag) {
            continue;
        }
        out.push(tag);
    }
    out
}

fn is_absolute_http_url(raw: &str) -> bool {
    (raw.starts_with("http://") || raw.starts_with("https://")) && raw.validate_url()
}

fn normalize_create_url(
    field: &'static str,
    raw: Option<String>,
    violations: &mut Violations,
) -> Option<String> {
    let raw = raw?.trim().to_string();
    if raw.is_empty() {
        return None;
    }
    if !is_absolute_http_url(&raw) {
        violations.push(field, "must be an absolute http(s) url");
        return None;
    }
    Some(raw)
}

/// For updates `Some("")` is meaningful: it clears the field in `apply`.
fn normalize_update_url(
    field: &'static str,
    raw: Option<String>,
    violations: &mut Violations,
) -> Option<String> {
    let raw = raw?.trim().to_string();
    if !raw.is_empty() && !is_absolute_http_url(&raw) {
        violations.push(field, "must be an absolute http(s) url");
    }
    Some(raw)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
