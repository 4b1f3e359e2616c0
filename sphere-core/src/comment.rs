use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Violations};
use crate::like::Like;
use crate::user::Author;

pub const DEFAULT_EMOJI: &str = "💬";

/// Sentinel emoji filter value meaning "no filter".
pub const EMOJI_FILTER_ALL: &str = "all";

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author: Author,
    pub emoji: String,
    #[serde(default)]
    pub likes: Vec<Like>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub content: String,
    pub post_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl CreateComment {
    pub fn validate(self) -> Result<Self, DomainError> {
        let mut violations = Violations::default();

        let content = self.content.trim().to_string();
        if content.is_empty() {
            violations.push("content", "is required");
        }
        let emoji = normalize_emoji(self.emoji);

        violations.into_result()?;
        Ok(Self {
            content,
            post_id: self.post_id,
            emoji,
        })
    }

    pub fn into_comment(self, id: Uuid, author: Author, now: DateTime<Utc>) -> Comment {
        Comment {
            id,
            post_id: self.post_id,
            content: self.content,
            author,
            emoji: self.emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentContent {
    pub content: String,
}

impl UpdateCommentContent {
    pub fn validate(self) -> Result<Self, DomainError> {
        let content = self.content.trim().to_string();
        if content.is_empty() {
            let mut violations = Violations::default();
            violations.push("content", "is required");
            violations.into_result()?;
        }
        Ok(Self { content })
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentEmoji {
    pub emoji: String,
}

impl UpdateCommentEmoji {
    pub fn validate(self) -> Result<Self, DomainError> {
        let emoji = self.emoji.trim().to_string();
        if emoji.is_empty() {
            let mut violations = Violations::default();
            violations.push("emoji", "is required");
            violations.into_result()?;
        }
        Ok(Self { emoji })
    }
}

fn normalize_emoji(emoji: Option<String>) -> Option<String> {
    let emoji = emoji?.trim().to_string();
    if emoji.is_empty() { None } else { Some(emoji) }
}

/// Emoji list filter: absent or `all` match everything, any other value is an
/// exact match. Shared by both store realizations.
pub fn emoji_filter_matches(filter: Option<&str>, emoji: &str) -> bool {
    match filter {
        None | Some(EMOJI_FILTER_ALL) => true,
        Some(wanted) => wanted == emoji,
    }
}
