//! Memory wall posts: already-hosted photos with an optional caption.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::user::UserId;

/// Maximum caption length.
pub const CAPTION_MAX: usize = 500;

/// Identifier of a memory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryId(i64);

impl MemoryId {
    /// Wrap a raw row identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw row identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for new memories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryValidationError {
    #[error("image URL must be an absolute http(s) URL")]
    InvalidImageUrl,
    #[error("caption must be at most {max} characters")]
    CaptionTooLong { max: usize },
}

/// A memory about to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDraft {
    pub image_url: String,
    pub caption: Option<String>,
}

impl MemoryDraft {
    /// Validate the URL scheme and caption length.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::MemoryDraft;
    ///
    /// let draft = MemoryDraft::new("https://img.example.com/1.jpg", Some("Class of 2005"))
    ///     .expect("valid draft");
    /// assert_eq!(draft.caption.as_deref(), Some("Class of 2005"));
    /// assert!(MemoryDraft::new("ftp://x/1.jpg", None).is_err());
    /// ```
    pub fn new(image_url: &str, caption: Option<&str>) -> Result<Self, MemoryValidationError> {
        let url = Url::parse(image_url.trim()).map_err(|_| MemoryValidationError::InvalidImageUrl)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MemoryValidationError::InvalidImageUrl);
        }
        let caption = caption
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);
        if caption
            .as_deref()
            .is_some_and(|text| text.chars().count() > CAPTION_MAX)
        {
            return Err(MemoryValidationError::CaptionTooLong { max: CAPTION_MAX });
        }
        Ok(Self {
            image_url: url.into(),
            caption,
        })
    }
}

/// Stored memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    pub id: MemoryId,
    pub author: UserId,
    pub draft: MemoryDraft,
    pub created_at: DateTime<Utc>,
}
