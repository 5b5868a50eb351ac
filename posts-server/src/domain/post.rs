use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for a post that has not been persisted yet. The store assigns
/// the id and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl NewPost {
    pub fn new(content: String, image_url: Option<String>, video_url: Option<String>) -> Self {
        Self {
            content,
            image_url,
            video_url,
        }
    }
}

/// Replacement values for the mutable fields of a post. Every field is
/// written, so `None` clears a media URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}
