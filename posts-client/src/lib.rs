use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

mod error;
mod http_client;

pub use error::PostsClientError;
pub use http_client::PostsClient;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({} likes)", self.id, self.content, self.likes)?;
        if let Some(url) = &self.image_url {
            write!(f, " image={}", url)?;
        }
        if let Some(url) = &self.video_url {
            write!(f, " video={}", url)?;
        }
        Ok(())
    }
}

/// One entry of a bulk create call. Media can only be given as URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPost {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PostsClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Fields sent by create and update. An attachment replaces the URL for the
/// same slot on the server side.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub image_file: Option<Attachment>,
    pub video_file: Option<Attachment>,
}

impl PostForm {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}
