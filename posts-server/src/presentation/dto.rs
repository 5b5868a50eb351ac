use crate::domain::post::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ======================= POSTS =======================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            content: post.content,
            image_url: post.image_url,
            video_url: post.video_url,
            likes: post.likes,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Body of a create or update call. In JSON the file fields cannot carry
/// bytes; any non-null value there is treated as an attempted attachment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_file: Option<serde_json::Value>,
    #[serde(default)]
    pub video_file: Option<serde_json::Value>,
}

impl CreatePostRequest {
    pub fn has_file_marker(&self) -> bool {
        self.image_file.is_some() || self.video_file.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn post_deleted(id: i64) -> Self {
        Self {
            message: format!("Post with ID {} has been deleted successfully.", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_is_a_flat_camel_case_projection() {
        let now = Utc::now();
        let post = Post {
            id: 3,
            content: "hello".into(),
            image_url: Some("http://x/a.png".into()),
            video_url: None,
            likes: 2,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(PostResponse::from(post)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["content"], "hello");
        assert_eq!(value["imageUrl"], "http://x/a.png");
        assert!(value["videoUrl"].is_null());
        assert_eq!(value["likes"], 2);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn null_file_fields_are_not_markers() {
        let req: CreatePostRequest =
            serde_json::from_value(json!({"content": "a", "imageFile": null})).unwrap();
        assert!(!req.has_file_marker());

        let req: CreatePostRequest =
            serde_json::from_value(json!({"content": "a", "videoFile": {"name": "v.mp4"}}))
                .unwrap();
        assert!(req.has_file_marker());
    }

    #[test]
    fn delete_message_matches_client_contract() {
        assert_eq!(
            MessageResponse::post_deleted(12).message,
            "Post with ID 12 has been deleted successfully."
        );
    }
}
