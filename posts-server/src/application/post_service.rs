use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, PostChanges};
use crate::presentation::dto::PostResponse;
use tracing::instrument;

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all_posts(&self) -> Result<Vec<PostResponse>, DomainError> {
        let posts = self.repo.find_all_newest_first().await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    pub async fn get_post_by_id(&self, id: i64) -> Result<PostResponse, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(PostResponse::from)
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self, content))]
    pub async fn create_post(
        &self,
        content: String,
        image_url: Option<String>,
        video_url: Option<String>,
    ) -> Result<PostResponse, DomainError> {
        let post = NewPost::new(content, image_url, video_url);
        let created = self.repo.create(post).await?;
        Ok(PostResponse::from(created))
    }

    #[instrument(skip(self, content))]
    pub async fn update_post(
        &self,
        id: i64,
        content: String,
        image_url: Option<String>,
        video_url: Option<String>,
    ) -> Result<PostResponse, DomainError> {
        let changes = PostChanges {
            content,
            image_url,
            video_url,
        };
        self.repo
            .update(id, changes)
            .await?
            .map(PostResponse::from)
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.exists(id).await? {
            return Err(DomainError::PostNotFound(id));
        }
        // a concurrent delete may win between the two calls
        if !self.repo.delete(id).await? {
            return Err(DomainError::PostNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn like_post(&self, id: i64) -> Result<PostResponse, DomainError> {
        self.repo
            .increment_likes(id)
            .await?
            .map(PostResponse::from)
            .ok_or(DomainError::PostNotFound(id))
    }
}
