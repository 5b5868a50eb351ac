use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges};

/// Process-local store with the same observable behaviour as the Postgres
/// repository. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryPostRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    posts: BTreeMap<i64, Post>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, DomainError> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state.posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let now = Utc::now();
        let created = Post {
            id: state.last_id,
            content: post.content,
            image_url: post.image_url,
            video_url: post.video_url,
            likes: 0,
            created_at: now,
            updated_at: now,
        };
        state.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.posts.get_mut(&id).map(|post| {
            post.content = changes.content;
            post.image_url = changes.image_url;
            post.video_url = changes.video_url;
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.state.read().await.posts.contains_key(&id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.state.write().await.posts.remove(&id).is_some())
    }

    async fn increment_likes(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.posts.get_mut(&id).map(|post| {
            post.likes += 1;
            post.updated_at = Utc::now();
            post.clone()
        }))
    }
}
