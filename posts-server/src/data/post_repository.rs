use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    /// Overwrites content and both media URLs. Returns `None` when no post has `id`.
    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, DomainError>;
    async fn exists(&self, id: i64) -> Result<bool, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    /// Adds one like in a single write. Returns `None` when no post has `id`.
    async fn increment_likes(&self, id: i64) -> Result<Option<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(context: &str, err: sqlx::Error) -> DomainError {
    error!("{}: {}", context, err);
    DomainError::Internal(format!("database error: {}", err))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, image_url, video_url, likes, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("db error while fetching posts", e))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, image_url, video_url, likes, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error(&format!("db error find_by_id {}", id), e))
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (content, image_url, video_url, likes, created_at, updated_at)
            VALUES ($1, $2, $3, 0, NOW(), NOW())
            RETURNING id, content, image_url, video_url, likes, created_at, updated_at
            "#,
        )
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(&post.video_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("failed to create post", e))?;

        info!(post_id = created.id, "post created");
        Ok(created)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                content = $1,
                image_url = $2,
                video_url = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, content, image_url, video_url, likes, created_at, updated_at
            "#,
        )
        .bind(&changes.content)
        .bind(&changes.image_url)
        .bind(&changes.video_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error(&format!("failed to update post {}", id), e))?;

        if post.is_some() {
            info!(post_id = id, "post updated");
        }

        Ok(post)
    }

    async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error(&format!("db error exists {}", id), e))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error(&format!("failed to delete post {}", id), e))?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = id, "post deleted");
        }
        Ok(removed)
    }

    async fn increment_likes(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET likes = likes + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, content, image_url, video_url, likes, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error(&format!("failed to like post {}", id), e))
    }
}
