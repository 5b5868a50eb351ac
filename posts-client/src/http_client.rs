use crate::error::PostsClientError;
use crate::{Attachment, BulkPost, Post, PostForm};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const POSTS_PATH: &str = "/vinuya/posts";

#[derive(Clone)]
pub struct PostsClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

impl PostsClient {
    pub fn connect(endpoint: &str) -> Result<Self, PostsClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    fn posts_url(&self, suffix: &str) -> String {
        format!("{}{}{}", self.base_url, POSTS_PATH, suffix)
    }

    /// Resolves a server-relative media URL such as `/uploads/x.png`.
    pub fn media_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PostsClientError> {
        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(PostsClientError::from_http_response(resp).await)
        }
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, PostsClientError> {
        Self::send(self.client.get(self.posts_url(""))).await
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, PostsClientError> {
        Self::send(self.client.get(self.posts_url(&format!("/{}", id)))).await
    }

    pub async fn create_post(&self, post: PostForm) -> Result<Post, PostsClientError> {
        let req = self
            .client
            .post(self.posts_url(""))
            .multipart(into_multipart(post));
        Self::send(req).await
    }

    pub async fn create_posts_bulk(&self, posts: &[BulkPost]) -> Result<Vec<Post>, PostsClientError> {
        Self::send(self.client.post(self.posts_url("/bulk")).json(posts)).await
    }

    pub async fn update_post(&self, id: i64, post: PostForm) -> Result<Post, PostsClientError> {
        let req = self
            .client
            .put(self.posts_url(&format!("/{}", id)))
            .multipart(into_multipart(post));
        Self::send(req).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete_post(&self, id: i64) -> Result<String, PostsClientError> {
        let resp: MessageResponse =
            Self::send(self.client.delete(self.posts_url(&format!("/{}", id)))).await?;
        Ok(resp.message)
    }

    pub async fn like_post(&self, id: i64) -> Result<Post, PostsClientError> {
        Self::send(self.client.post(self.posts_url(&format!("/{}/like", id)))).await
    }
}

fn into_multipart(post: PostForm) -> Form {
    let mut form = Form::new().text("content", post.content);
    if let Some(url) = post.image_url {
        form = form.text("imageUrl", url);
    }
    if let Some(url) = post.video_url {
        form = form.text("videoUrl", url);
    }
    if let Some(file) = post.image_file {
        form = form.part("imageFile", file_part(file));
    }
    if let Some(file) = post.video_file {
        form = form.part("videoFile", file_part(file));
    }
    form
}

fn file_part(file: Attachment) -> Part {
    Part::bytes(file.bytes).file_name(file.file_name)
}
