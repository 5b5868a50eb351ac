use posts_client::{Attachment, BulkPost, PostForm, PostsClient, PostsClientError};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn post_json(id: i64, content: &str, likes: i64) -> serde_json::Value {
    json!({
        "id": id,
        "content": content,
        "imageUrl": null,
        "videoUrl": null,
        "likes": likes,
        "createdAt": "2025-01-01T10:00:00Z",
        "updatedAt": "2025-01-01T10:00:00Z"
    })
}

#[tokio::test]
async fn lists_posts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vinuya/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([post_json(2, "newer", 0), post_json(1, "older", 4)])),
        )
        .mount(&server)
        .await;

    let client = PostsClient::connect(&server.uri()).unwrap();
    let posts = client.list_posts().await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].content, "newer");
    assert_eq!(posts[1].likes, 4);
}

#[tokio::test]
async fn not_found_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vinuya/posts/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Not Found",
            "message": "Post not found with id: 9"
        })))
        .mount(&server)
        .await;

    let client = PostsClient::connect(&server.uri()).unwrap();
    match client.get_post(9).await {
        Err(PostsClientError::NotFound(message)) => {
            assert_eq!(message, "Post not found with id: 9")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn create_sends_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vinuya/posts"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"content\""))
        .and(body_string_contains("name=\"imageFile\"; filename=\"cat.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json(5, "hi", 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = PostsClient::connect(&server.uri()).unwrap();
    let mut form = PostForm::new("hi");
    form.image_file = Some(Attachment {
        file_name: "cat.png".into(),
        bytes: b"png".to_vec(),
    });

    let post = client.create_post(form).await.unwrap();
    assert_eq!(post.id, 5);
}

#[tokio::test]
async fn bulk_sends_json_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vinuya/posts/bulk"))
        .and(body_json(json!([
            {"content": "a", "imageUrl": "http://x/a.png"},
            {"content": "b"}
        ])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([post_json(1, "a", 0), post_json(2, "b", 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PostsClient::connect(&server.uri()).unwrap();
    let created = client
        .create_posts_bulk(&[
            BulkPost {
                content: "a".into(),
                image_url: Some("http://x/a.png".into()),
                video_url: None,
            },
            BulkPost {
                content: "b".into(),
                image_url: None,
                video_url: None,
            },
        ])
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
}

#[tokio::test]
async fn bad_request_maps_to_invalid_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vinuya/posts/bulk"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Bad Request",
            "message": "Request body must contain at least one post"
        })))
        .mount(&server)
        .await;

    let client = PostsClient::connect(&server.uri()).unwrap();
    let err = client.create_posts_bulk(&[]).await.unwrap_err();
    assert!(matches!(err, PostsClientError::InvalidRequest(ref m) if m.contains("at least one")));
}

#[tokio::test]
async fn delete_returns_confirmation_and_like_returns_post() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/vinuya/posts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Post with ID 3 has been deleted successfully."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/vinuya/posts/4/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json(4, "liked", 1)))
        .mount(&server)
        .await;

    let client = PostsClient::connect(&server.uri()).unwrap();
    assert_eq!(
        client.delete_post(3).await.unwrap(),
        "Post with ID 3 has been deleted successfully."
    );
    assert_eq!(client.like_post(4).await.unwrap().likes, 1);
}

#[tokio::test]
async fn server_errors_keep_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/vinuya/posts/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = PostsClient::connect(&server.uri()).unwrap();
    let err = client
        .update_post(1, PostForm::new("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, PostsClientError::Server { status: 500, ref message } if message == "boom"));
}

#[test]
fn media_urls_are_resolved_against_the_server() {
    let client = PostsClient::connect("http://localhost:8080/").unwrap();
    assert_eq!(
        client.media_url("/uploads/a.png"),
        "http://localhost:8080/uploads/a.png"
    );
    assert_eq!(client.media_url("http://cdn/x.png"), "http://cdn/x.png");
}
