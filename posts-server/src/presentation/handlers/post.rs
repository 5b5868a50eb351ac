use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::infrastructure::file_storage::FileStorage;
use crate::presentation::dto::{CreatePostRequest, MessageResponse};
use crate::presentation::middleware::request_id;
use crate::presentation::payload::{PostSubmission, validate_bulk};
use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, put, web};
use tracing::info;

/// Upper bound for a single create/update body, shared with the handlers
/// through app data.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

pub fn scope() -> Scope {
    web::scope("/vinuya/posts")
        .service(get_posts)
        .service(create_bulk_posts)
        .service(create_post)
        .service(get_post)
        .service(update_post)
        .service(delete_post)
        .service(like_post)
}

#[get("")]
async fn get_posts(
    req: HttpRequest,
    service: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.get_all_posts().await?;

    info!(
        request_id = %request_id(&req),
        count = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/{id}")]
async fn get_post(
    service: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = service.get_post_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("/bulk")]
async fn create_bulk_posts(
    req: HttpRequest,
    service: web::Data<PostService>,
    payload: web::Json<Option<Vec<CreatePostRequest>>>,
) -> Result<HttpResponse, DomainError> {
    let items = validate_bulk(payload.into_inner())?;

    // items are written one by one; a store failure keeps earlier items
    let mut responses = Vec::with_capacity(items.len());
    for item in items {
        let post = service
            .create_post(item.content, item.image_url, item.video_url)
            .await?;
        responses.push(post);
    }

    info!(
        request_id = %request_id(&req),
        count = responses.len(),
        "posts bulk created"
    );

    Ok(HttpResponse::Ok().json(responses))
}

#[post("")]
async fn create_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    storage: web::Data<dyn FileStorage>,
    limit: web::Data<UploadLimit>,
    payload: web::Payload,
) -> Result<HttpResponse, DomainError> {
    let submission = PostSubmission::from_request(&req, payload, limit.0).await?;
    let fields = submission.resolve(storage.get_ref()).await?;

    let post = service
        .create_post(fields.content, fields.image_url, fields.video_url)
        .await?;

    info!(
        request_id = %request_id(&req),
        post_id = post.id,
        "post created"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[put("/{id}")]
async fn update_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    storage: web::Data<dyn FileStorage>,
    limit: web::Data<UploadLimit>,
    path: web::Path<i64>,
    payload: web::Payload,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let submission = PostSubmission::from_request(&req, payload, limit.0).await?;

    // fail before storing any upload for a post that does not exist
    service.get_post_by_id(post_id).await?;
    let fields = submission.resolve(storage.get_ref()).await?;

    let post = service
        .update_post(post_id, fields.content, fields.image_url, fields.video_url)
        .await?;

    info!(
        request_id = %request_id(&req),
        post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/{id}")]
async fn delete_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    service.delete_post(post_id).await?;

    info!(
        request_id = %request_id(&req),
        post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::post_deleted(post_id)))
}

#[post("/{id}/like")]
async fn like_post(
    req: HttpRequest,
    service: web::Data<PostService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = service.like_post(path.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = post.id,
        likes = post.likes,
        "post liked"
    );

    Ok(HttpResponse::Ok().json(post))
}
