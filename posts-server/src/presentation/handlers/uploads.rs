use crate::domain::error::DomainError;
use crate::infrastructure::file_storage::{FileStorage, content_type_for};
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpResponse, get, web};

#[get("/uploads/{filename}")]
async fn get_upload(
    storage: web::Data<dyn FileStorage>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let filename = path.into_inner();
    match storage.load_file(&filename).await? {
        Some(bytes) => Ok(HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, content_type_for(&filename)))
            .insert_header((CACHE_CONTROL, "public, max-age=86400, immutable"))
            .body(bytes)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}
