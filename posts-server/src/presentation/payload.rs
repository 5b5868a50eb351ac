//! Turns the body of a create or update call into one canonical request.
//!
//! Clients send either `application/json` or `multipart/form-data`. Both are
//! parsed into a [`PostSubmission`] before any business logic runs, so the
//! handlers never look at content types.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{HttpMessage, HttpRequest, web};
use futures_util::StreamExt;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::infrastructure::file_storage::{FileStorage, UploadedFile, upload_url};
use crate::presentation::dto::CreatePostRequest;

const REQUEST_REQUIRED: &str = "Request body is required";

/// A create/update request after content-type dispatch.
#[derive(Debug, Default)]
pub struct PostSubmission {
    pub request: CreatePostRequest,
    pub image_file: Option<UploadedFile>,
    pub video_file: Option<UploadedFile>,
}

/// Final field values once uploads have been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPost {
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl PostSubmission {
    pub async fn from_request(
        req: &HttpRequest,
        payload: web::Payload,
        max_bytes: usize,
    ) -> Result<Self, DomainError> {
        let content_type = req.content_type();
        if content_type.eq_ignore_ascii_case("application/json") {
            Self::from_json(payload, max_bytes).await
        } else if content_type.eq_ignore_ascii_case("multipart/form-data") {
            let multipart = Multipart::new(req.headers(), payload);
            let parts = MultipartParts::collect(multipart, max_bytes).await?;
            parts.into_submission()
        } else {
            debug!(content_type, "unsupported post body");
            Err(DomainError::invalid_input(REQUEST_REQUIRED))
        }
    }

    async fn from_json(mut payload: web::Payload, max_bytes: usize) -> Result<Self, DomainError> {
        let mut body = web::BytesMut::new();
        while let Some(chunk) = payload.next().await {
            let chunk = chunk
                .map_err(|e| DomainError::invalid_input(format!("could not read body: {}", e)))?;
            if body.len() + chunk.len() > max_bytes {
                return Err(too_large(max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        let request = parse_json_request(&body)?.ok_or_else(|| {
            DomainError::invalid_input(REQUEST_REQUIRED)
        })?;
        Ok(Self {
            request,
            image_file: None,
            video_file: None,
        })
    }

    /// Stores uploaded files and picks the final media URLs. A non-empty
    /// file wins over the URL supplied for the same slot.
    pub async fn resolve(self, storage: &dyn FileStorage) -> Result<ResolvedPost, DomainError> {
        let content = self
            .request
            .content
            .ok_or_else(|| DomainError::invalid_input("Post content is required"))?;
        let image_url = resolve_media(storage, self.image_file, self.request.image_url).await?;
        let video_url = resolve_media(storage, self.video_file, self.request.video_url).await?;

        Ok(ResolvedPost {
            content,
            image_url,
            video_url,
        })
    }
}

async fn resolve_media(
    storage: &dyn FileStorage,
    file: Option<UploadedFile>,
    url: Option<String>,
) -> Result<Option<String>, DomainError> {
    match file {
        Some(file) if !file.is_empty() => {
            let filename = storage.store_file(&file).await?;
            Ok(Some(upload_url(&filename)))
        }
        _ => Ok(url),
    }
}

/// Raw parts of a multipart body, grouped by their role.
#[derive(Debug, Default)]
pub struct MultipartParts {
    /// `content`, `imageUrl` and `videoUrl` text parts, if any was sent.
    pub form: Option<CreatePostRequest>,
    /// JSON-encoded `request` part.
    pub json: Option<CreatePostRequest>,
    pub image_file: Option<UploadedFile>,
    pub video_file: Option<UploadedFile>,
}

impl MultipartParts {
    async fn collect(mut multipart: Multipart, max_bytes: usize) -> Result<Self, DomainError> {
        let mut parts = Self::default();
        let mut total = 0usize;

        while let Some(field) = multipart.next().await {
            let mut field = field.map_err(multipart_error)?;
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_owned);
            let content_type = field.content_type().map(|mime| mime.to_string());
            let bytes = read_field(&mut field, &mut total, max_bytes).await?;

            match name.as_str() {
                "request" => parts.json = parse_json_request(&bytes)?,
                "content" => parts.form_mut().content = Some(text_part(bytes)?),
                // blank URL parts leave the `request` part in charge
                "imageUrl" => {
                    if let Some(url) = url_part(bytes)? {
                        parts.form_mut().image_url = Some(url);
                    }
                }
                "videoUrl" => {
                    if let Some(url) = url_part(bytes)? {
                        parts.form_mut().video_url = Some(url);
                    }
                }
                "imageFile" | "videoFile" => {
                    let upload = UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    };
                    if name == "imageFile" {
                        parts.image_file = Some(upload);
                    } else {
                        parts.video_file = Some(upload);
                    }
                }
                other => debug!(part = other, "ignoring multipart part"),
            }
        }

        Ok(parts)
    }

    fn form_mut(&mut self) -> &mut CreatePostRequest {
        self.form.get_or_insert_with(CreatePostRequest::default)
    }

    /// Form fields take priority over the `request` part. Files always come
    /// from the file parts.
    pub fn into_submission(self) -> Result<PostSubmission, DomainError> {
        let request = self
            .form
            .or(self.json)
            .ok_or_else(|| DomainError::invalid_input(REQUEST_REQUIRED))?;

        Ok(PostSubmission {
            request,
            image_file: self.image_file,
            video_file: self.video_file,
        })
    }
}

async fn read_field(
    field: &mut Field,
    total: &mut usize,
    max_bytes: usize,
) -> Result<Vec<u8>, DomainError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(multipart_error)?;
        *total += chunk.len();
        if *total > max_bytes {
            return Err(too_large(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn parse_json_request(bytes: &[u8]) -> Result<Option<CreatePostRequest>, DomainError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map_err(|e| DomainError::invalid_input(format!("invalid JSON request: {}", e)))
}

fn text_part(bytes: Vec<u8>) -> Result<String, DomainError> {
    String::from_utf8(bytes).map_err(|_| DomainError::invalid_input("form fields must be UTF-8"))
}

fn url_part(bytes: Vec<u8>) -> Result<Option<String>, DomainError> {
    let text = text_part(bytes)?;
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}

fn multipart_error(err: MultipartError) -> DomainError {
    DomainError::invalid_input(format!("malformed multipart body: {}", err))
}

fn too_large(max_bytes: usize) -> DomainError {
    DomainError::invalid_input(format!("request body exceeds {} bytes", max_bytes))
}

/// Checks a bulk batch up front so a bad item rejects the whole call before
/// anything is written.
pub fn validate_bulk(
    requests: Option<Vec<CreatePostRequest>>,
) -> Result<Vec<ResolvedPost>, DomainError> {
    let requests = requests
        .filter(|items| !items.is_empty())
        .ok_or_else(|| DomainError::invalid_input("Request body must contain at least one post"))?;

    requests
        .into_iter()
        .map(|request| {
            if request.has_file_marker() {
                return Err(DomainError::invalid_input(
                    "Bulk upload only supports image/video URLs, not file uploads",
                ));
            }
            let CreatePostRequest {
                content,
                image_url,
                video_url,
                ..
            } = request;
            let content = content
                .filter(|content| !content.trim().is_empty())
                .ok_or_else(|| DomainError::invalid_input("Post content cannot be empty"))?;
            Ok(ResolvedPost {
                content,
                image_url,
                video_url,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(content: &str, image_url: Option<&str>) -> CreatePostRequest {
        CreatePostRequest {
            content: Some(content.to_string()),
            image_url: image_url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn form_fields_win_over_request_part() {
        let parts = MultipartParts {
            form: Some(request("from form", None)),
            json: Some(request("from json", Some("http://x/a.png"))),
            ..Default::default()
        };

        let submission = parts.into_submission().unwrap();
        assert_eq!(submission.request.content.as_deref(), Some("from form"));
        assert!(submission.request.image_url.is_none());
    }

    #[test]
    fn request_part_is_used_without_form_fields() {
        let parts = MultipartParts {
            json: Some(request("from json", None)),
            ..Default::default()
        };
        let submission = parts.into_submission().unwrap();
        assert_eq!(submission.request.content.as_deref(), Some("from json"));
    }

    #[test]
    fn multipart_without_any_request_is_rejected() {
        let parts = MultipartParts {
            image_file: Some(UploadedFile {
                file_name: Some("a.png".into()),
                content_type: None,
                bytes: vec![1],
            }),
            ..Default::default()
        };
        assert!(matches!(
            parts.into_submission(),
            Err(DomainError::InvalidInput(msg)) if msg == REQUEST_REQUIRED
        ));
    }

    #[test]
    fn blank_json_is_no_request() {
        assert!(parse_json_request(b"  \n").unwrap().is_none());
        assert!(parse_json_request(b"null").unwrap().is_none());
        assert!(parse_json_request(b"{not json").is_err());
    }

    #[test]
    fn bulk_rejects_empty_and_missing_batches() {
        assert!(validate_bulk(None).is_err());
        assert!(validate_bulk(Some(vec![])).is_err());
    }

    #[test]
    fn bulk_rejects_blank_content_anywhere() {
        let err = validate_bulk(Some(vec![request("ok", None), request("   ", None)])).unwrap_err();
        assert_eq!(err.to_string(), "Post content cannot be empty");
    }

    #[test]
    fn bulk_rejects_file_markers() {
        let with_file: CreatePostRequest =
            serde_json::from_value(json!({"content": "x", "imageFile": "cat.png"})).unwrap();
        let err = validate_bulk(Some(vec![request("ok", None), with_file])).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn bulk_keeps_order_and_urls() {
        let resolved = validate_bulk(Some(vec![
            request("one", Some("http://x/1.png")),
            request("two", None),
        ]))
        .unwrap();
        assert_eq!(resolved[0].content, "one");
        assert_eq!(resolved[0].image_url.as_deref(), Some("http://x/1.png"));
        assert_eq!(resolved[1].content, "two");
    }
}
