use std::future::{Ready, ready};
use std::task::{Context, Poll};
use std::time::Instant;

use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::info;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
pub static TIMING_HEADER: HeaderName = HeaderName::from_static("server-timing");

const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Clone)]
pub struct RequestId(pub String);

/// Request id stored on the request by [`RequestContextMiddleware`].
pub fn request_id(msg: &impl HttpMessage) -> String {
    msg.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Keeps a caller-supplied id when it is a short visible-ASCII token,
/// otherwise generates a v4 UUID.
pub fn accept_request_id(inbound: Option<&str>) -> String {
    inbound
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .filter(|id| id.bytes().all(|b| b.is_ascii_graphic()))
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Tags every request with an id, logs its completion and reports the
/// handling time. Both values are echoed as response headers.
pub struct RequestContextMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextService { service }))
    }
}

pub struct RequestContextService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let rid = accept_request_id(
            req.headers()
                .get(&REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        );
        req.extensions_mut().insert(RequestId(rid.clone()));
        let method = req.method().clone();
        let path = req.path().to_owned();

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            info!(
                request_id = %rid,
                method = %method,
                path = %path,
                status = res.status().as_u16(),
                duration_ms = elapsed_ms,
                "request completed"
            );

            let headers = res.response_mut().headers_mut();
            if let Ok(value) = HeaderValue::from_str(&rid) {
                headers.insert(REQUEST_ID_HEADER.clone(), value);
            }
            if let Ok(value) = HeaderValue::from_str(&format!("app;dur={}", elapsed_ms)) {
                headers.insert(TIMING_HEADER.clone(), value);
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_reasonable_inbound_ids() {
        assert_eq!(accept_request_id(Some("abc-123")), "abc-123");
        assert_eq!(accept_request_id(Some("  trace-9 ")), "trace-9");
    }

    #[test]
    fn replaces_missing_or_unusable_ids() {
        let too_long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        for inbound in [None, Some(""), Some("   "), Some(too_long.as_str()), Some("has space")] {
            let id = accept_request_id(inbound);
            assert!(Uuid::parse_str(&id).is_ok(), "{:?} kept as {}", inbound, id);
        }
        let at_limit = "b".repeat(MAX_REQUEST_ID_LEN);
        assert_eq!(accept_request_id(Some(at_limit.as_str())), at_limit);
    }
}
