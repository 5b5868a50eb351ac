use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::file_storage::FileStorage;
use crate::presentation::handlers;
use crate::presentation::handlers::post::UploadLimit;
use crate::presentation::middleware::{REQUEST_ID_HEADER, RequestContextMiddleware};
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath};
use actix_web::{App, Error, HttpServer, web};
use std::sync::Arc;
use tracing::info;

/// Everything the HTTP layer needs, composed once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub posts: PostService,
    pub storage: Arc<dyn FileStorage>,
    pub upload_limit: usize,
}

/// Registers shared state, extractor configuration and every route.
pub fn configure_app(services: &AppServices, cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new(services.posts.clone()))
        .app_data(web::Data::from(Arc::clone(&services.storage)))
        .app_data(web::Data::new(UploadLimit(services.upload_limit)))
        .app_data(
            web::JsonConfig::default()
                .limit(services.upload_limit)
                .error_handler(|err, _req| DomainError::invalid_input(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| DomainError::invalid_input(err.to_string()).into()),
        )
        .service(handlers::health::health)
        .service(handlers::uploads::get_upload)
        .service(handlers::post::scope());
}

/// The full application: routes plus the middleware stack every request
/// passes through. Trailing slashes are trimmed before routing.
pub fn build_app(
    services: AppServices,
    cors_origins: &[String],
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .wrap(Logger::default())
        .wrap(NormalizePath::trim())
        .wrap(RequestContextMiddleware)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer"))
                .add(("Permissions-Policy", "geolocation=()")),
        )
        .wrap(build_cors(cors_origins))
        .configure(move |cfg| configure_app(&services, cfg))
}

pub async fn start_rest_server(config: AppConfig, services: AppServices) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(
        host = %bind_address.0,
        port = bind_address.1,
        "HTTP server starting"
    );

    let cors_origins = config.cors_origins;
    HttpServer::new(move || build_app(services.clone(), &cors_origins))
        .bind(bind_address)?
        .run()
        .await
        .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .expose_headers(vec![REQUEST_ID_HEADER.as_str()])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
    } else {
        // the browser client sends credentials, which requires explicit origins
        cors = cors.supports_credentials();
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
