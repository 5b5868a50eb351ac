use std::sync::Arc;

use anyhow::Context;
use posts_server::application::post_service::PostService;
use posts_server::data::post_repository::PostgresPostRepository;
use posts_server::infrastructure::config::AppConfig;
use posts_server::infrastructure::database::{create_pool, run_migrations};
use posts_server::infrastructure::file_storage::LocalFileStorage;
use posts_server::infrastructure::logging::init_logging;
use posts_server::server::{AppServices, start_rest_server};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let storage = LocalFileStorage::init(config.upload_dir.clone())
        .await
        .context("failed to prepare upload directory")?;
    let post_repo = Arc::new(PostgresPostRepository::new(pool));

    let services = AppServices {
        posts: PostService::new(post_repo),
        storage: Arc::new(storage),
        upload_limit: config.max_upload_bytes,
    };

    start_rest_server(config, services).await
}
