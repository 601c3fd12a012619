//! Blogfront - read-model front end for a blog

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogfront::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxCommentRepository, SqlxPostRepository, SqlxTagRepository},
    },
    services::ReadModelService,
    theme::ThemeEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blogfront=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Blogfront...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed ({} applied)", applied);

    // Create repositories
    let post_repo = SqlxPostRepository::boxed(pool.clone());
    let tag_repo = SqlxTagRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());

    let read_model = Arc::new(ReadModelService::new(
        post_repo,
        tag_repo,
        comment_repo,
        config.media.clone(),
    ));

    // Load templates
    let theme_engine = ThemeEngine::new(&config.theme.path)?;
    tracing::info!("Templates loaded from {:?}", config.theme.path);

    let state = AppState {
        read_model,
        theme_engine: Arc::new(theme_engine),
    };

    // Build router
    let app = api::build_router(state, &config.media);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    pool.close().await;

    Ok(())
}
