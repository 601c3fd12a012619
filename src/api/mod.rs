//! HTTP layer - handlers and routing
//!
//! - HTML pages rendered through the theme engine
//! - JSON mirrors of the same documents under `/api/v1`
//! - Uploaded post images served from the media directory

pub mod documents;
pub mod middleware;
pub mod pages;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::MediaConfig;

pub use middleware::{ApiError, AppState};

/// Build the complete router with middleware
pub fn build_router(state: AppState, media: &MediaConfig) -> Router {
    let mut router = Router::new()
        .merge(pages::router())
        .nest("/api/v1", documents::router());

    // Absolute URLs and a bare "/" prefix are not served locally
    let mount_path = media.mount_path();
    if media.url_prefix.starts_with('/') && mount_path != "/" {
        router = router.nest_service(&mount_path, ServeDir::new(&media.path));
    } else {
        tracing::debug!("Media prefix {} is not served locally", media.url_prefix);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
