//! HTML page handlers
//!
//! - GET / - Home page
//! - GET /posts/{slug} - Post detail
//! - GET /tags/{title} - Posts with a tag
//! - GET /contacts - Contacts page
//!
//! Unknown slugs and tag titles redirect to `/`, and so do path segments
//! that do not decode to UTF-8.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::models::ViewOutcome;
use crate::services::ReadModelError;

/// Failure while producing a page
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error(transparent)]
    ReadModel(#[from] ReadModelError),

    #[error("Render error: {0}")]
    Render(#[from] anyhow::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to serve page: {:#}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Internal Server Error</h1>".to_string()),
        )
            .into_response()
    }
}

/// Create the router for HTML pages
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/posts/{slug}", get(post_detail))
        .route("/tags/{title}", get(tag_filter))
        .route("/contacts", get(contacts))
}

fn render<T: Serialize>(
    state: &AppState,
    template: &str,
    document: &T,
) -> Result<Response, PageError> {
    let html = state.theme_engine.render_document(template, document)?;
    Ok(Html(html).into_response())
}

fn render_outcome<T: Serialize>(
    state: &AppState,
    template: &str,
    outcome: ViewOutcome<T>,
) -> Result<Response, PageError> {
    match outcome.document() {
        Some(document) => render(state, template, &document),
        None => Ok(redirect_home()),
    }
}

pub(crate) fn redirect_home() -> Response {
    Redirect::to("/").into_response()
}

/// Unpack a lookup key; undecodable keys are logged and dropped
pub(crate) fn lookup_key(key: Result<Path<String>, PathRejection>) -> Option<String> {
    match key {
        Ok(Path(key)) => Some(key),
        Err(rejection) => {
            tracing::debug!("Undecodable lookup key, redirecting home: {}", rejection);
            None
        }
    }
}

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<Response, PageError> {
    let document = state.read_model.home().await?;
    render(&state, "index.html", &document)
}

/// GET /posts/{slug}
pub async fn post_detail(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
) -> Result<Response, PageError> {
    let Some(slug) = lookup_key(slug) else {
        return Ok(redirect_home());
    };
    let outcome = state.read_model.post_detail(&slug).await?;
    render_outcome(&state, "post-details.html", outcome)
}

/// GET /tags/{title}
pub async fn tag_filter(
    State(state): State<AppState>,
    title: Result<Path<String>, PathRejection>,
) -> Result<Response, PageError> {
    let Some(title) = lookup_key(title) else {
        return Ok(redirect_home());
    };
    let outcome = state.read_model.tag_filter(&title).await?;
    render_outcome(&state, "posts-list.html", outcome)
}

/// GET /contacts
pub async fn contacts(State(state): State<AppState>) -> Result<Response, PageError> {
    let document = state.read_model.contacts();
    render(&state, "contacts.html", &document)
}
