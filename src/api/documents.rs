//! JSON document endpoints
//!
//! Serve the same documents the HTML pages render:
//! - GET /api/v1/home
//! - GET /api/v1/posts/{slug}
//! - GET /api/v1/tags/{title}
//! - GET /api/v1/contacts

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::pages::{lookup_key, redirect_home};
use crate::models::{ContactsPage, HomePage, ViewOutcome};

/// Create the router for document endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/posts/{slug}", get(post_detail))
        .route("/tags/{title}", get(tag_filter))
        .route("/contacts", get(contacts))
}

fn outcome_response<T: Serialize>(outcome: ViewOutcome<T>) -> Response {
    match outcome.document() {
        Some(document) => Json(document).into_response(),
        None => redirect_home(),
    }
}

/// GET /api/v1/home
pub async fn home(State(state): State<AppState>) -> Result<Json<HomePage>, ApiError> {
    Ok(Json(state.read_model.home().await?))
}

/// GET /api/v1/posts/{slug}
pub async fn post_detail(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Some(slug) = lookup_key(slug) else {
        return Ok(redirect_home());
    };
    Ok(outcome_response(state.read_model.post_detail(&slug).await?))
}

/// GET /api/v1/tags/{title}
pub async fn tag_filter(
    State(state): State<AppState>,
    title: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Some(title) = lookup_key(title) else {
        return Ok(redirect_home());
    };
    Ok(outcome_response(state.read_model.tag_filter(&title).await?))
}

/// GET /api/v1/contacts
pub async fn contacts(State(state): State<AppState>) -> Json<ContactsPage> {
    Json(state.read_model.contacts())
}
