//! Shared handler state and the JSON error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::{ReadModelError, ReadModelService};
use crate::theme::ThemeEngine;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub read_model: Arc<ReadModelService>,
    pub theme_engine: Arc<ThemeEngine>,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl From<ReadModelError> for ApiError {
    fn from(err: ReadModelError) -> Self {
        tracing::error!("Failed to build document: {:#}", err);
        match &err {
            ReadModelError::MissingRelation(name) | ReadModelError::MissingAnnotation(name) => {
                Self::with_details(
                    "INTERNAL_ERROR",
                    "Failed to build document",
                    serde_json::json!({ "missing": name }),
                )
            }
            ReadModelError::Store(_) => Self::internal_error("Failed to read content store"),
        }
    }
}

/// Every error this API produces is a server-side fault
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
