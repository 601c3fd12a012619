//! Template engine error types

use thiserror::Error;

/// Template-specific errors
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template compile or render error
    #[error("Template error: {0}")]
    TemplateError(String),
}
