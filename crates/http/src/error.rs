//! Error handling for the catalog HTTP layer

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use catalog_db::StoreError;
use catalog_kernel::RenderError;
use maud::{html, DOCTYPE};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Failures a controller escalates instead of resolving itself
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &str {
        match self {
            AppError::NotFound { code, .. } => code,
            AppError::Store(_) => "store_error",
            AppError::Render(_) => "render_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();
        let error_code = self.code().to_string();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                error = %self,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        // Release builds keep store and render internals out of the page.
        let message = if cfg!(not(debug_assertions)) && status.is_server_error() {
            "An internal server error occurred".to_string()
        } else {
            match &self {
                AppError::NotFound { message, .. } => message.clone(),
                other => other.to_string(),
            }
        };

        let page = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (status.as_u16()) " | Local Library" }
                }
                body {
                    h1 { (message) }
                    h2 { (status.as_u16()) " " (status.canonical_reason().unwrap_or("Error")) }
                    p.error-meta {
                        "code: " (error_code) br;
                        "trace id: " (error_id.to_string()) br;
                        "time: " (timestamp)
                    }
                }
            }
        };

        (status, Html(page.into_string())).into_response()
    }
}
