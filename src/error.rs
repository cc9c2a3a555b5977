//! Error types for Book Register

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::{services::identity::IdentityError, views};

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Unauthenticated visitors only ever see the sign-in page
            AppError::Authentication(msg) => {
                tracing::debug!("Redirecting unauthenticated request: {}", msg);
                return Redirect::to("/").into_response();
            }
            AppError::Identity(e) => {
                tracing::warn!("Sign-in rejected: {}", e);
                (StatusCode::UNAUTHORIZED, "Sign-in failed".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Html(views::render_error(status, &message))).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
