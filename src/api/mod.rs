//! HTTP handlers for the Book Register web client

pub mod auth;
pub mod books;
pub mod health;
pub mod pages;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{error::AppError, services::sessions::SharedWorkspace, AppState};

/// Extractor for the workspace behind the session cookie
pub struct SignedIn {
    pub workspace: SharedWorkspace,
}

#[async_trait]
impl FromRequestParts<AppState> for SignedIn {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let session_id = jar
            .get(&state.config.identity.cookie_name)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .ok_or_else(|| AppError::Authentication("Missing session cookie".to_string()))?;

        let workspace = state
            .services
            .sessions
            .get(&session_id)
            .await
            .ok_or_else(|| AppError::Authentication("Unknown or closed session".to_string()))?;

        Ok(SignedIn { workspace })
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Identity
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
        // Views
        .route("/books/list", post(books::request_list))
        .route("/books/new", post(books::request_add))
        .route("/books/close", post(books::close))
        .route("/books/:id/view", post(books::request_view))
        .route("/books/:id/edit", post(books::request_edit))
        // Mutations
        .route("/books", post(books::submit_add))
        .route("/books/:id/update", post(books::submit_edit))
        .route("/books/:id/delete", post(books::prompt_delete))
        .route("/books/:id/delete/confirm", post(books::confirm_delete))
        .route("/books/:id/borrow", post(books::prompt_borrow))
        .route("/books/:id/borrow/confirm", post(books::request_borrow))
        .route("/books/:id/return", post(books::request_return))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
