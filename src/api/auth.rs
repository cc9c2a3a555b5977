//! Sign-in and sign-out endpoints

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::identity::IdentityError,
    AppState,
};

/// Cookie holding the anti-forgery nonce of a pending sign-in
pub const LOGIN_STATE_COOKIE: &str = "book_register_login";

fn cookie(name: String, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn removal(name: String) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Redirect to the identity provider
pub async fn login(State(state): State<AppState>, jar: CookieJar) -> AppResult<(CookieJar, Redirect)> {
    let nonce = Uuid::new_v4().to_string();
    let url = state.services.identity.sign_in_url(&nonce)?;

    tracing::debug!("Redirecting to identity provider");
    let jar = jar.add(cookie(LOGIN_STATE_COOKIE.to_string(), nonce));
    Ok((jar, Redirect::to(url.as_str())))
}

/// Query parameters the identity provider redirects back with
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub token: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Complete sign-in and open a workspace for the principal
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> AppResult<(CookieJar, Redirect)> {
    let expected = jar.get(LOGIN_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(removal(LOGIN_STATE_COOKIE.to_string()));

    if let Some(reason) = params.error {
        tracing::info!("{}", IdentityError::Cancelled(reason));
        return Ok((jar, Redirect::to("/")));
    }

    if expected.is_none() || expected != params.state {
        tracing::warn!("{}", IdentityError::StateMismatch);
        return Ok((jar, Redirect::to("/")));
    }

    let token = params
        .token
        .ok_or_else(|| AppError::BadRequest("Missing identity assertion".to_string()))?;
    let session = state.services.identity.complete_sign_in(&token)?;

    let cookie_name = state.config.identity.cookie_name.clone();
    if let Some(previous) = jar.get(&cookie_name).and_then(|c| Uuid::parse_str(c.value()).ok()) {
        state.services.sessions.close(&previous).await;
    }

    let mut workspace = state.services.workspace_for(session);
    let fetch = workspace.controller.request_list();
    workspace.controller.drive(fetch).await;
    let session_id = state.services.sessions.open(workspace).await;

    let jar = jar.add(cookie(cookie_name, session_id.to_string()));
    Ok((jar, Redirect::to("/")))
}

/// Tear down the workspace and forget the session
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let cookie_name = state.config.identity.cookie_name.clone();

    if let Some(id) = jar.get(&cookie_name).and_then(|c| Uuid::parse_str(c.value()).ok()) {
        if state.services.sessions.close(&id).await {
            tracing::info!(session = %id, "Signed out");
        }
    }

    (jar.remove(removal(cookie_name)), Redirect::to("/"))
}
