//! Page rendering endpoint

use axum::response::Html;

use crate::views;

use super::SignedIn;

/// Render the current state, or the sign-in page without a session
pub async fn index(signed_in: Option<SignedIn>) -> Html<String> {
    let Some(signed_in) = signed_in else {
        return Html(views::render_signed_out());
    };

    let workspace = signed_in.workspace.lock().await;
    let now = workspace.controller.now();
    Html(views::render_workspace(
        workspace.controller.state(),
        &workspace.session.principal,
        now,
    ))
}
