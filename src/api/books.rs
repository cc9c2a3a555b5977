//! Book list and lending endpoints
//!
//! Every action updates the caller's workspace and redirects back to `/`.

use axum::{extract::Path, response::Redirect, Form};
use serde::Deserialize;

use crate::{
    models::{BookFields, BookId},
    services::sessions::perform,
};

use super::SignedIn;

/// Borrow prompt submission
#[derive(Debug, Deserialize)]
pub struct ReturnDateForm {
    pub return_date: Option<String>,
}

/// Delete prompt answer
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirmed: String,
}

impl ConfirmForm {
    pub fn is_confirmed(&self) -> bool {
        matches!(self.confirmed.as_str(), "yes" | "true" | "on")
    }
}

fn home() -> Redirect {
    Redirect::to("/")
}

pub async fn request_list(signed_in: SignedIn) -> Redirect {
    perform(&signed_in.workspace, |controller| controller.request_list()).await;
    home()
}

pub async fn request_add(signed_in: SignedIn) -> Redirect {
    signed_in.workspace.lock().await.controller.request_add();
    home()
}

pub async fn close(signed_in: SignedIn) -> Redirect {
    signed_in.workspace.lock().await.controller.close();
    home()
}

pub async fn request_view(signed_in: SignedIn, Path(id): Path<String>) -> Redirect {
    signed_in
        .workspace
        .lock()
        .await
        .controller
        .request_view(&BookId(id));
    home()
}

pub async fn request_edit(signed_in: SignedIn, Path(id): Path<String>) -> Redirect {
    signed_in
        .workspace
        .lock()
        .await
        .controller
        .request_edit(&BookId(id));
    home()
}

pub async fn submit_add(signed_in: SignedIn, Form(fields): Form<BookFields>) -> Redirect {
    perform(&signed_in.workspace, |controller| controller.submit_add(fields)).await;
    home()
}

pub async fn submit_edit(
    signed_in: SignedIn,
    Path(id): Path<String>,
    Form(fields): Form<BookFields>,
) -> Redirect {
    let id = BookId(id);
    perform(&signed_in.workspace, |controller| controller.submit_edit(&id, fields)).await;
    home()
}

pub async fn prompt_delete(signed_in: SignedIn, Path(id): Path<String>) -> Redirect {
    signed_in
        .workspace
        .lock()
        .await
        .controller
        .prompt_delete(&BookId(id));
    home()
}

pub async fn confirm_delete(
    signed_in: SignedIn,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Redirect {
    let id = BookId(id);
    perform(&signed_in.workspace, |controller| {
        controller.confirm_delete(&id, form.is_confirmed())
    })
    .await;
    home()
}

pub async fn prompt_borrow(signed_in: SignedIn, Path(id): Path<String>) -> Redirect {
    signed_in
        .workspace
        .lock()
        .await
        .controller
        .prompt_borrow(&BookId(id));
    home()
}

pub async fn request_borrow(
    signed_in: SignedIn,
    Path(id): Path<String>,
    Form(form): Form<ReturnDateForm>,
) -> Redirect {
    let id = BookId(id);
    perform(&signed_in.workspace, |controller| {
        controller.request_borrow(&id, form.return_date.as_deref())
    })
    .await;
    home()
}

pub async fn request_return(signed_in: SignedIn, Path(id): Path<String>) -> Redirect {
    let id = BookId(id);
    perform(&signed_in.workspace, |controller| controller.request_return(&id)).await;
    home()
}
