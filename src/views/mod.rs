//! HTML rendering of the controller state
//!
//! Rendering is a pure function of the view state, the viewer and the
//! current instant (which decides whether the notification is still shown).

pub mod books;
pub mod html;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};

use crate::{
    models::{Principal, Tone},
    services::controller::{View, ViewState},
};

use self::html::{document, escape, post_button};

/// Page for visitors without a session
pub fn render_signed_out() -> String {
    document("<a class=\"button\" href=\"/auth/login\">Sign In</a>\n")
}

/// Page for a signed-in viewer
pub fn render_workspace(state: &ViewState, viewer: &Principal, now: DateTime<Utc>) -> String {
    let mut body = String::new();

    body.push_str("<nav>");
    body.push_str(&post_button("/auth/logout", "Sign Out", &[]));
    body.push_str(&post_button("/books/new", "Add New Book", &[]));
    body.push_str(&post_button("/books/list", "View Books", &[]));
    body.push_str("</nav>\n");

    body.push_str(&format!(
        "<p class=\"principal\">Signed in as {}</p>\n",
        escape(viewer.as_str())
    ));
    body.push_str(&format!(
        "<h2>Books Registered in Library are: ({})</h2>\n",
        state.books.len()
    ));

    if let Some(notification) = state.active_notification(now) {
        let tone = match notification.tone {
            Tone::Success => "success",
            Tone::Failure => "failure",
        };
        body.push_str(&format!(
            "<p class=\"notification {}\">{}</p>\n",
            tone,
            escape(&notification.message)
        ));
    }

    let view = match &state.view {
        View::List => books::table(&state.books, viewer),
        View::Adding(draft) => books::add_form(draft),
        View::Editing { id, draft } => books::edit_form(id, draft),
        View::Viewing(book) => books::detail(book),
    };
    body.push_str(&view);

    if let Some(prompt) = &state.prompt {
        body.push_str(&books::prompt(prompt));
    }

    document(&body)
}

pub fn render_error(status: StatusCode, message: &str) -> String {
    document(&format!(
        "<h2>{}</h2>\n<p>{}</p>\n<a href=\"/\">Back</a>\n",
        status,
        escape(message)
    ))
}
