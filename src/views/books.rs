//! Book list, forms, detail panel and prompts

use reqwest::Url;
use std::fmt::Write;

use crate::{
    models::{Book, BookFields, BookId, Principal},
    services::controller::Prompt,
};

use super::html::{escape, post_button};

/// `/books/{id}/{action}` with the id encoded as a single segment
fn book_path(id: &BookId, action: &str) -> String {
    Url::parse("http://localhost/books")
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut().ok()?.push(&id.0).push(action);
            Some(url.path().to_string())
        })
        .unwrap_or_else(|| "/".to_string())
}

fn rent_until_label(book: &Book) -> String {
    book.rent_until_utc()
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn table(books: &[Book], viewer: &Principal) -> String {
    let mut html = String::from(concat!(
        "<table>\n<thead><tr>",
        "<th class=\"th\">Title</th>",
        "<th class=\"th\">Author</th>",
        "<th class=\"th\">Publication Date</th>",
        "<th class=\"th\">Rent Until</th>",
        "<th class=\"th\">Actions</th>",
        "</tr></thead>\n<tbody>\n"
    ));

    for book in books {
        let actions = book.actions_for(viewer);
        let mut buttons = post_button(&book_path(&book.id, "view"), "View", &[]);
        if actions.edit {
            buttons.push_str(&post_button(&book_path(&book.id, "edit"), "Edit", &[]));
        }
        if actions.delete {
            buttons.push_str(&post_button(&book_path(&book.id, "delete"), "Delete", &[]));
        }
        if actions.borrow {
            buttons.push_str(&post_button(&book_path(&book.id, "borrow"), "Borrow", &[]));
        }
        if actions.return_book {
            buttons.push_str(&post_button(&book_path(&book.id, "return"), "Return", &[]));
        }

        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&book.title),
            escape(&book.author),
            escape(&book.publication_date),
            rent_until_label(book),
            buttons
        );
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn form(action: &str, fields: &BookFields, submit: &str) -> String {
    format!(
        concat!(
            "<form method=\"post\" action=\"{action}\">\n",
            "<label>Title: <input type=\"text\" name=\"title\" value=\"{title}\" required></label>\n",
            "<label>Author: <input type=\"text\" name=\"author\" value=\"{author}\" required></label>\n",
            "<label>Publication Date: <input type=\"date\" name=\"publication_date\" value=\"{date}\" required></label>\n",
            "<button type=\"submit\">{submit}</button>\n",
            "</form>\n"
        ),
        action = escape(action),
        title = escape(&fields.title),
        author = escape(&fields.author),
        date = escape(&fields.publication_date),
        submit = submit,
    )
}

pub fn add_form(draft: &BookFields) -> String {
    form("/books", draft, "Save Book")
}

pub fn edit_form(id: &BookId, draft: &BookFields) -> String {
    form(&book_path(id, "update"), draft, "Update Book")
}

pub fn detail(book: &Book) -> String {
    let borrower = book
        .borrowed_by
        .as_ref()
        .map(|p| escape(p.as_str()))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        concat!(
            "<div class=\"book-details\">\n",
            "<h2>Book Details</h2>\n",
            "<p><strong>Title:</strong> {}</p>\n",
            "<p><strong>Author:</strong> {}</p>\n",
            "<p><strong>Publication Date:</strong> {}</p>\n",
            "<p><strong>Rent Until:</strong> {}</p>\n",
            "<p><strong>Borrowed By:</strong> {}</p>\n",
            "{}\n",
            "</div>\n"
        ),
        escape(&book.title),
        escape(&book.author),
        escape(&book.publication_date),
        rent_until_label(book),
        borrower,
        post_button("/books/close", "Close", &[])
    )
}

pub fn prompt(prompt: &Prompt) -> String {
    match prompt {
        Prompt::ConfirmDelete(book) => {
            let action = book_path(&book.id, "delete/confirm");
            format!(
                "<div class=\"prompt\">\n<p>Are you sure you want to delete &quot;{}&quot;?</p>\n{}{}\n</div>\n",
                escape(&book.title),
                post_button(&action, "OK", &[("confirmed", "yes")]),
                post_button(&action, "Cancel", &[("confirmed", "no")])
            )
        }
        Prompt::ReturnDate(book) => format!(
            concat!(
                "<div class=\"prompt\">\n",
                "<form method=\"post\" action=\"{}\">\n",
                "<label>Please enter the return date for &quot;{}&quot; (YYYY-MM-DD): ",
                "<input type=\"date\" name=\"return_date\"></label>\n",
                "<button type=\"submit\">Borrow</button>\n",
                "</form>\n",
                "{}\n",
                "</div>\n"
            ),
            escape(&book_path(&book.id, "borrow/confirm")),
            escape(&book.title),
            post_button("/books/close", "Cancel", &[])
        ),
    }
}
