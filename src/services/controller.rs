//! View-state controller
//!
//! Owns what one signed-in user sees: the book list, the open view, a pending
//! prompt and the current notification. Operations that need the canister
//! return a [`RemoteCall`]; local state only changes once its [`Completion`]
//! comes back.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::{
    models::{Book, BookFields, BookId, Notification, Tone},
    remote::{LibraryBackend, RemoteError},
};

use super::clock::Clock;

/// The single view shown below the toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    List,
    Adding(BookFields),
    Editing { id: BookId, draft: BookFields },
    Viewing(Book),
}

/// Dialogs shown on top of the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    ConfirmDelete(Book),
    ReturnDate(Book),
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub books: Vec<Book>,
    pub view: View,
    pub prompt: Option<Prompt>,
    pub notification: Option<Notification>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            books: Vec::new(),
            view: View::List,
            prompt: None,
            notification: None,
        }
    }
}

impl ViewState {
    /// Book the open view refers to, if any
    pub fn selected(&self) -> Option<&BookId> {
        match &self.view {
            View::Editing { id, .. } => Some(id),
            View::Viewing(book) => Some(&book.id),
            View::List | View::Adding(_) => None,
        }
    }

    pub fn active_notification(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.is_active(now))
    }
}

/// Reasons a return date is refused before calling the canister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReturnDateError {
    #[error("Borrowing failed. Enter a valid date!")]
    Missing,
    #[error("Borrowing failed. Enter a valid date!")]
    Unparseable,
    #[error("Borrowing failed. Please enter a valid future date.")]
    NotInFuture,
}

/// Parse a return date into the canister's resolution (nanoseconds).
///
/// `YYYY-MM-DD` means midnight UTC; RFC 3339 timestamps are taken as given.
pub fn return_date_nanos(input: Option<&str>, now: DateTime<Utc>) -> Result<u64, ReturnDateError> {
    let raw = input.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ReturnDateError::Missing);
    }

    let date = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(day) => day
            .and_hms_opt(0, 0, 0)
            .ok_or(ReturnDateError::Unparseable)?
            .and_utc(),
        Err(_) => DateTime::parse_from_rfc3339(raw)
            .map_err(|_| ReturnDateError::Unparseable)?
            .with_timezone(&Utc),
    };

    let millis = date.timestamp_millis();
    if millis <= now.timestamp_millis() {
        return Err(ReturnDateError::NotInFuture);
    }

    u64::try_from(millis)
        .ok()
        .and_then(|ms| ms.checked_mul(1_000_000))
        .ok_or(ReturnDateError::Unparseable)
}

/// A canister call prepared from the current state.
///
/// [`RemoteCall::run`] needs only the backend, so callers sharing the
/// controller can release it while the call is in flight and hand the
/// [`Completion`] back to [`LibraryController::complete`] afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Fetch,
    Add(BookFields),
    Update { id: BookId, fields: BookFields },
    Delete(BookId),
    Borrow { id: BookId, return_date_nanos: u64 },
    Return(BookId),
}

impl RemoteCall {
    /// Issue the call, then reload the list if the canister accepted it
    pub async fn run(self, backend: &dyn LibraryBackend) -> Completion {
        let result = match &self {
            RemoteCall::Fetch => Ok(()),
            RemoteCall::Add(fields) => backend
                .add_book(&fields.title, &fields.author, &fields.publication_date)
                .await
                .map(|id| tracing::info!(book_id = %id, "Book registered")),
            RemoteCall::Update { id, fields } => backend
                .update_book(id, &fields.title, &fields.author, &fields.publication_date)
                .await,
            RemoteCall::Delete(id) => backend.delete_book(id).await,
            RemoteCall::Borrow {
                id,
                return_date_nanos,
            } => backend.borrow_book(id, *return_date_nanos).await,
            RemoteCall::Return(id) => backend.return_book(id).await,
        };

        let books = if result.is_ok() {
            Some(backend.get_books().await)
        } else {
            None
        };

        Completion {
            call: self,
            result,
            books,
        }
    }

    fn success_message(&self) -> Option<&'static str> {
        match self {
            RemoteCall::Fetch => None,
            RemoteCall::Add(_) => Some("Book Registered successfully!"),
            RemoteCall::Update { .. } => Some("Book updated successfully!"),
            RemoteCall::Delete(_) => Some("Book deleted successfully!"),
            RemoteCall::Borrow { .. } => Some("Book borrowed successfully!"),
            RemoteCall::Return(_) => Some("Book returned successfully!"),
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            RemoteCall::Fetch => "Failed to fetch books.",
            RemoteCall::Add(_) => "Failed to register book.",
            RemoteCall::Update { .. } => "Failed to update book.",
            RemoteCall::Delete(_) => "Failed to delete book.",
            RemoteCall::Borrow { .. } => "Failed to borrow book.",
            RemoteCall::Return(_) => "Failed to return book.",
        }
    }
}

/// A finished call and the list fetched after it
#[derive(Debug)]
pub struct Completion {
    call: RemoteCall,
    result: Result<(), RemoteError>,
    books: Option<Result<Vec<Book>, RemoteError>>,
}

pub struct LibraryController {
    backend: Arc<dyn LibraryBackend>,
    clock: Arc<dyn Clock>,
    display: Duration,
    state: ViewState,
}

impl LibraryController {
    pub fn new(backend: Arc<dyn LibraryBackend>, clock: Arc<dyn Clock>, display: Duration) -> Self {
        Self {
            backend,
            clock,
            display,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Client bound to this session's principal
    pub fn backend(&self) -> Arc<dyn LibraryBackend> {
        self.backend.clone()
    }

    pub fn request_add(&mut self) {
        self.open(View::Adding(BookFields::default()));
    }

    pub fn request_edit(&mut self, id: &BookId) {
        if let Some(book) = self.lookup(id) {
            self.open(View::Editing {
                id: book.id.clone(),
                draft: book.fields(),
            });
        }
    }

    pub fn request_view(&mut self, id: &BookId) {
        if let Some(book) = self.lookup(id) {
            self.open(View::Viewing(book));
        }
    }

    /// Back to the list without fetching
    pub fn close(&mut self) {
        self.open(View::List);
    }

    /// Show the list, fetching only when nothing has been loaded yet
    pub fn request_list(&mut self) -> Option<RemoteCall> {
        self.open(View::List);
        self.state.books.is_empty().then_some(RemoteCall::Fetch)
    }

    pub fn submit_add(&mut self, fields: BookFields) -> Option<RemoteCall> {
        let fields = fields.trimmed();
        if let View::Adding(draft) = &mut self.state.view {
            *draft = fields.clone();
        }

        if fields.validate().is_err() {
            self.notify("Please fill in all fields.", Tone::Failure);
            return None;
        }
        Some(RemoteCall::Add(fields))
    }

    pub fn submit_edit(&mut self, id: &BookId, fields: BookFields) -> Option<RemoteCall> {
        let fields = fields.trimmed();
        if let View::Editing { id: editing, draft } = &mut self.state.view {
            if *editing == *id {
                *draft = fields.clone();
            }
        }

        if fields.validate().is_err() {
            self.notify("Please fill in all fields.", Tone::Failure);
            return None;
        }
        Some(RemoteCall::Update {
            id: id.clone(),
            fields,
        })
    }

    /// Ask before deleting
    pub fn prompt_delete(&mut self, id: &BookId) {
        if let Some(book) = self.lookup(id) {
            self.state.prompt = Some(Prompt::ConfirmDelete(book));
        }
    }

    pub fn confirm_delete(&mut self, id: &BookId, confirmed: bool) -> Option<RemoteCall> {
        self.state.prompt = None;
        confirmed.then(|| RemoteCall::Delete(id.clone()))
    }

    /// Ask for a return date
    pub fn prompt_borrow(&mut self, id: &BookId) {
        if let Some(book) = self.lookup(id) {
            self.state.prompt = Some(Prompt::ReturnDate(book));
        }
    }

    pub fn request_borrow(
        &mut self,
        id: &BookId,
        return_date: Option<&str>,
    ) -> Option<RemoteCall> {
        self.state.prompt = None;

        match return_date_nanos(return_date, self.now()) {
            Ok(nanos) => Some(RemoteCall::Borrow {
                id: id.clone(),
                return_date_nanos: nanos,
            }),
            Err(e) => {
                tracing::debug!(book_id = %id, reason = ?e, "Return date refused");
                self.notify(e.to_string(), Tone::Failure);
                None
            }
        }
    }

    /// The canister decides who may return a book
    pub fn request_return(&mut self, id: &BookId) -> Option<RemoteCall> {
        Some(RemoteCall::Return(id.clone()))
    }

    /// Apply a finished call: notify, then take the reloaded list.
    ///
    /// Completions are applied in the order they arrive, so with overlapping
    /// calls the last one to finish owns the notification.
    pub fn complete(&mut self, completion: Completion) {
        let Completion {
            call,
            result,
            books,
        } = completion;

        if let Err(e) = result {
            tracing::error!(call = ?call, error = %e, "Remote call failed");
            self.notify(call.failure_message(), Tone::Failure);
            return;
        }

        if let Some(message) = call.success_message() {
            tracing::info!(call = ?call, "Remote call succeeded");
            self.notify(message, Tone::Success);
        }
        if self.form_submitted(&call) {
            self.open(View::List);
        }

        match books {
            Some(Ok(books)) => {
                tracing::debug!(count = books.len(), "Fetched books");
                self.state.books = books;
                self.reconcile_selection();
            }
            Some(Err(e)) if call == RemoteCall::Fetch => {
                tracing::error!(error = %e, "Failed to fetch books");
                self.notify(call.failure_message(), Tone::Failure);
            }
            // The mutation went through; a failed reload only leaves the list stale.
            Some(Err(e)) => tracing::error!(error = %e, "Failed to refresh books after update"),
            None => {}
        }
    }

    /// Run a call while holding the controller for its whole duration
    pub async fn drive(&mut self, call: Option<RemoteCall>) {
        if let Some(call) = call {
            let completion = call.run(self.backend.as_ref()).await;
            self.complete(completion);
        }
    }

    fn open(&mut self, view: View) {
        self.state.prompt = None;
        self.state.view = view;
    }

    fn notify(&mut self, message: impl Into<String>, tone: Tone) {
        self.state.notification = Some(Notification::new(message, tone, self.now(), self.display));
    }

    fn lookup(&mut self, id: &BookId) -> Option<Book> {
        let found = self.state.books.iter().find(|b| &b.id == id).cloned();
        if found.is_none() {
            tracing::warn!(book_id = %id, "Book not in local list");
            self.notify("Book not found.", Tone::Failure);
        }
        found
    }

    /// Whether `call` came from the form that is still open
    fn form_submitted(&self, call: &RemoteCall) -> bool {
        match (call, &self.state.view) {
            (RemoteCall::Add(_), View::Adding(_)) => true,
            (RemoteCall::Update { id, .. }, View::Editing { id: editing, .. }) => id == editing,
            _ => false,
        }
    }

    fn reconcile_selection(&mut self) {
        let books = &self.state.books;
        let next = match &self.state.view {
            View::Viewing(book) => Some(
                books
                    .iter()
                    .find(|b| b.id == book.id)
                    .map_or(View::List, |fresh| View::Viewing(fresh.clone())),
            ),
            View::Editing { id, .. } if !books.iter().any(|b| &b.id == id) => Some(View::List),
            _ => None,
        };

        if let Some(view) = next {
            self.state.view = view;
        }
    }
}
