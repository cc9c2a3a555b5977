//! In-process stand-in for the book canister gateway.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use book_register::{
    models::{Book, BookId, Principal},
    remote::wire::BookRecord,
    services::identity::IdentityClaims,
};
use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A call the canister received, for assertions
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub caller: String,
    pub args: Value,
}

#[derive(Default)]
struct Ledger {
    books: Vec<Book>,
    next_id: u64,
    calls: Vec<RecordedCall>,
    unavailable: bool,
}

#[derive(Clone)]
struct FakeState {
    secret: String,
    ledger: Arc<Mutex<Ledger>>,
}

pub struct FakeCanister {
    pub addr: SocketAddr,
    state: FakeState,
}

impl FakeCanister {
    /// Start the gateway on a free local port
    pub async fn start(secret: &str) -> Self {
        let state = FakeState {
            secret: secret.to_string(),
            ledger: Arc::new(Mutex::new(Ledger::default())),
        };

        let app = Router::new()
            .route("/canisters/:canister/:method", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake canister");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn books(&self) -> Vec<Book> {
        self.state.ledger.lock().await.books.clone()
    }

    pub async fn calls(&self, method: &str) -> Vec<RecordedCall> {
        self.state
            .ledger
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Make every call answer HTTP 503
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.ledger.lock().await.unavailable = unavailable;
    }

    /// Seed a book directly, bypassing any call
    pub async fn seed(&self, book: Book) {
        self.state.ledger.lock().await.books.push(book);
    }
}

fn caller(headers: &HeaderMap, secret: &str) -> Option<Principal> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let data = decode::<IdentityClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    data.claims.sub.parse().ok()
}

fn ok(value: Value) -> Json<Value> {
    Json(json!({ "Ok": value }))
}

fn err(reason: &str) -> Json<Value> {
    Json(json!({ "Err": reason }))
}

fn text(args: &Value, index: usize) -> String {
    args[index].as_str().unwrap_or_default().to_string()
}

async fn handle(
    State(state): State<FakeState>,
    Path((_canister, method)): Path<(String, String)>,
    headers: HeaderMap,
    Json(args): Json<Value>,
) -> impl IntoResponse {
    let Some(principal) = caller(&headers, &state.secret) else {
        return (StatusCode::UNAUTHORIZED, err("anonymous caller")).into_response();
    };

    let mut ledger = state.ledger.lock().await;
    if ledger.unavailable {
        return (StatusCode::SERVICE_UNAVAILABLE, err("unavailable")).into_response();
    }

    ledger.calls.push(RecordedCall {
        method: method.clone(),
        caller: principal.to_string(),
        args: args.clone(),
    });

    let id = BookId(text(&args, 0));
    let position = ledger.books.iter().position(|b| b.id == id);

    let reply = match method.as_str() {
        "getBooks" => {
            let records: Vec<BookRecord> = ledger.books.iter().map(BookRecord::from).collect();
            ok(serde_json::to_value(records).unwrap())
        }
        "addBook" => {
            ledger.next_id += 1;
            let book = Book {
                id: BookId(format!("book-{}", ledger.next_id)),
                title: text(&args, 0),
                author: text(&args, 1),
                publication_date: text(&args, 2),
                owner: principal,
                rent_until: None,
                borrowed_by: None,
            };
            let id = book.id.clone();
            ledger.books.push(book);
            ok(json!(id))
        }
        "updateBook" => match position {
            None => err("Book not found"),
            Some(i) if ledger.books[i].owner != principal => err("Only the owner can update"),
            Some(i) => {
                let book = &mut ledger.books[i];
                book.title = text(&args, 1);
                book.author = text(&args, 2);
                book.publication_date = text(&args, 3);
                ok(Value::Null)
            }
        },
        "deleteBook" => match position {
            None => err("Book not found"),
            Some(i) if ledger.books[i].owner != principal => err("Only the owner can delete"),
            Some(i) => {
                ledger.books.remove(i);
                ok(Value::Null)
            }
        },
        "borrowBook" => {
            let nanos = args[1].as_u64().unwrap_or_default();
            let now = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
            match position {
                None => err("Book not found"),
                Some(i) if ledger.books[i].owner == principal => err("Owner cannot borrow"),
                Some(i) if ledger.books[i].is_rented() => err("Book already borrowed"),
                Some(_) if nanos <= now => err("Return date must be in the future"),
                Some(i) => {
                    let book = &mut ledger.books[i];
                    book.rent_until = Some(nanos);
                    book.borrowed_by = Some(principal);
                    ok(Value::Null)
                }
            }
        }
        "returnBook" => match position {
            None => err("Book not found"),
            Some(i) if !ledger.books[i].is_borrowed_by(&principal) => err("Not the borrower"),
            Some(i) => {
                let book = &mut ledger.books[i];
                book.rent_until = None;
                book.borrowed_by = None;
                ok(Value::Null)
            }
        },
        other => return (StatusCode::NOT_FOUND, err(&format!("no method {}", other))).into_response(),
    };

    reply.into_response()
}
