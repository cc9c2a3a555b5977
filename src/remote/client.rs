//! HTTP client for the book canister

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
    models::{Book, BookId, Session},
};

use super::{wire::BookRecord, BackendConnector, LibraryBackend, RemoteError};

/// Calls canister methods as `POST {host}/canisters/{id}/{method}`
#[derive(Clone)]
pub struct HttpLibraryClient {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpLibraryClient {
    pub fn new(http: Client, config: &BackendConfig, session: &Session) -> Self {
        Self {
            http,
            base_url: format!(
                "{}/canisters/{}",
                config.host.trim_end_matches('/'),
                config.canister_id
            ),
            token: session.token.clone(),
        }
    }

    async fn call<A, T>(&self, method: &'static str, args: A) -> Result<T, RemoteError>
    where
        A: Serialize,
        T: DeserializeOwned,
    {
        tracing::debug!(method, "Calling canister");

        let response = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await
            .map_err(|source| RemoteError::Transport { method, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                method,
                status: status.as_u16(),
            });
        }

        let reply: Result<T, String> = response
            .json()
            .await
            .map_err(|e| RemoteError::Malformed {
                method,
                reason: e.to_string(),
            })?;

        reply.map_err(|reason| RemoteError::Rejected { method, reason })
    }
}

#[async_trait]
impl LibraryBackend for HttpLibraryClient {
    async fn get_books(&self) -> Result<Vec<Book>, RemoteError> {
        let records: Vec<BookRecord> = self.call("getBooks", json!([])).await?;

        records
            .into_iter()
            .map(|record| {
                Book::try_from(record).map_err(|reason| RemoteError::Malformed {
                    method: "getBooks",
                    reason,
                })
            })
            .collect()
    }

    async fn add_book(
        &self,
        title: &str,
        author: &str,
        publication_date: &str,
    ) -> Result<BookId, RemoteError> {
        self.call("addBook", json!([title, author, publication_date]))
            .await
    }

    async fn update_book(
        &self,
        id: &BookId,
        title: &str,
        author: &str,
        publication_date: &str,
    ) -> Result<(), RemoteError> {
        self.call("updateBook", json!([id, title, author, publication_date]))
            .await
    }

    async fn delete_book(&self, id: &BookId) -> Result<(), RemoteError> {
        self.call("deleteBook", json!([id])).await
    }

    async fn borrow_book(&self, id: &BookId, return_date_nanos: u64) -> Result<(), RemoteError> {
        self.call("borrowBook", json!([id, return_date_nanos])).await
    }

    async fn return_book(&self, id: &BookId) -> Result<(), RemoteError> {
        self.call("returnBook", json!([id])).await
    }
}

/// Hands out HTTP clients sharing one connection pool
#[derive(Clone)]
pub struct HttpConnector {
    http: Client,
    config: BackendConfig,
}

impl HttpConnector {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }
}

impl BackendConnector for HttpConnector {
    fn connect(&self, session: &Session) -> Arc<dyn LibraryBackend> {
        Arc::new(HttpLibraryClient::new(self.http.clone(), &self.config, session))
    }
}
