//! Remote library client: typed access to the book canister

pub mod client;
pub mod wire;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Book, BookId, Session};

pub use client::{HttpConnector, HttpLibraryClient};

/// Failures of a canister call
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a reply
    #[error("Transport error calling {method}: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} returned HTTP {status}")]
    Status { method: &'static str, status: u16 },

    /// The canister refused the call (ownership, borrow state, validation)
    #[error("{method} rejected: {reason}")]
    Rejected { method: &'static str, reason: String },

    #[error("Malformed reply from {method}: {reason}")]
    Malformed { method: &'static str, reason: String },
}

/// The six operations of the book canister.
///
/// Every call is attributed to the identity the implementation was built
/// with; ownership and borrow rules are enforced by the canister.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    async fn get_books(&self) -> Result<Vec<Book>, RemoteError>;

    async fn add_book(
        &self,
        title: &str,
        author: &str,
        publication_date: &str,
    ) -> Result<BookId, RemoteError>;

    async fn update_book(
        &self,
        id: &BookId,
        title: &str,
        author: &str,
        publication_date: &str,
    ) -> Result<(), RemoteError>;

    async fn delete_book(&self, id: &BookId) -> Result<(), RemoteError>;

    async fn borrow_book(&self, id: &BookId, return_date_nanos: u64) -> Result<(), RemoteError>;

    async fn return_book(&self, id: &BookId) -> Result<(), RemoteError>;
}

/// Builds a backend bound to a session's identity
pub trait BackendConnector: Send + Sync {
    fn connect(&self, session: &Session) -> Arc<dyn LibraryBackend>;
}
