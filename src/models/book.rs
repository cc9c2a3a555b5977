//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::principal::Principal;

/// Backend-assigned book identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        BookId(s.to_string())
    }
}

/// A registered book as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publication_date: String,
    /// Principal that registered the book
    pub owner: Principal,
    /// End of the rent window, in nanoseconds since the Unix epoch
    pub rent_until: Option<u64>,
    pub borrowed_by: Option<Principal>,
}

/// Actions the list offers to a given viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookActions {
    pub edit: bool,
    pub delete: bool,
    pub borrow: bool,
    pub return_book: bool,
}

impl Book {
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        &self.owner == principal
    }

    pub fn is_rented(&self) -> bool {
        self.rent_until.is_some()
    }

    pub fn is_borrowed_by(&self, principal: &Principal) -> bool {
        self.borrowed_by.as_ref() == Some(principal)
    }

    /// Rent end as a timestamp, if the book is rented
    pub fn rent_until_utc(&self) -> Option<DateTime<Utc>> {
        self.rent_until
            .and_then(|nanos| i64::try_from(nanos).ok())
            .map(DateTime::from_timestamp_nanos)
    }

    /// Advisory affordances only; the backend re-checks every call.
    pub fn actions_for(&self, viewer: &Principal) -> BookActions {
        let owner = self.is_owned_by(viewer);
        BookActions {
            edit: owner,
            delete: owner,
            borrow: !owner && !self.is_rented(),
            return_book: self.is_borrowed_by(viewer),
        }
    }

    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            publication_date: self.publication_date.clone(),
        }
    }
}

/// Fields submitted by the add and edit forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct BookFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Publication date is required"))]
    pub publication_date: String,
}

impl BookFields {
    pub fn new(title: &str, author: &str, publication_date: &str) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            publication_date: publication_date.to_string(),
        }
    }

    /// Surrounding whitespace is not part of a value
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            publication_date: self.publication_date.trim().to_string(),
        }
    }
}
