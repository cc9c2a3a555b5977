//! Wire format of canister replies
//!
//! Optional values travel as empty or single-element arrays. They are turned
//! into `Option` here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::models::{Book, BookId, Principal};

/// Book as returned by `getBooks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publication_date: String,
    pub principal: Principal,
    #[serde(default)]
    pub rent_until: Vec<u64>,
    #[serde(default)]
    pub borrowed_by: Vec<Principal>,
}

fn optional<T>(field: &str, mut values: Vec<T>) -> Result<Option<T>, String> {
    match values.len() {
        0 | 1 => Ok(values.pop()),
        n => Err(format!("{} carries {} values, expected at most one", field, n)),
    }
}

impl TryFrom<BookRecord> for Book {
    type Error = String;

    fn try_from(record: BookRecord) -> Result<Self, Self::Error> {
        let rent_until = optional("rentUntil", record.rent_until)?;
        let borrowed_by = optional("borrowedBy", record.borrowed_by)?;

        if rent_until.is_some() != borrowed_by.is_some() {
            return Err(format!(
                "book {} has rentUntil without borrowedBy or the reverse",
                record.id
            ));
        }

        Ok(Book {
            id: record.id,
            title: record.title,
            author: record.author,
            publication_date: record.publication_date,
            owner: record.principal,
            rent_until,
            borrowed_by,
        })
    }
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            publication_date: book.publication_date.clone(),
            principal: book.owner.clone(),
            rent_until: book.rent_until.into_iter().collect(),
            borrowed_by: book.borrowed_by.clone().into_iter().collect(),
        }
    }
}
