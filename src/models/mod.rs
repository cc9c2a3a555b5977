//! Data models for Book Register

pub mod book;
pub mod notification;
pub mod principal;
pub mod session;

pub use book::{Book, BookActions, BookFields, BookId};
pub use notification::{Notification, Tone};
pub use principal::Principal;
pub use session::Session;
