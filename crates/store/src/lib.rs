//! SQLite-backed storage for book records.

pub mod book;
pub mod store;

pub use book::{Book, BookPatch};
pub use store::{BookStore, StoreError};
