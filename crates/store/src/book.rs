use serde::{Deserialize, Serialize};

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier assigned by storage on insert
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
}

/// Partial update to a book; only present fields overwrite stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookPatch {
    /// Returns the stored record with this patch applied.
    pub fn apply(&self, mut book: Book) -> Book {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        book
    }
}
