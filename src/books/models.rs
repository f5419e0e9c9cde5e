use serde::Deserialize;

use bookshelf_store::BookPatch;

/// Request payload for creating a book.
///
/// Both fields are required; they are optional here so that presence can
/// be checked explicitly at the boundary instead of failing inside the
/// deserializer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Request payload for a partial update; any subset of fields may appear.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl From<UpdateBook> for BookPatch {
    fn from(payload: UpdateBook) -> Self {
        Self {
            title: payload.title,
            author: payload.author,
        }
    }
}
