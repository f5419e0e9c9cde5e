use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::book::{Book, BookPatch};

/// Errors surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Handle over the book table.
///
/// Wraps a single SQLite connection behind a mutex so one handle can be
/// shared across request handlers. Each method holds the lock for exactly
/// one storage operation; conflicting writes serialize here.
pub struct BookStore {
    conn: Mutex<Connection>,
}

impl BookStore {
    /// Open (creating if absent) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Create the book table if it does not already exist.
    ///
    /// Idempotent; never drops or alters existing data. Called once at
    /// startup before the server accepts traffic.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS books (
                id     INTEGER PRIMARY KEY AUTOINCREMENT,
                title  TEXT NOT NULL,
                author TEXT NOT NULL
            );",
        )?;
        tracing::debug!("book schema ensured");
        Ok(())
    }

    /// Return every stored book, ordered by id.
    pub fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, title, author FROM books ORDER BY id")?;
        let rows = stmt.query_map([], row_to_book)?;
        let mut books = Vec::new();
        for book in rows {
            books.push(book?);
        }
        Ok(books)
    }

    /// Look up a book by primary key.
    pub fn get(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let conn = self.conn()?;
        let book = conn
            .query_row(
                "SELECT id, title, author FROM books WHERE id = ?1",
                params![id],
                row_to_book,
            )
            .optional()?;
        Ok(book)
    }

    /// Persist a new book and return it with its assigned id.
    pub fn insert(&self, title: &str, author: &str) -> Result<Book, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO books (title, author) VALUES (?1, ?2)",
            params![title, author],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(id, "book inserted");
        Ok(Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
        })
    }

    /// Overwrite only the fields present in `patch`, returning the merged
    /// record, or `None` if no book has this id.
    ///
    /// The read and write happen under one lock hold, so a concurrent
    /// delete cannot interleave between them.
    pub fn update(&self, id: i64, patch: &BookPatch) -> Result<Option<Book>, StoreError> {
        let conn = self.conn()?;
        let existing = conn
            .query_row(
                "SELECT id, title, author FROM books WHERE id = ?1",
                params![id],
                row_to_book,
            )
            .optional()?;
        let Some(existing) = existing else {
            return Ok(None);
        };
        let merged = patch.apply(existing);
        conn.execute(
            "UPDATE books SET title = ?1, author = ?2 WHERE id = ?3",
            params![merged.title, merged.author, id],
        )?;
        tracing::debug!(id, "book updated");
        Ok(Some(merged))
    }

    /// Remove a book by id. Returns `false` if no row matched.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let removed = self
            .conn()?
            .execute("DELETE FROM books WHERE id = ?1", params![id])?;
        if removed > 0 {
            tracing::debug!(id, "book deleted");
        }
        Ok(removed > 0)
    }
}

fn row_to_book(row: &rusqlite::Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_store() -> BookStore {
        let store = BookStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = setup_store();
        let first = store.insert("Dune", "Frank Herbert").unwrap();
        let second = store.insert("Hyperion", "Dan Simmons").unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn get_returns_inserted_record() {
        let store = setup_store();
        let inserted = store.insert("Dune", "Frank Herbert").unwrap();
        let fetched = store.get(inserted.id).unwrap().unwrap();
        assert_eq!(fetched, inserted);
    }

    #[test]
    fn get_missing_id_is_none() {
        let store = setup_store();
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = setup_store();
        store.insert("A", "a").unwrap();
        store.insert("B", "b").unwrap();
        store.insert("C", "c").unwrap();
        let titles: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn update_title_only_keeps_author() {
        let store = setup_store();
        let book = store.insert("Dune", "Frank Herbert").unwrap();
        let patch = BookPatch {
            title: Some("Dune Messiah".to_string()),
            author: None,
        };
        let updated = store.update(book.id, &patch).unwrap().unwrap();
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.author, "Frank Herbert");
        // Persisted, not just merged in memory.
        assert_eq!(store.get(book.id).unwrap().unwrap(), updated);
    }

    #[test]
    fn update_missing_id_is_none() {
        let store = setup_store();
        let patch = BookPatch {
            title: Some("x".to_string()),
            author: None,
        };
        assert!(store.update(7, &patch).unwrap().is_none());
    }

    #[test]
    fn delete_removes_record_once() {
        let store = setup_store();
        let book = store.insert("Dune", "Frank Herbert").unwrap();
        assert!(store.delete(book.id).unwrap());
        assert!(store.get(book.id).unwrap().is_none());
        assert!(!store.delete(book.id).unwrap());
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let store = setup_store();
        store.insert("Dune", "Frank Herbert").unwrap();
        store.ensure_schema().unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}
