pub mod models;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use bookshelf_http::error::ApiError;
use bookshelf_store::{Book, BookStore};

use models::{CreateBook, UpdateBook};

const BOOK_NOT_FOUND: &str = "Book not found";
const MISSING_FIELDS: &str = "Missing required fields";
const MALFORMED_BODY: &str = "Malformed request body";

/// Build the books routes over a shared store handle.
pub fn router(store: Arc<BookStore>) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

/// GET /books
async fn list_books(State(store): State<Arc<BookStore>>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = store.list_all()?;
    Ok(Json(books))
}

/// GET /books/{id}
async fn get_book(
    State(store): State<Arc<BookStore>>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, ApiError> {
    let book = store
        .get(id)?
        .ok_or_else(|| ApiError::not_found(BOOK_NOT_FOUND))?;
    Ok(Json(book))
}

/// POST /books
async fn create_book(
    State(store): State<Arc<BookStore>>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request(MALFORMED_BODY))?;
    let (Some(title), Some(author)) = (payload.title, payload.author) else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };
    let book = store.insert(&title, &author)?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /books/{id}
async fn update_book(
    State(store): State<Arc<BookStore>>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request(MALFORMED_BODY))?;
    let book = store
        .update(id, &payload.into())?
        .ok_or_else(|| ApiError::not_found(BOOK_NOT_FOUND))?;
    Ok(Json(book))
}

/// DELETE /books/{id}
async fn delete_book(
    State(store): State<Arc<BookStore>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if !store.delete(id)? {
        return Err(ApiError::not_found(BOOK_NOT_FOUND));
    }
    Ok(Json(json!({ "message": "Book deleted" })))
}
