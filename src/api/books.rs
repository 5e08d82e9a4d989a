//! Book endpoints
//!
//! Single books are wrapped as `{"book": ...}`, lists as `{"books": [...]}`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::Book,
    AppState,
};

/// Confirmation message returned after a delete
pub const BOOK_DELETED: &str = "Book deleted";

#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Serialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BooksResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<BooksResponse>> {
    let books = state.services.books.list_all().await?;
    Ok(Json(BooksResponse { books }))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.get_by_isbn(&isbn).await?;
    Ok(Json(BookResponse { book }))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let Json(payload) = payload?;
    let book = state.services.books.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(BookResponse { book })))
}

/// Update some fields of a book
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body(content = Book, description = "Any subset of the book fields except isbn"),
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<BookResponse>> {
    let Json(payload) = payload?;
    let book = state.services.books.update(&isbn, &payload).await?;
    Ok(Json(BookResponse { book }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.remove(&isbn).await?;
    Ok(Json(MessageResponse {
        message: BOOK_DELETED.to_string(),
    }))
}
