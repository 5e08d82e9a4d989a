//! Book catalog service

use std::sync::Arc;

use serde_json::Value;

use super::validation::validate;
use crate::{
    error::{AppError, AppResult},
    models::{Book, Intent},
    repository::{BookStore, StoreError},
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

fn not_found(isbn: &str) -> AppError {
    AppError::NotFound(format!("Book {} not found", isbn))
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// List every book in storage order
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        let books = self.store.find_all().await?;
        tracing::debug!("Listed {} book(s)", books.len());
        Ok(books)
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.store
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| not_found(isbn))
    }

    /// Validate and persist a new book
    pub async fn create(&self, payload: &Value) -> AppResult<Book> {
        let fields = validate(payload, Intent::Create).map_err(|e| {
            tracing::warn!("Rejected book creation: {}", e);
            e
        })?;
        let book = Book::from_fields(&fields)?;

        match self.store.insert(&book).await {
            Ok(created) => {
                tracing::info!("Created book isbn={}", created.isbn);
                Ok(created)
            }
            Err(StoreError::DuplicateKey(isbn)) => Err(AppError::Conflict(format!(
                "Book with ISBN {} already exists",
                isbn
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge a partial payload over an existing book.
    ///
    /// The payload is validated before the lookup, so a malformed payload is
    /// reported as such whether or not the book exists.
    pub async fn update(&self, isbn: &str, payload: &Value) -> AppResult<Book> {
        let changes = validate(payload, Intent::Update).map_err(|e| {
            tracing::warn!("Rejected update of book isbn={}: {}", isbn, e);
            e
        })?;

        let existing = self.get_by_isbn(isbn).await?;
        if changes.is_empty() {
            tracing::debug!("Empty update for book isbn={}", isbn);
            return Ok(existing);
        }

        let merged = existing.merged(&changes);
        let updated = self
            .store
            .replace(isbn, &merged)
            .await
            .map_err(|e| match e {
                StoreError::KeyNotFound(_) => not_found(isbn),
                other => other.into(),
            })?;

        tracing::info!("Updated {} field(s) of book isbn={}", changes.len(), isbn);
        Ok(updated)
    }

    /// Permanently delete a book
    pub async fn remove(&self, isbn: &str) -> AppResult<()> {
        self.store.delete(isbn).await.map_err(|e| match e {
            StoreError::KeyNotFound(_) => not_found(isbn),
            other => other.into(),
        })?;
        tracing::info!("Deleted book isbn={}", isbn);
        Ok(())
    }

    /// Check the underlying store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.store
            .ping()
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }
}
