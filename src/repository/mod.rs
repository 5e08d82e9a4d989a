//! Storage layer for book records

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    config::{AppConfig, StorageBackend},
    models::Book,
};

/// Failures reported by a book store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("a record with key {0} already exists")]
    DuplicateKey(String),

    #[error("no record with key {0}")]
    KeyNotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistent row store for books, keyed by ISBN.
///
/// Each call must be atomic for its key; callers hold no locks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every stored book, in the store's native order
    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    /// Persist a new record, failing with `DuplicateKey` if the ISBN is taken
    async fn insert(&self, book: &Book) -> Result<Book, StoreError>;

    /// Overwrite the record stored under `isbn`, failing with `KeyNotFound` if absent
    async fn replace(&self, isbn: &str, book: &Book) -> Result<Book, StoreError>;

    /// Remove the record stored under `isbn`, failing with `KeyNotFound` if absent
    async fn delete(&self, isbn: &str) -> Result<(), StoreError>;

    /// Check the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Open the store selected by configuration
pub async fn open(config: &AppConfig) -> Result<Arc<dyn BookStore>, StoreError> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let store = books::PgBookStore::connect(&config.database).await?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, records are lost on shutdown");
            Ok(Arc::new(memory::MemoryBookStore::new()))
        }
    }
}
