//! In-process book store, kept in insertion order

use async_trait::async_trait;
use indexmap::{map::Entry, IndexMap};
use tokio::sync::RwLock;

use super::{BookStore, StoreError};
use crate::models::Book;

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<IndexMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        Ok(self.books.read().await.get(isbn).cloned())
    }

    async fn insert(&self, book: &Book) -> Result<Book, StoreError> {
        match self.books.write().await.entry(book.isbn.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(book.isbn.clone())),
            Entry::Vacant(slot) => Ok(slot.insert(book.clone()).clone()),
        }
    }

    async fn replace(&self, isbn: &str, book: &Book) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        let stored = books
            .get_mut(isbn)
            .ok_or_else(|| StoreError::KeyNotFound(isbn.to_string()))?;
        *stored = Book {
            isbn: isbn.to_string(),
            ..book.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, isbn: &str) -> Result<(), StoreError> {
        self.books
            .write()
            .await
            .shift_remove(isbn)
            .map(|_| ())
            .ok_or_else(|| StoreError::KeyNotFound(isbn.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
