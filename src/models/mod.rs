//! Data models for the bookstore

pub mod book;
pub mod schema;

// Re-export commonly used types
pub use book::{Book, FieldValue, ValidatedFields};
pub use schema::{Field, FieldKind, FieldSpec, Intent};
