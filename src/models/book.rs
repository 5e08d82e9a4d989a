//! Book model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::schema::Field;
use crate::error::{FieldViolation, Problem, ValidationError};

/// Book record, keyed by ISBN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// ISBN, fixed at creation
    pub isbn: String,
    /// Store page URL
    pub amazon_url: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    /// Page count (> 0)
    pub pages: Option<i32>,
    pub publisher: Option<String>,
    pub title: String,
    /// Publication year
    pub year: Option<i32>,
}

/// Typed value of a validated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Null,
}

impl FieldValue {
    fn text(&self) -> Option<String> {
        match self {
            FieldValue::Text(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn integer(&self) -> Option<i32> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

/// Payload fields that passed validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedFields(BTreeMap<Field, FieldValue>);

impl ValidatedFields {
    pub fn insert(&mut self, field: Field, value: FieldValue) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.0.iter().map(|(field, value)| (*field, value))
    }
}

impl Book {
    /// Build a new record from validated create fields
    pub fn from_fields(fields: &ValidatedFields) -> Result<Self, ValidationError> {
        let isbn = fields.get(Field::Isbn).and_then(FieldValue::text);
        let title = fields.get(Field::Title).and_then(FieldValue::text);

        let (isbn, title) = match (isbn, title) {
            (Some(isbn), Some(title)) => (isbn, title),
            (isbn, title) => {
                let mut missing = Vec::new();
                if isbn.is_none() {
                    missing.push(FieldViolation::new(Field::Isbn.name(), Problem::MissingField));
                }
                if title.is_none() {
                    missing.push(FieldViolation::new(Field::Title.name(), Problem::MissingField));
                }
                return Err(ValidationError::Fields(missing));
            }
        };

        let mut book = Book {
            isbn,
            amazon_url: None,
            author: None,
            language: None,
            pages: None,
            publisher: None,
            title,
            year: None,
        };
        book.apply(fields);
        Ok(book)
    }

    /// Copy of this record with `changes` written over it.
    ///
    /// Fields absent from `changes` keep their value; `isbn` never changes.
    pub fn merged(&self, changes: &ValidatedFields) -> Self {
        let mut book = self.clone();
        book.apply(changes);
        book
    }

    fn apply(&mut self, fields: &ValidatedFields) {
        for (field, value) in fields.iter() {
            match field {
                Field::Isbn => {}
                Field::Title => {
                    if let Some(title) = value.text() {
                        self.title = title;
                    }
                }
                Field::AmazonUrl => self.amazon_url = value.text(),
                Field::Author => self.author = value.text(),
                Field::Language => self.language = value.text(),
                Field::Publisher => self.publisher = value.text(),
                Field::Pages => self.pages = value.integer(),
                Field::Year => self.year = value.integer(),
            }
        }
    }
}
