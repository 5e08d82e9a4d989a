//! PostgreSQL book store

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use super::{BookStore, StoreError};
use crate::{config::DatabaseConfig, models::Book};

const COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect a pool and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        if config.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(sqlx::Error::from)?;
            tracing::info!("Database migrations completed");
        }

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books", COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE isbn = $1", COLUMNS))
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, book: &Book) -> Result<Book, StoreError> {
        let query = format!(
            r#"
            INSERT INTO books ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {columns}
            "#,
            columns = COLUMNS
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(&book.isbn)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::DuplicateKey(book.isbn.clone())
                }
                other => StoreError::Database(other),
            })
    }

    async fn replace(&self, isbn: &str, book: &Book) -> Result<Book, StoreError> {
        let query = format!(
            r#"
            UPDATE books
            SET amazon_url = $2, author = $3, language = $4, pages = $5,
                publisher = $6, title = $7, year = $8
            WHERE isbn = $1
            RETURNING {}
            "#,
            COLUMNS
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .bind(&book.amazon_url)
            .bind(&book.author)
            .bind(&book.language)
            .bind(book.pages)
            .bind(&book.publisher)
            .bind(&book.title)
            .bind(book.year)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::KeyNotFound(isbn.to_string()))
    }

    async fn delete(&self, isbn: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::KeyNotFound(isbn.to_string()));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
