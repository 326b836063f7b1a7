use crate::models::{Book, BookForm};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

/// RepoError
///
/// The persistence-layer failure taxonomy. `NotFound` is a distinct outcome from
/// a database failure so the handlers can answer 404 instead of 500; `Read` and
/// `Write` carry the underlying driver error for the logs only.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("book not found")]
    NotFound,
    #[error("database read failed: {0}")]
    Read(#[source] sqlx::Error),
    #[error("database write failed: {0}")]
    Write(#[source] sqlx::Error),
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Book Retrieval ---
    // Full joined listing. No ordering is guaranteed; an empty result is valid.
    async fn list_all(&self) -> Result<Vec<Book>, RepoError>;
    // Zero-or-one lookup. `Ok(None)` means the id does not exist.
    async fn get_by_id(&self, id: i32) -> Result<Option<Book>, RepoError>;
    // Case-insensitive substring match over title, summary and genre.
    // An empty query matches everything.
    async fn search_by_text(&self, q: &str) -> Result<Vec<Book>, RepoError>;
    // Exact match on the stored genre value.
    async fn list_by_genre(&self, genre: &str) -> Result<Vec<Book>, RepoError>;

    // --- Book Mutation ---
    // Transactional two-table insert. Returns the generated id.
    async fn create(&self, form: BookForm) -> Result<i32, RepoError>;
    // Transactional two-table update. `NotFound` when the id does not exist.
    async fn update(&self, id: i32, form: BookForm) -> Result<(), RepoError>;
    // Transactional two-table delete, child row first. Idempotent.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
pub struct PostgresRepository {
    pool: PgPool,
}

// Shared projection for every read path. All queries go through the inner join,
// so a `main` row missing its `other` counterpart never surfaces.
const BOOK_SELECT: &str = r#"
    SELECT m.id, m.title, m.summary, m.notes, o.date, o.rating, o.genre, o.isbn
    FROM main AS m
    JOIN other AS o ON m.id = o.bookid
"#;

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_all(&self) -> Result<Vec<Book>, RepoError> {
        sqlx::query_as::<_, Book>(BOOK_SELECT)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("list_all error: {:?}", e);
                RepoError::Read(e)
            })
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Book>, RepoError> {
        let query = format!("{BOOK_SELECT} WHERE m.id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("get_by_id error for book {}: {:?}", id, e);
                RepoError::Read(e)
            })
    }

    /// search_by_text
    ///
    /// Substring search across title, summary and genre, wildcarded on both
    /// sides and case-insensitive via ILIKE. The pattern is bound as a single
    /// positional parameter, never concatenated into the statement.
    async fn search_by_text(&self, q: &str) -> Result<Vec<Book>, RepoError> {
        let pattern = format!("%{}%", q);
        let query = format!(
            "{BOOK_SELECT} WHERE m.title ILIKE $1 OR m.summary ILIKE $1 OR o.genre ILIKE $1"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("search_by_text error for {:?}: {:?}", q, e);
                RepoError::Read(e)
            })
    }

    async fn list_by_genre(&self, genre: &str) -> Result<Vec<Book>, RepoError> {
        let query = format!("{BOOK_SELECT} WHERE o.genre = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(genre)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("list_by_genre error for {:?}: {:?}", genre, e);
                RepoError::Read(e)
            })
    }

    /// create
    ///
    /// Inserts the `main` row, captures its generated id, then inserts the
    /// `other` row referencing it. Both inserts run inside one transaction:
    /// either the book exists in full afterwards, or not at all.
    async fn create(&self, form: BookForm) -> Result<i32, RepoError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("create: failed to open transaction: {:?}", e);
            RepoError::Write(e)
        })?;

        let id: i32 = match sqlx::query_scalar(
            "INSERT INTO main (title, summary, notes) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&form.title)
        .bind(&form.summary)
        .bind(&form.notes)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("create: main insert failed: {:?}", e);
                let _ = tx.rollback().await;
                return Err(RepoError::Write(e));
            }
        };

        if let Err(e) = sqlx::query(
            "INSERT INTO other (date, rating, genre, isbn, bookid) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(form.date)
        .bind(&form.rating)
        .bind(&form.genre)
        .bind(&form.isbn)
        .bind(id)
        .execute(&mut *tx)
        .await
        {
            tracing::error!("create: other insert failed for book {}: {:?}", id, e);
            let _ = tx.rollback().await;
            return Err(RepoError::Write(e));
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("create: commit failed for book {}: {:?}", id, e);
            RepoError::Write(e)
        })?;

        Ok(id)
    }

    /// update
    ///
    /// Updates both rows for `id` inside one transaction. When the `main` update
    /// affects zero rows the id does not exist and the transaction is rolled
    /// back with `NotFound` rather than silently committing a no-op.
    async fn update(&self, id: i32, form: BookForm) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("update: failed to open transaction: {:?}", e);
            RepoError::Write(e)
        })?;

        let updated = match sqlx::query(
            "UPDATE main SET title = $1, summary = $2, notes = $3 WHERE id = $4",
        )
        .bind(&form.title)
        .bind(&form.summary)
        .bind(&form.notes)
        .bind(id)
        .execute(&mut *tx)
        .await
        {
            Ok(res) => res.rows_affected(),
            Err(e) => {
                tracing::error!("update: main update failed for book {}: {:?}", id, e);
                let _ = tx.rollback().await;
                return Err(RepoError::Write(e));
            }
        };

        if updated == 0 {
            let _ = tx.rollback().await;
            return Err(RepoError::NotFound);
        }

        if let Err(e) = sqlx::query(
            "UPDATE other SET date = $1, rating = $2, genre = $3, isbn = $4 WHERE bookid = $5",
        )
        .bind(form.date)
        .bind(&form.rating)
        .bind(&form.genre)
        .bind(&form.isbn)
        .bind(id)
        .execute(&mut *tx)
        .await
        {
            tracing::error!("update: other update failed for book {}: {:?}", id, e);
            let _ = tx.rollback().await;
            return Err(RepoError::Write(e));
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("update: commit failed for book {}: {:?}", id, e);
            RepoError::Write(e)
        })
    }

    /// delete
    ///
    /// Deletes the `other` row first, then the `main` row, respecting the
    /// foreign key. Both deletes share a transaction so a failure between them
    /// cannot leave an orphaned `main` row. Deleting an id that does not exist
    /// is a successful no-op.
    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("delete: failed to open transaction: {:?}", e);
            RepoError::Write(e)
        })?;

        if let Err(e) = sqlx::query("DELETE FROM other WHERE bookid = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
        {
            tracing::error!("delete: other delete failed for book {}: {:?}", id, e);
            let _ = tx.rollback().await;
            return Err(RepoError::Write(e));
        }

        if let Err(e) = sqlx::query("DELETE FROM main WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
        {
            tracing::error!("delete: main delete failed for book {}: {:?}", id, e);
            let _ = tx.rollback().await;
            return Err(RepoError::Write(e));
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("delete: commit failed for book {}: {:?}", id, e);
            RepoError::Write(e)
        })
    }
}
