use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Core Application Schemas (Mapped to Database) ---

/// Book
///
/// The book aggregate as seen by the rest of the application: one `main` row
/// (title, summary, notes) joined with its one-to-one `other` row (date read,
/// rating, genre, isbn). Every read query produces this shape; a `main` row
/// without its `other` counterpart is invisible because the join is inner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
pub struct Book {
    // Generated primary key of the `main` row; `other.bookid` references it.
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub notes: String,
    // The date the book was read/logged.
    pub date: NaiveDate,
    // Free-text score, e.g. "4/5".
    pub rating: String,
    // Free-text category used by the genre listing.
    pub genre: String,
    // Identifier used to derive the cover image URL.
    pub isbn: String,
}

impl Book {
    /// Derives the Open Library cover image URL from the stored ISBN.
    pub fn cover_url(&self) -> String {
        format!("https://covers.openlibrary.org/b/isbn/{}-M.jpg", self.isbn)
    }
}

/// --- Request Payloads (Input Schemas) ---

/// BookForm
///
/// Input payload for the add and edit forms (POST /posts, POST /posts/{id}).
/// Fields are passed through to the database untransformed; a missing date is
/// bound as NULL and rejected by the schema, not by this layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BookForm {
    pub title: String,
    pub summary: String,
    pub notes: String,
    pub date: Option<NaiveDate>,
    pub rating: String,
    pub genre: String,
    pub isbn: String,
}

/// DeleteForm
///
/// Input payload for the delete action (POST /delete). The id travels in the
/// form body rather than the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteForm {
    pub book_id: i32,
}

/// AdminLoginRequest
///
/// Input payload for the admin login endpoint (POST /admin-login).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// AdminActionResponse
///
/// Output schema shared by the login and logout endpoints. A failed login or a
/// failed session teardown is an explicit `success: false`, not an error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminActionResponse {
    pub success: bool,
}
