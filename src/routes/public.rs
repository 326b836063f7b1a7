use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are accessible to any visitor, anonymous or admin.
/// The read handlers still resolve the session so the rendered pages know
/// whether to show the curation controls, but nothing here requires it.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // The full catalog listing. Zero books renders an empty page, not an error.
        .route("/", get(handlers::list_books))
        // GET /viewposts/{id}
        // Detail page for a single book, or 404 when the id does not exist.
        .route("/viewposts/{id}", get(handlers::view_book))
        // GET /books/genre/{genre}
        // Listing filtered by exact genre match.
        .route("/books/genre/{genre}", get(handlers::books_by_genre))
        // GET /search?q=
        // Case-insensitive substring search over title, summary and genre.
        .route("/search", get(handlers::search_books))
        // POST /admin-login / POST /admin-logout
        // The session gate's two transitions. Both answer `{success: bool}` JSON;
        // a wrong password or a failed teardown is a false, not an error status.
        .route("/admin-login", post(handlers::admin_login))
        .route("/admin-logout", post(handlers::admin_logout))
}
