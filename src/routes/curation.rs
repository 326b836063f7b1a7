use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Curation Router Module
///
/// Defines the routes that create, modify or remove catalog entries, plus the
/// two form-rendering pages that feed them.
///
/// Access Control:
/// Every handler consults the `AdminSession` extractor before touching the
/// repository. The refusal differs by shape: the GET form pages redirect an
/// anonymous visitor back to `/`, while the POST actions answer 403 so a
/// stale or forged form submission fails loudly instead of bouncing.
pub fn curation_routes() -> Router<AppState> {
    Router::new()
        // GET /new
        // Renders the empty add-book form (redirects anonymous visitors to /).
        .route("/new", get(handlers::new_book))
        // POST /posts
        // Creates a book from the submitted form. The two-table insert is
        // transactional in the repository.
        .route("/posts", post(handlers::create_book))
        // GET /editposts/{id}
        // Renders the edit form pre-filled with the stored book, or 404.
        .route("/editposts/{id}", get(handlers::edit_book))
        // POST /posts/{id}
        // Updates both rows for the book; 404 when the id does not exist.
        .route("/posts/{id}", post(handlers::update_book))
        // POST /delete
        // Deletes a book; the id travels in the form body, not the path.
        .route("/delete", post(handlers::delete_book))
}
