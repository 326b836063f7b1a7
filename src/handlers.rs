use crate::{
    AppState,
    auth::AdminSession,
    models::{AdminActionResponse, AdminLoginRequest, BookForm, DeleteForm},
    repository::RepoError,
    views,
};
use axum::{
    Json,
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

// --- Filter Structs ---

/// SearchFilter
///
/// Accepted query parameters for the search endpoint (GET /search?q=). A
/// missing `q` is treated as the empty query, which matches everything.
#[derive(Deserialize)]
pub struct SearchFilter {
    pub q: Option<String>,
}

// --- Read Handlers ---

/// list_books
///
/// [Public Route] GET / — the full catalog listing. The admin flag is passed
/// through so the template can render the curation controls.
pub async fn list_books(admin: AdminSession, State(state): State<AppState>) -> Response {
    match state.repo.list_all().await {
        Ok(books) => views::render(views::IndexPage {
            books,
            is_admin: admin.is_admin,
        }),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// view_book
///
/// [Public Route] GET /viewposts/{id} — the detail page. A missing id is 404,
/// distinct from a database failure (500).
pub async fn view_book(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    match state.repo.get_by_id(id).await {
        Ok(Some(book)) => views::render(views::BookPage {
            book,
            is_admin: admin.is_admin,
        }),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// books_by_genre
///
/// [Public Route] GET /books/genre/{genre} — exact-match genre listing.
pub async fn books_by_genre(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> Response {
    match state.repo.list_by_genre(&genre).await {
        Ok(books) => views::render(views::GenrePage {
            genre,
            books,
            is_admin: admin.is_admin,
        }),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// search_books
///
/// [Public Route] GET /search?q= — case-insensitive substring search over
/// title, summary and genre. The query is passed to the repository untouched.
pub async fn search_books(
    admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<SearchFilter>,
) -> Response {
    let query = filter.q.unwrap_or_default();
    match state.repo.search_by_text(&query).await {
        Ok(books) => views::render(views::SearchPage {
            query,
            books,
            is_admin: admin.is_admin,
        }),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

// --- Curation Handlers (admin-gated) ---

/// new_book
///
/// [Curation Route] GET /new — renders the empty add-book form. A visitor
/// without an admin session is sent back to the listing instead of seeing the
/// form at all.
pub async fn new_book(admin: AdminSession) -> Response {
    if !admin.is_admin {
        return Redirect::to("/").into_response();
    }
    views::render(views::EditPage::blank())
}

/// create_book
///
/// [Curation Route] POST /posts — creates a book from the submitted form and
/// redirects to the listing. The two-table insert is atomic in the repository.
/// Unauthorized attempts are refused with 403 before the repository is touched.
pub async fn create_book(
    admin: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> Response {
    if !admin.is_admin {
        return StatusCode::FORBIDDEN.into_response();
    }
    match state.repo.create(form).await {
        Ok(_id) => Redirect::to("/").into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// edit_book
///
/// [Curation Route] GET /editposts/{id} — renders the edit form pre-filled
/// with the stored book, or 404 when the id does not exist.
pub async fn edit_book(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    if !admin.is_admin {
        return Redirect::to("/").into_response();
    }
    match state.repo.get_by_id(id).await {
        Ok(Some(book)) => views::render(views::EditPage::for_book(book)),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// update_book
///
/// [Curation Route] POST /posts/{id} — updates both rows for the book and
/// redirects to the listing. Updating an id that does not exist answers 404.
pub async fn update_book(
    admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<BookForm>,
) -> Response {
    if !admin.is_admin {
        return StatusCode::FORBIDDEN.into_response();
    }
    match state.repo.update(id, form).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(RepoError::NotFound) => StatusCode::NOT_FOUND.into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// delete_book
///
/// [Curation Route] POST /delete — the id travels in the form body. Deletion
/// is idempotent: deleting an already-gone book still redirects to the listing.
pub async fn delete_book(
    admin: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> Response {
    if !admin.is_admin {
        return StatusCode::FORBIDDEN.into_response();
    }
    match state.repo.delete(form.book_id).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

// --- Session Handlers ---

/// admin_login
///
/// [Public Route] POST /admin-login — grants the admin flag on an exact
/// password match. A wrong password is an explicit `success: false`, not an
/// error status, and leaves the session Anonymous.
pub async fn admin_login(
    admin: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> Json<AdminActionResponse> {
    let success = payload.password == state.config.admin_password && admin.grant().await;
    Json(AdminActionResponse { success })
}

/// admin_logout
///
/// [Public Route] POST /admin-logout — destroys the visitor's session record.
/// When destruction fails the response signals `success: false`; the gate keeps
/// denying admin actions for any session whose flag cannot be read back.
pub async fn admin_logout(admin: AdminSession) -> Json<AdminActionResponse> {
    Json(AdminActionResponse {
        success: admin.revoke().await,
    })
}
