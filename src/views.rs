use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::models::Book;

// View models for the server-rendered pages. Template markup lives in
// `templates/`; these structs are the contract between handlers and views.
// Every page carries `is_admin` so the curation controls only render for an
// admin session.

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub books: Vec<Book>,
    pub is_admin: bool,
}

#[derive(Template)]
#[template(path = "book.html")]
pub struct BookPage {
    pub book: Book,
    pub is_admin: bool,
}

#[derive(Template)]
#[template(path = "genre.html")]
pub struct GenrePage {
    pub genre: String,
    pub books: Vec<Book>,
    pub is_admin: bool,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage {
    pub query: String,
    pub books: Vec<Book>,
    pub is_admin: bool,
}

/// EditPage
///
/// One template serves both the add and the edit form; the difference is the
/// post target, the submit label and whether the fields come pre-filled.
#[derive(Template, Default)]
#[template(path = "edit.html")]
pub struct EditPage {
    pub action: String,
    pub submit: &'static str,
    pub title: String,
    pub summary: String,
    pub notes: String,
    pub date: String,
    pub rating: String,
    pub genre: String,
    pub isbn: String,
    pub is_admin: bool,
}

impl EditPage {
    /// The empty add-book form.
    pub fn blank() -> Self {
        Self {
            action: "/posts".to_string(),
            submit: "Add Book",
            is_admin: true,
            ..Default::default()
        }
    }

    /// The edit form pre-filled from an existing book.
    pub fn for_book(book: Book) -> Self {
        Self {
            action: format!("/posts/{}", book.id),
            submit: "Update Book",
            title: book.title,
            summary: book.summary,
            notes: book.notes,
            date: book.date.format("%Y-%m-%d").to_string(),
            rating: book.rating,
            genre: book.genre,
            isbn: book.isbn,
            is_admin: true,
        }
    }
}

/// render
///
/// Renders a page to an HTML response. A template failure is a server fault,
/// logged and answered with 500; it never propagates further.
pub fn render<T: Template>(page: T) -> Response {
    match page.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("template render failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
