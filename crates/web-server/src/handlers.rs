use crate::{error::AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use core_types::{Book, NewBook};
use std::sync::Arc;

/// # GET /v1/books
/// Returns every row of the books relation.
pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.db_repo.list_books().await?;
    tracing::debug!(count = books.len(), "Listed books.");
    Ok(Json(books))
}

/// # POST /v1/books
/// Inserts one book. All of `id`, `title` and `author` must be present;
/// otherwise the request is rejected before the database is touched.
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, String), AppError> {
    let Json(new_book) = payload.map_err(|e| AppError::MalformedBody(e.body_text()))?;
    let book = new_book.validate()?;

    let added = state.db_repo.insert_book(&book).await?;
    tracing::info!(id = %book.id, "Book added.");
    Ok((StatusCode::CREATED, format!("{} book added", added)))
}
