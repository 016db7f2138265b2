//! # REST API for Book Pages
//!
//! Endpoints for reading a book's pages and attaching illustration
//! references produced by the external illustration step.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::auth::AuthUser;
use crate::io::rest::mappers::PageMapper;
use crate::AppState;
use shared::AttachPageImageRequest;

/// List a book's pages in page-number order
pub async fn list_book_pages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/books/{}/pages", book_id);

    match state.page_service.list_pages(&user.user_id, &book_id).await {
        Ok(pages) => (StatusCode::OK, Json(PageMapper::to_list_dto(pages))).into_response(),
        Err(e) => {
            error!("Failed to list pages: {}", e);
            e.into_response()
        }
    }
}

/// Attach an image reference to a page.
///
/// Re-runs the pictures-complete check afterwards, so attaching the last
/// missing image flips the parent book to ready.
pub async fn attach_page_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(page_id): Path<i64>,
    Json(request): Json<AttachPageImageRequest>,
) -> impl IntoResponse {
    info!("PUT /api/book-pages/{}", page_id);

    let command = PageMapper::to_attach_command(page_id, request);
    match state
        .page_service
        .attach_page_image(&user.user_id, command)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(PageMapper::to_attach_response(result))).into_response(),
        Err(e) => {
            error!("Failed to attach page image: {}", e);
            e.into_response()
        }
    }
}
