//! # REST API for Books
//!
//! Endpoints for the book wizard and lifecycle: draft creation, wizard-step
//! updates, story generation, regeneration, and deletion.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::auth::AuthUser;
use crate::io::rest::mappers::BookMapper;
use crate::AppState;
use shared::{BookCreationData, CreateDraftBookRequest, UpdateBookCreationRequest};

/// Create a draft book from the selected characters
pub async fn create_draft_book(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateDraftBookRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/books - title: {}, profiles: {}",
        request.title,
        request.profile_ids.len()
    );

    let command = BookMapper::to_draft_command(request);
    match state.book_service.create_draft(&user.user_id, command).await {
        Ok(book) => (
            StatusCode::CREATED,
            Json(BookMapper::to_response(book, "Book created successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create draft book: {}", e);
            e.into_response()
        }
    }
}

/// List the owner's books
pub async fn list_books(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    info!("GET /api/books");

    match state.book_service.list_books(&user.user_id).await {
        Ok(books) => (StatusCode::OK, Json(BookMapper::to_list_dto(books))).into_response(),
        Err(e) => {
            error!("Failed to list books: {}", e);
            e.into_response()
        }
    }
}

/// Get a book by ID (applies the pictures-complete check before returning)
pub async fn get_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/books/{}", book_id);

    match state.book_service.fetch_book(&user.user_id, &book_id).await {
        Ok(book) => (StatusCode::OK, Json(BookMapper::to_dto(book))).into_response(),
        Err(e) => {
            error!("Failed to get book: {}", e);
            e.into_response()
        }
    }
}

/// Apply one wizard step's partial update
pub async fn update_book_creation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
    Json(request): Json<UpdateBookCreationRequest>,
) -> impl IntoResponse {
    info!("PUT /api/books/{}/creation", book_id);

    let command = BookMapper::to_update_creation_command(request);
    match state
        .book_service
        .update_creation_fields(&user.user_id, &book_id, command)
        .await
    {
        Ok(book) => (
            StatusCode::OK,
            Json(BookMapper::to_response(book, "Book updated successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update book creation data: {}", e);
            e.into_response()
        }
    }
}

/// Commit the wizard's accumulated creation data in one request
pub async fn complete_book_creation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
    Json(request): Json<BookCreationData>,
) -> impl IntoResponse {
    info!("POST /api/books/{}/creation/complete", book_id);

    let command = BookMapper::to_complete_creation_command(request);
    match state
        .book_service
        .complete_creation(&user.user_id, &book_id, command)
        .await
    {
        Ok(book) => (
            StatusCode::OK,
            Json(BookMapper::to_response(
                book,
                "Book creation data saved successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to complete book creation: {}", e);
            e.into_response()
        }
    }
}

/// Generate the story for a book with complete creation data.
///
/// This call blocks on the generator and may take tens of seconds; clients
/// surface a loading state while it runs.
pub async fn generate_story(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/books/{}/generate-story", book_id);

    match state
        .story_service
        .generate_story(&user.user_id, &book_id)
        .await
    {
        Ok(book) => (
            StatusCode::OK,
            Json(BookMapper::to_response(book, "Story generated successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to generate story: {}", e);
            e.into_response()
        }
    }
}

/// Request a fresh illustration pass for a finished book
pub async fn regenerate_pictures(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/books/{}/regenerate-pictures", book_id);

    match state
        .book_service
        .regenerate_pictures(&user.user_id, &book_id)
        .await
    {
        Ok(book) => (
            StatusCode::OK,
            Json(BookMapper::to_response(
                book,
                "Picture regeneration started",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to regenerate pictures: {}", e);
            e.into_response()
        }
    }
}

/// Delete a book
pub async fn delete_book(
    State(state): State<AppState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/books/{}", book_id);

    match state.book_service.delete_book(&user.user_id, &book_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete book: {}", e);
            e.into_response()
        }
    }
}
