//! # Little Hero Backend
//!
//! Contains all server-side logic for the Little Hero storybook application.
//!
//! This crate is the orchestration layer that brings together:
//! - **Domain**: profiles, books, pages, and the book lifecycle
//! - **Storage**: SQLite persistence behind per-entity repositories
//! - **Generator**: the external story-generation collaborator
//! - **IO**: the REST interface exposed to clients
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! Client (wizard screens, polling)
//!     v
//! IO Layer (REST API, mappers)
//!     v
//! Domain Layer (services, lifecycle rules)
//!     v
//! Storage Layer (SQLite repositories)
//! ```

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use log::info;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppConfig;
use crate::domain::{BookService, PageService, ProfileService, StoryService};
use crate::generator::{OpenAiStoryGenerator, StoryGenerator};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
    pub book_service: BookService,
    pub page_service: PageService,
    pub story_service: StoryService,
    pub jwt_secret: String,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain services");
    let generator: Arc<dyn StoryGenerator> = Arc::new(OpenAiStoryGenerator::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));

    let profile_service = ProfileService::new(db.clone());
    let book_service = BookService::new(db.clone());
    let page_service = PageService::new(db.clone(), book_service.clone());
    let story_service = StoryService::new(db, book_service.clone(), generator);

    Ok(AppState {
        profile_service,
        book_service,
        page_service,
        story_service,
        jwt_secret: config.jwt_secret.clone(),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origins: &[String]) -> Router {
    // CORS setup to allow the web frontend to make requests
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route(
            "/profiles",
            get(io::rest::profile_apis::list_profiles).post(io::rest::profile_apis::create_profile),
        )
        .route(
            "/profiles/:id",
            get(io::rest::profile_apis::get_profile)
                .put(io::rest::profile_apis::update_profile)
                .delete(io::rest::profile_apis::delete_profile),
        )
        .route(
            "/books",
            get(io::rest::book_apis::list_books).post(io::rest::book_apis::create_draft_book),
        )
        .route(
            "/books/:id",
            get(io::rest::book_apis::get_book).delete(io::rest::book_apis::delete_book),
        )
        .route(
            "/books/:id/creation",
            put(io::rest::book_apis::update_book_creation),
        )
        .route(
            "/books/:id/creation/complete",
            post(io::rest::book_apis::complete_book_creation),
        )
        .route(
            "/books/:id/generate-story",
            post(io::rest::book_apis::generate_story),
        )
        .route(
            "/books/:id/regenerate-pictures",
            post(io::rest::book_apis::regenerate_pictures),
        )
        .route("/books/:id/pages", get(io::rest::page_apis::list_book_pages))
        .route(
            "/book-pages/:id",
            put(io::rest::page_apis::attach_page_image),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
