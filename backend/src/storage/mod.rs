//! # Storage Layer
//!
//! SQLite-backed persistence for profiles, books, their join rows, and book
//! pages. Repositories expose owner-scoped operations; the domain layer
//! never issues SQL itself.

pub mod sqlite;

pub use sqlite::connection::DbConnection;
pub use sqlite::repositories::{BookRepository, PageRepository, ProfileRepository};
