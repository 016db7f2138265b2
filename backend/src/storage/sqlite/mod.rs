//! SQLite storage implementation.
//!
//! - **connection.rs** - database connection management and schema setup
//! - **repositories/** - per-entity repository implementations

pub mod connection;
pub mod repositories;
