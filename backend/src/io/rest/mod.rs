//! # REST API Interface Layer
//!
//! HTTP endpoints for the Little Hero backend. This layer handles:
//! - Request/response serialization between the `shared` DTOs and domain
//!   types (via the mappers)
//! - Authenticated-owner extraction before any domain call
//! - Error translation from [`crate::error::DomainError`] to HTTP responses
//! - Request logging

pub mod book_apis;
pub mod page_apis;
pub mod profile_apis;

pub mod mappers;
