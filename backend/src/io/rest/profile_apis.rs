//! # REST API for Child Profiles
//!
//! Endpoints for creating, retrieving, updating, and deleting child
//! profiles. All endpoints are scoped to the authenticated owner.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::auth::AuthUser;
use crate::io::rest::mappers::ProfileMapper;
use crate::AppState;
use shared::{CreateChildProfileRequest, UpdateChildProfileRequest};

/// Create a new child profile
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateChildProfileRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles - name: {}", request.name);

    let command = ProfileMapper::to_create_command(request);
    match state
        .profile_service
        .create_profile(&user.user_id, command)
        .await
    {
        Ok(profile) => (
            StatusCode::CREATED,
            Json(ProfileMapper::to_response(
                profile,
                "Profile created successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create profile: {}", e);
            e.into_response()
        }
    }
}

/// Get a child profile by ID
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}", profile_id);

    match state
        .profile_service
        .get_profile(&user.user_id, &profile_id)
        .await
    {
        Ok(profile) => (StatusCode::OK, Json(ProfileMapper::to_dto(profile))).into_response(),
        Err(e) => {
            error!("Failed to get profile: {}", e);
            e.into_response()
        }
    }
}

/// List the owner's child profiles
pub async fn list_profiles(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    info!("GET /api/profiles");

    match state.profile_service.list_profiles(&user.user_id).await {
        Ok(profiles) => (StatusCode::OK, Json(ProfileMapper::to_list_dto(profiles))).into_response(),
        Err(e) => {
            error!("Failed to list profiles: {}", e);
            e.into_response()
        }
    }
}

/// Update a child profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
    Json(request): Json<UpdateChildProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profiles/{}", profile_id);

    let command = ProfileMapper::to_update_command(request);
    match state
        .profile_service
        .update_profile(&user.user_id, &profile_id, command)
        .await
    {
        Ok(profile) => (
            StatusCode::OK,
            Json(ProfileMapper::to_response(
                profile,
                "Profile updated successfully",
            )),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update profile: {}", e);
            e.into_response()
        }
    }
}

/// Delete a child profile
pub async fn delete_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(profile_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/profiles/{}", profile_id);

    match state
        .profile_service
        .delete_profile(&user.user_id, &profile_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete profile: {}", e);
            e.into_response()
        }
    }
}
