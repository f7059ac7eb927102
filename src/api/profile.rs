// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Profile endpoints.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use tracing::info;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{ProfileQuery, UpdateProfileResponse},
    state::AppState,
    storage::{AvatarUpload, ProfileRecord},
};

/// Multipart field carrying the display name.
const DISPLAY_NAME_FIELD: &str = "display_name";

/// Multipart field carrying the avatar file.
const AVATAR_FILE_FIELD: &str = "avatar_file";

/// Fetch a profile by account id.
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    params(ProfileQuery),
    responses(
        (status = 200, description = "Profile record", body = ProfileRecord),
        (status = 400, description = "Missing userId parameter"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileRecord>, ApiError> {
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("userId query parameter is required"))?;

    let profile = state.gateway().get_profile(&user_id)?;
    Ok(Json(profile))
}

/// Update the authenticated account's profile.
///
/// Multipart form with optional `display_name` and `avatar_file` fields.
/// The display name always overwrites the stored value (absent clears it);
/// an avatar upload is stored and its public URL written onto the profile.
#[utoipa::path(
    put,
    path = "/api/profile/update",
    tag = "Profile",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated profile", body = UpdateProfileResponse),
        (status = 400, description = "Malformed multipart body"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    mut form: Multipart,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    info!(user_id = %user.user_id, "Processing profile update request");

    let mut display_name: Option<String> = None;
    let mut avatar: Option<AvatarUpload> = None;

    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some(DISPLAY_NAME_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid display_name: {e}")))?;
                if !value.is_empty() {
                    display_name = Some(value);
                }
            }
            Some(AVATAR_FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or("avatar").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid avatar_file: {e}")))?;
                if !bytes.is_empty() {
                    avatar = Some(AvatarUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    let profile = state
        .gateway()
        .update_profile(&user.user_id, display_name, avatar)?;

    Ok(Json(UpdateProfileResponse {
        success: true,
        profile,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MetadataStore, StoragePaths};
    use axum::http::StatusCode;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let mut storage = MetadataStore::new(StoragePaths::new(dir.path()));
        storage.initialize().unwrap();
        (AppState::new(storage), dir)
    }

    #[tokio::test]
    async fn get_profile_requires_user_id() {
        let (state, _dir) = test_state();

        let error = get_profile(State(state), Query(ProfileQuery { user_id: None }))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_profile_returns_404_for_unknown_account() {
        let (state, _dir) = test_state();

        let error = get_profile(
            State(state),
            Query(ProfileQuery {
                user_id: Some("ghost".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_profile_returns_existing_record() {
        let (state, _dir) = test_state();
        state.gateway().ensure_profile("user-1").unwrap();

        let Json(profile) = get_profile(
            State(state),
            Query(ProfileQuery {
                user_id: Some("user-1".to_string()),
            }),
        )
        .await
        .expect("profile fetch succeeds");
        assert_eq!(profile.id, "user-1");
    }
}
