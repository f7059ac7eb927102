// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! File listing and persistence endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    gateway::{FileListPage, ListFilesParams, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT},
    models::{ListFilesQuery, SaveFileRequest, SaveFileResponse},
    state::AppState,
};

/// List file records joined with their optional NFT references.
#[utoipa::path(
    get,
    path = "/api/tusky/files",
    tag = "Files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Page of file records", body = FileListPage),
        (status = 400, description = "limit outside [1,1000] or negative offset"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<FileListPage>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0);

    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ApiError::bad_request(format!(
            "Limit must be a number between 1 and {MAX_LIST_LIMIT}"
        )));
    }
    if offset < 0 {
        return Err(ApiError::bad_request("Offset must be a non-negative number"));
    }

    info!(
        vault_id = ?query.vault_id,
        wallet_address = ?query.wallet_address,
        limit,
        offset,
        "Processing files list request"
    );

    let page = state.gateway().list_files(&ListFilesParams {
        vault_id: query.vault_id,
        wallet_address: query.wallet_address,
        limit: Some(limit),
        offset: Some(offset),
    })?;

    Ok(Json(page))
}

/// Persist a file record after a successful upload.
#[utoipa::path(
    post,
    path = "/api/tusky/files/upload",
    tag = "Files",
    request_body = SaveFileRequest,
    responses(
        (status = 200, description = "File record persisted", body = SaveFileResponse),
        (status = 400, description = "Malformed request body"),
        (status = 404, description = "Vault not found or not owned by wallet"),
        (status = 422, description = "Missing required fields"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn save_file(
    State(state): State<AppState>,
    Json(request): Json<SaveFileRequest>,
) -> Result<Json<SaveFileResponse>, ApiError> {
    info!(
        upload_id = %request.upload_id,
        vault_id = %request.vault_id,
        wallet_address = %request.wallet_address,
        "Processing file save request"
    );

    let file = state.gateway().save_file(&request)?;

    Ok(Json(SaveFileResponse {
        success: true,
        file,
    }))
}
