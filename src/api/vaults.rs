// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! Vault persistence endpoint.

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    error::ApiError,
    models::{CreateVaultRequest, CreateVaultResponse},
    state::AppState,
};

/// Persist a vault record after the storage subsystem created the vault.
///
/// Idempotent on `(vault_id, wallet_address)`: a replayed create returns
/// the existing record rather than duplicating it.
#[utoipa::path(
    post,
    path = "/api/tusky/vaults/create",
    tag = "Vaults",
    request_body = CreateVaultRequest,
    responses(
        (status = 200, description = "Vault record persisted (or already present)", body = CreateVaultResponse),
        (status = 400, description = "Malformed request body"),
        (status = 422, description = "Missing required fields"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn create_vault(
    State(state): State<AppState>,
    Json(request): Json<CreateVaultRequest>,
) -> Result<Json<CreateVaultResponse>, ApiError> {
    info!(
        name = %request.name,
        vault_id = %request.vault_id,
        wallet_address = %request.wallet_address,
        "Processing vault create request"
    );

    let vault = state.gateway().create_vault(&request)?;

    Ok(Json(CreateVaultResponse {
        success: true,
        vault,
    }))
}
