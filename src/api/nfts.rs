// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 WalrusPass

//! NFT persistence endpoint.

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    error::ApiError,
    models::{CreateNftRequest, CreateNftResponse},
    state::AppState,
    sui::transactions::parse_sui_amount,
};

/// Persist an NFT record after a successful mint.
///
/// The wire price is a decimal SUI string; it is converted to integer MIST
/// here, at the boundary, and stored canonically.
#[utoipa::path(
    post,
    path = "/api/nft/insert",
    tag = "NFTs",
    request_body = CreateNftRequest,
    responses(
        (status = 200, description = "NFT record persisted", body = CreateNftResponse),
        (status = 400, description = "Malformed request body or price"),
        (status = 404, description = "Referenced file not found"),
        (status = 422, description = "Missing required fields"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn insert_nft(
    State(state): State<AppState>,
    Json(request): Json<CreateNftRequest>,
) -> Result<Json<CreateNftResponse>, ApiError> {
    info!(
        nft_id = %request.nft_id,
        file_id = %request.file_id,
        "Processing NFT insert request"
    );

    let price_mist = match &request.price {
        Some(price) => Some(
            parse_sui_amount(price)
                .map_err(|_| {
                    ApiError::bad_request(format!("Price must be a decimal SUI amount: {price}"))
                })?
                .to_string(),
        ),
        None => None,
    };

    let nft = state.gateway().create_nft(&CreateNftRequest {
        price: price_mist,
        ..request
    })?;

    Ok(Json(CreateNftResponse { success: true, nft }))
}
