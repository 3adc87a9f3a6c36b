// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    blockchain::MintResult,
    error::{ApiError, ErrorBody},
    models::{MintRequest, MintResponse},
    state::AppState,
};

/// Mint one NFT to `toAddress`, signed by the server-held key of the
/// selected network.
#[utoipa::path(
    post,
    path = "/v1/mint",
    tag = "Mint",
    request_body = MintRequest,
    responses(
        (status = 200, description = "Transaction broadcast", body = MintResponse),
        (status = 400, description = "Malformed address or unknown network", body = ErrorBody),
        (status = 500, description = "Signing failure or network not configured", body = ErrorBody),
        (status = 502, description = "Broadcast rejected by the node", body = ErrorBody),
        (status = 503, description = "Network unreachable", body = ErrorBody)
    )
)]
pub async fn mint(
    State(state): State<AppState>,
    Json(request): Json<MintRequest>,
) -> Result<Json<MintResponse>, ApiError> {
    match state
        .minter
        .mint(&request.to_address, request.network.as_deref())
        .await
    {
        MintResult::Success { tx_hash } => Ok(Json(MintResponse { tx_hash })),
        MintResult::Failure { reason } => Err(reason.into()),
    }
}
