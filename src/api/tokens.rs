// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token ownership endpoints backed by the NFT collection.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{NetworkQuery, OwnedTokens, TokenDetails},
    state::AppState,
};

/// Owner and metadata URI of a token.
#[utoipa::path(
    get,
    path = "/v1/tokens/{token_id}",
    tag = "Tokens",
    params(
        ("token_id" = String, Path, description = "Decimal token id"),
        NetworkQuery
    ),
    responses(
        (status = 200, description = "Token details", body = TokenDetails),
        (status = 400, description = "Malformed token id or unknown network", body = ErrorBody),
        (status = 404, description = "Token was never minted", body = ErrorBody),
        (status = 503, description = "Chain node unavailable", body = ErrorBody)
    )
)]
pub async fn get_token(
    State(state): State<AppState>,
    Path(token_id): Path<String>,
    Query(query): Query<NetworkQuery>,
) -> Result<Json<TokenDetails>, ApiError> {
    let details = state
        .tokens
        .token_details(&token_id, query.network.as_deref())
        .await?;
    Ok(Json(details))
}

/// Token ids held by an address.
#[utoipa::path(
    get,
    path = "/v1/tokens/owner/{address}",
    tag = "Tokens",
    params(
        ("address" = String, Path, description = "0x-prefixed address"),
        NetworkQuery
    ),
    responses(
        (status = 200, description = "Owned tokens", body = OwnedTokens),
        (status = 400, description = "Malformed address or unknown network", body = ErrorBody),
        (status = 503, description = "Chain node unavailable", body = ErrorBody)
    )
)]
pub async fn list_owned_tokens(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<NetworkQuery>,
) -> Result<Json<OwnedTokens>, ApiError> {
    let owned = state
        .tokens
        .tokens_of(&address, query.network.as_deref())
        .await?;
    Ok(Json(owned))
}
