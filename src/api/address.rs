// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address-state endpoints backed by the balance query service.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    blockchain::AddressState,
    error::{ApiError, ErrorBody},
    models::{EthInfoQuery, WalletInfoResponse},
    state::AppState,
};

/// Gas price, block height and ether balance of an address.
#[utoipa::path(
    get,
    path = "/v1/eth-info",
    tag = "Chain",
    params(EthInfoQuery),
    responses(
        (status = 200, description = "Address state", body = AddressState),
        (status = 400, description = "Malformed address", body = ErrorBody),
        (status = 503, description = "Chain node unavailable", body = ErrorBody)
    )
)]
pub async fn eth_info(
    State(state): State<AppState>,
    Query(query): Query<EthInfoQuery>,
) -> Result<Json<AddressState>, ApiError> {
    let address_state = state.balances.get_state(&query.address).await?;
    Ok(Json(address_state))
}

/// Same pipeline as `/v1/eth-info`, echoing the address back.
#[utoipa::path(
    get,
    path = "/v1/wallet/{address}",
    tag = "Chain",
    params(("address" = String, Path, description = "0x-prefixed address")),
    responses(
        (status = 200, description = "Wallet info", body = WalletInfoResponse),
        (status = 400, description = "Malformed address", body = ErrorBody),
        (status = 503, description = "Chain node unavailable", body = ErrorBody)
    )
)]
pub async fn wallet_info(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WalletInfoResponse>, ApiError> {
    let address_state = state.balances.get_state(&address).await?;
    Ok(Json(WalletInfoResponse {
        address,
        balance: address_state.balance,
        block_number: address_state.block_number,
        gas_price: address_state.gas_price,
    }))
}
