// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    blockchain::BalanceRecord,
    error::{ApiError, ErrorBody},
    models::WalletAddress,
    state::AppState,
};

/// Last balance observation persisted for an address.
#[utoipa::path(
    get,
    path = "/v1/ledger/{address}",
    tag = "Ledger",
    params(("address" = String, Path, description = "0x-prefixed address")),
    responses(
        (status = 200, description = "Stored observation", body = BalanceRecord),
        (status = 400, description = "Malformed address", body = ErrorBody),
        (status = 404, description = "Address never observed", body = ErrorBody)
    )
)]
pub async fn get_ledger_record(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceRecord>, ApiError> {
    let parsed = WalletAddress::from(address.as_str()).parse()?;

    let record = state
        .balances
        .ledger()
        .latest(&format!("{parsed:#x}"))
        .await
        .map_err(|e| {
            tracing::error!(%address, error = %e, "Ledger read failed");
            ApiError::internal(format!("Failed to read ledger: {e}"))
        })?;

    record
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No observation recorded for {address}")))
}
