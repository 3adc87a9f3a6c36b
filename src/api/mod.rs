// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    blockchain::{AddressState, BalanceRecord},
    error::ErrorBody,
    models::{MintRequest, MintResponse, OwnedTokens, TokenDetails, WalletInfoResponse},
    state::AppState,
};

pub mod address;
pub mod health;
pub mod ledger;
pub mod mint;
pub mod tokens;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/eth-info", get(address::eth_info))
        .route("/wallet/{address}", get(address::wallet_info))
        .route("/ledger/{address}", get(ledger::get_ledger_record))
        .route("/tokens/{token_id}", get(tokens::get_token))
        .route("/tokens/owner/{address}", get(tokens::list_owned_tokens))
        .route("/mint", post(mint::mint))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        address::eth_info,
        address::wallet_info,
        ledger::get_ledger_record,
        tokens::get_token,
        tokens::list_owned_tokens,
        mint::mint,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            AddressState,
            WalletInfoResponse,
            BalanceRecord,
            MintRequest,
            MintResponse,
            TokenDetails,
            OwnedTokens,
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Chain", description = "Cached address state reads"),
        (name = "Ledger", description = "Persisted balance observations"),
        (name = "Tokens", description = "NFT ownership lookups"),
        (name = "Mint", description = "Server-signed NFT minting"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
