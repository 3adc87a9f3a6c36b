// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use chain_gateway::{
    api::router,
    blockchain::{RpcChainClient, RpcConnector},
    config::GatewayConfig,
    logging::{self, LogFormat},
    services::{BalanceQueryService, MintService, MintSettings, TokenQueryService},
    state::AppState,
    storage::{RedbLedger, TieredCache},
    sweeper::CacheSweeper,
};

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;

    logging::init(LogFormat::from_env());

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        snapshot_ttl_secs = config.snapshot_ttl.as_secs(),
        response_ttl_secs = config.response_ttl.as_secs(),
        rpc_timeout_secs = config.rpc_timeout.as_secs(),
        mint_gas_limit = config.mint_gas_limit,
        unknown_network_policy = ?config.unknown_network_policy,
        primary_mint = config.bundles.primary.is_some(),
        secondary_mint = config.bundles.secondary.is_some(),
        "Configuration loaded"
    );

    let chain = Arc::new(RpcChainClient::new(&config.read_rpc_url, config.rpc_timeout)?);
    let cache = Arc::new(TieredCache::new(config.snapshot_ttl, config.response_ttl));
    let ledger = Arc::new(RedbLedger::open(&config.ledger_path)?);
    tracing::info!(path = %config.ledger_path.display(), "Balance ledger opened");

    let balances = BalanceQueryService::new(chain, Arc::clone(&cache), ledger);
    let connector = Arc::new(RpcConnector::new(config.rpc_timeout));
    let tokens = TokenQueryService::new(
        config.bundles.clone(),
        connector.clone(),
        config.unknown_network_policy,
    );
    let minter = MintService::new(
        config.bundles.clone(),
        connector,
        MintSettings {
            gas_limit: config.mint_gas_limit,
            unknown_network_policy: config.unknown_network_policy,
        },
    );

    let shutdown = CancellationToken::new();
    let sweeper = tokio::spawn(CacheSweeper::new(cache).run(shutdown.clone()));

    let app = router(AppState::new(balances, tokens, minter));
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    match &config.tls {
        Some((cert, key)) => {
            let tls_config = RustlsConfig::from_pem_file(cert, key).await?;
            let handle = axum_server::Handle::new();
            tokio::spawn({
                let handle = handle.clone();
                let shutdown = shutdown.clone();
                async move {
                    shutdown_signal().await;
                    shutdown.cancel();
                    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                }
            });

            tracing::info!(address = %addr, "Chain gateway listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(address = %addr, "Chain gateway listening on http (docs at /docs)");
            let token = shutdown.clone();
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_signal().await;
                    token.cancel();
                })
                .await?;
        }
    }

    shutdown.cancel();
    let _ = sweeper.await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
