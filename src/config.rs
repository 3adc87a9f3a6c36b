// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the [`GatewayConfig`] loaded
//! from them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `READ_RPC_URL` / `ALCHEMY_URL` | RPC endpoint for balance queries | Required |
//! | `{PRIMARY,SECONDARY}_RPC_URL` | RPC endpoint for mints | Primary: read URL |
//! | `{PRIMARY,SECONDARY}_CONTRACT_ADDRESS` | NFT contract | Bundle disabled |
//! | `{PRIMARY,SECONDARY}_SIGNING_KEY` | Hex or PEM key (fallback `SIGNING_KEY`, `PRIVATE_KEY`) | Bundle disabled |
//! | `{PRIMARY,SECONDARY}_TOKEN_URI` | Metadata URI (fallback `TOKEN_URI`) | empty |
//! | `SNAPSHOT_CACHE_TTL_SECS` | Gas price / block height TTL | `10` |
//! | `RESPONSE_CACHE_TTL_SECS` | Composed response TTL | `30` |
//! | `MINT_GAS_LIMIT` | Gas limit of mint transactions | `300000` |
//! | `RPC_TIMEOUT_SECS` | Timeout of every RPC call | `10` |
//! | `UNKNOWN_NETWORK_POLICY` | `default` (use primary) or `reject` | `default` |
//! | `LEDGER_PATH` | redb balance ledger file | `data/ledger.redb` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | Serve HTTPS when both are set | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;

use crate::blockchain::{KeyMaterial, Network, NetworkBundle, DEFAULT_MINT_GAS_LIMIT};
use crate::error::GatewayError;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const READ_RPC_URL_ENV: &str = "READ_RPC_URL";
/// Legacy name of the read endpoint variable.
pub const ALCHEMY_URL_ENV: &str = "ALCHEMY_URL";
pub const SIGNING_KEY_ENV: &str = "SIGNING_KEY";
/// Legacy name of the shared signing key variable.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const TOKEN_URI_ENV: &str = "TOKEN_URI";
pub const SNAPSHOT_TTL_ENV: &str = "SNAPSHOT_CACHE_TTL_SECS";
pub const RESPONSE_TTL_ENV: &str = "RESPONSE_CACHE_TTL_SECS";
pub const MINT_GAS_LIMIT_ENV: &str = "MINT_GAS_LIMIT";
pub const RPC_TIMEOUT_ENV: &str = "RPC_TIMEOUT_SECS";
pub const UNKNOWN_NETWORK_POLICY_ENV: &str = "UNKNOWN_NETWORK_POLICY";
pub const LEDGER_PATH_ENV: &str = "LEDGER_PATH";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 10;
pub const DEFAULT_RESPONSE_TTL_SECS: u64 = 30;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LEDGER_PATH: &str = "data/ledger.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// What to do with a mint request naming a network we do not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownNetworkPolicy {
    /// Mint on the primary network and log a warning.
    #[default]
    UsePrimary,
    /// Fail the mint with `UnknownNetwork`.
    Reject,
}

impl FromStr for UnknownNetworkPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "default" | "primary" => Ok(UnknownNetworkPolicy::UsePrimary),
            "reject" => Ok(UnknownNetworkPolicy::Reject),
            other => Err(format!("expected `default` or `reject`, got `{other}`")),
        }
    }
}

/// Mint bundles by network. A network without a full bundle cannot mint.
#[derive(Debug, Clone, Default)]
pub struct NetworkBundles {
    pub primary: Option<NetworkBundle>,
    pub secondary: Option<NetworkBundle>,
}

impl NetworkBundles {
    pub fn get(&self, network: Network) -> Option<&NetworkBundle> {
        match network {
            Network::Primary => self.primary.as_ref(),
            Network::Secondary => self.secondary.as_ref(),
        }
    }

    /// Pick the bundle for a caller-supplied selector (primary when `None`).
    pub fn resolve(
        &self,
        network: Option<&str>,
        policy: UnknownNetworkPolicy,
    ) -> Result<&NetworkBundle, GatewayError> {
        let selected = match network.map(str::parse::<Network>) {
            None => Network::Primary,
            Some(Ok(network)) => network,
            Some(Err(reason)) => match policy {
                UnknownNetworkPolicy::Reject => return Err(GatewayError::UnknownNetwork(reason)),
                UnknownNetworkPolicy::UsePrimary => {
                    tracing::warn!(
                        requested = network.unwrap_or_default(),
                        "Unknown network requested, using primary"
                    );
                    Network::Primary
                }
            },
        };

        self.get(selected)
            .ok_or_else(|| GatewayError::NetworkNotConfigured(selected.to_string()))
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub read_rpc_url: String,
    pub bundles: NetworkBundles,
    pub snapshot_ttl: Duration,
    pub response_ttl: Duration,
    pub mint_gas_limit: u64,
    pub rpc_timeout: Duration,
    pub unknown_network_policy: UnknownNetworkPolicy,
    pub ledger_path: PathBuf,
    /// `(cert, key)` PEM paths when HTTPS is enabled
    pub tls: Option<(PathBuf, PathBuf)>,
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let read_rpc_url = get(READ_RPC_URL_ENV)
            .or_else(|| get(ALCHEMY_URL_ENV))
            .ok_or(ConfigError::Missing(READ_RPC_URL_ENV))?;

        let snapshot_ttl = Duration::from_secs(parse_or(&get, SNAPSHOT_TTL_ENV, DEFAULT_SNAPSHOT_TTL_SECS)?);
        let response_ttl = Duration::from_secs(parse_or(&get, RESPONSE_TTL_ENV, DEFAULT_RESPONSE_TTL_SECS)?);
        if snapshot_ttl.is_zero() || response_ttl <= snapshot_ttl {
            return Err(ConfigError::Invalid {
                name: RESPONSE_TTL_ENV.to_string(),
                reason: format!(
                    "response TTL ({}s) must exceed a non-zero snapshot TTL ({}s)",
                    response_ttl.as_secs(),
                    snapshot_ttl.as_secs()
                ),
            });
        }

        let unknown_network_policy = match get(UNKNOWN_NETWORK_POLICY_ENV) {
            Some(raw) => raw.parse::<UnknownNetworkPolicy>().map_err(|reason| ConfigError::Invalid {
                name: UNKNOWN_NETWORK_POLICY_ENV.to_string(),
                reason,
            })?,
            None => UnknownNetworkPolicy::default(),
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some((PathBuf::from(cert), PathBuf::from(key))),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    name: TLS_CERT_PATH_ENV.to_string(),
                    reason: format!("{TLS_CERT_PATH_ENV} and {TLS_KEY_PATH_ENV} must be set together"),
                })
            }
        };

        let bundles = NetworkBundles {
            primary: load_bundle(&get, Network::Primary, Some(&read_rpc_url))?,
            secondary: load_bundle(&get, Network::Secondary, None)?,
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&get, PORT_ENV, DEFAULT_PORT)?,
            read_rpc_url,
            bundles,
            snapshot_ttl,
            response_ttl,
            mint_gas_limit: parse_or(&get, MINT_GAS_LIMIT_ENV, DEFAULT_MINT_GAS_LIMIT)?,
            rpc_timeout: Duration::from_secs(parse_or(&get, RPC_TIMEOUT_ENV, DEFAULT_RPC_TIMEOUT_SECS)?),
            unknown_network_policy,
            ledger_path: PathBuf::from(
                get(LEDGER_PATH_ENV).unwrap_or_else(|| DEFAULT_LEDGER_PATH.to_string()),
            ),
            tls,
        })
    }
}

/// Read `{PREFIX}_*` variables for one network.
///
/// Returns `Ok(None)` when the contract address or signing key is absent so
/// a deployment can run with only one mint network.
fn load_bundle<G>(
    get: &G,
    network: Network,
    fallback_rpc: Option<&str>,
) -> Result<Option<NetworkBundle>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let prefix = network.as_str().to_ascii_uppercase();
    let var = |suffix: &str| format!("{prefix}_{suffix}");

    let rpc_url = get(&var("RPC_URL")).or_else(|| fallback_rpc.map(str::to_string));
    let contract = get(&var("CONTRACT_ADDRESS"));
    let key = get(&var("SIGNING_KEY"))
        .or_else(|| get(SIGNING_KEY_ENV))
        .or_else(|| get(PRIVATE_KEY_ENV));

    let (Some(rpc_url), Some(contract), Some(key)) = (rpc_url, contract, key) else {
        return Ok(None);
    };

    let contract_address = Address::from_str(contract.trim()).map_err(|e| ConfigError::Invalid {
        name: var("CONTRACT_ADDRESS"),
        reason: e.to_string(),
    })?;

    let signing_key = KeyMaterial::new(key);
    // Surface a malformed key at startup rather than on the first mint.
    signing_key.signer().map_err(|e| ConfigError::Invalid {
        name: var("SIGNING_KEY"),
        reason: e.to_string(),
    })?;

    Ok(Some(NetworkBundle {
        network,
        rpc_url,
        contract_address,
        signing_key,
        token_uri: get(&var("TOKEN_URI"))
            .or_else(|| get(TOKEN_URI_ENV))
            .unwrap_or_default(),
    }))
}

fn parse_or<G, T>(get: &G, name: &str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn load(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[(READ_RPC_URL_ENV, "http://localhost:8545")]).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.snapshot_ttl, Duration::from_secs(10));
        assert_eq!(cfg.response_ttl, Duration::from_secs(30));
        assert_eq!(cfg.mint_gas_limit, 300_000);
        assert_eq!(cfg.unknown_network_policy, UnknownNetworkPolicy::UsePrimary);
        assert!(cfg.bundles.primary.is_none());
        assert!(cfg.tls.is_none());
    }

    #[test]
    fn read_url_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(READ_RPC_URL_ENV))));
        assert!(load(&[(ALCHEMY_URL_ENV, "http://localhost:8545")]).is_ok());
    }

    #[test]
    fn bundles_use_shared_key_and_primary_falls_back_to_read_url() {
        let cfg = load(&[
            (READ_RPC_URL_ENV, "http://read:8545"),
            ("PRIMARY_CONTRACT_ADDRESS", "0x1111111111111111111111111111111111111111"),
            ("SECONDARY_RPC_URL", "http://secondary:8545"),
            ("SECONDARY_CONTRACT_ADDRESS", "0x2222222222222222222222222222222222222222"),
            (SIGNING_KEY_ENV, KEY),
            (TOKEN_URI_ENV, "ipfs://meta"),
            ("SECONDARY_TOKEN_URI", "ipfs://other"),
        ])
        .unwrap();

        let primary = cfg.bundles.get(Network::Primary).unwrap();
        assert_eq!(primary.rpc_url, "http://read:8545");
        assert_eq!(primary.token_uri, "ipfs://meta");

        let secondary = cfg.bundles.get(Network::Secondary).unwrap();
        assert_eq!(secondary.rpc_url, "http://secondary:8545");
        assert_eq!(secondary.token_uri, "ipfs://other");
        assert_ne!(primary.contract_address, secondary.contract_address);
    }

    #[test]
    fn malformed_key_fails_startup() {
        let err = load(&[
            (READ_RPC_URL_ENV, "http://read:8545"),
            ("PRIMARY_CONTRACT_ADDRESS", "0x1111111111111111111111111111111111111111"),
            ("PRIMARY_SIGNING_KEY", "deadbeef"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(!err.to_string().contains("deadbeef"));
    }

    #[test]
    fn ttl_ordering_is_enforced() {
        let err = load(&[
            (READ_RPC_URL_ENV, "http://read:8545"),
            (SNAPSHOT_TTL_ENV, "30"),
            (RESPONSE_TTL_ENV, "10"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn unknown_network_policy_parses() {
        let cfg = load(&[
            (READ_RPC_URL_ENV, "http://read:8545"),
            (UNKNOWN_NETWORK_POLICY_ENV, "reject"),
        ])
        .unwrap();
        assert_eq!(cfg.unknown_network_policy, UnknownNetworkPolicy::Reject);
        assert!(load(&[
            (READ_RPC_URL_ENV, "http://read:8545"),
            (UNKNOWN_NETWORK_POLICY_ENV, "maybe"),
        ])
        .is_err());
    }

    #[test]
    fn tls_paths_must_come_in_pairs() {
        assert!(load(&[
            (READ_RPC_URL_ENV, "http://read:8545"),
            (TLS_CERT_PATH_ENV, "/tmp/cert.pem"),
        ])
        .is_err());
    }
}
