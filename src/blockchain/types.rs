// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::signing::KeyMaterial;

/// Default gas limit for mint transactions.
pub const DEFAULT_MINT_GAS_LIMIT: u64 = 300_000;

/// Network identifier for the primary bundle.
pub const NETWORK_PRIMARY: &str = "primary";

/// Network identifier for the secondary bundle.
pub const NETWORK_SECONDARY: &str = "secondary";

/// Two-way network selector for mint requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    #[default]
    Primary,
    Secondary,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Primary => NETWORK_PRIMARY,
            Network::Secondary => NETWORK_SECONDARY,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            NETWORK_PRIMARY => Ok(Network::Primary),
            NETWORK_SECONDARY => Ok(Network::Secondary),
            other => Err(format!(
                "Unknown network `{other}`; expected `{NETWORK_PRIMARY}` or `{NETWORK_SECONDARY}`"
            )),
        }
    }
}

/// Everything needed to mint on one network.
///
/// Bundles are disjoint: each network has its own endpoint, contract and key.
#[derive(Debug, Clone)]
pub struct NetworkBundle {
    /// Which selector this bundle answers to
    pub network: Network,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// NFT contract exposing `safeMint(address,string)`
    pub contract_address: Address,
    /// Server-held signing key (redacted in Debug output)
    pub signing_key: KeyMaterial,
    /// Metadata URI passed to every mint
    pub token_uri: String,
}

/// Address-independent chain facts, shared by every balance query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSnapshot {
    /// Gas price in wei
    pub gas_price: u128,
    /// Latest block height
    pub block_number: u64,
}

/// One balance observation for an address.
///
/// Records are never merged: the next observation for the same address
/// replaces this one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    /// Observed address (checksummed on output)
    #[serde(with = "display_fromstr")]
    #[schema(value_type = String)]
    pub address: Address,
    /// Balance in wei, decimal string
    #[serde(with = "display_fromstr")]
    #[schema(value_type = String)]
    pub balance_wei: U256,
    /// Gas price at observation time, in wei
    pub gas_price: u128,
    /// Block height at observation time
    pub block_number: u64,
    /// When the gateway made the observation
    pub observed_at: DateTime<Utc>,
}

impl BalanceRecord {
    pub fn new(address: Address, balance_wei: U256, snapshot: ChainSnapshot) -> Self {
        Self {
            address,
            balance_wei,
            gas_price: snapshot.gas_price,
            block_number: snapshot.block_number,
            observed_at: Utc::now(),
        }
    }
}

/// Serde adapter storing a value through its `Display`/`FromStr` pair.
mod display_fromstr {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Composed answer for an address-state query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressState {
    /// Gas price in wei
    pub gas_price: u128,
    /// Latest block height
    pub block_number: u64,
    /// Balance in ether, exact decimal
    pub balance: String,
}

/// Outcome of a mint request. Always a value, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintResult {
    Success { tx_hash: String },
    Failure { reason: crate::error::GatewayError },
}

impl MintResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MintResult::Success { .. })
    }
}
