// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps caller-supplied Ethereum-style
//! addresses (0x-prefixed, 40 hex characters) until they are validated into
//! an [`Address`] with [`WalletAddress::parse`].

use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::GatewayError;

/// Length of a textual address: `0x` + 40 hex characters.
pub const ADDRESS_LEN: usize = 42;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address as received from a caller.
///
/// # Example
///
/// ```rust,ignore
/// let addr = WalletAddress::from("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12").parse()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Validate the textual form: exactly 42 characters, `0x` prefix, hex body.
    ///
    /// Mixed-case input is accepted without enforcing the EIP-55 checksum.
    pub fn parse(&self) -> Result<Address, GatewayError> {
        let raw = self.0.as_str();
        if raw.len() != ADDRESS_LEN {
            return Err(GatewayError::InvalidAddress(format!(
                "expected {ADDRESS_LEN} characters, got {}",
                raw.len()
            )));
        }
        let body = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| GatewayError::InvalidAddress("missing 0x prefix".to_string()))?;
        if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(GatewayError::InvalidAddress(format!("non-hex characters in {raw}")));
        }
        Address::from_str(body).map_err(|e| GatewayError::InvalidAddress(e.to_string()))
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

// =============================================================================
// Address State Models
// =============================================================================

/// Query string of `GET /v1/eth-info`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct EthInfoQuery {
    /// 0x-prefixed address, 42 characters
    pub address: String,
}

/// Response of `GET /v1/wallet/{address}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfoResponse {
    /// Address as supplied by the caller
    pub address: String,
    /// Balance in ether, exact decimal
    pub balance: String,
    /// Latest block height
    pub block_number: u64,
    /// Gas price in wei
    pub gas_price: u128,
}

// =============================================================================
// Mint Models
// =============================================================================

/// Body of `POST /v1/mint`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    /// Recipient of the new token
    pub to_address: String,
    /// `primary` (default) or `secondary`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

/// Successful mint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintResponse {
    /// Hash of the broadcast transaction
    pub tx_hash: String,
}

// =============================================================================
// Token Models
// =============================================================================

/// Optional network selector for token reads.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct NetworkQuery {
    /// `primary` (default) or `secondary`
    pub network: Option<String>,
}

/// Response of `GET /v1/tokens/{token_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    /// Decimal token id
    pub token_id: String,
    /// Current holder
    pub owner: String,
    /// Metadata URI set at mint time
    pub token_uri: String,
}

/// Response of `GET /v1/tokens/owner/{address}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedTokens {
    pub owner: String,
    /// Number of tokens held, as reported by the collection
    pub balance: String,
    /// Decimal token ids in enumeration order
    pub tokens: Vec<String>,
    /// Set when `balance` exceeds the number of listed ids
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_valid_address() {
        let addr = WalletAddress::from("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12")
            .parse()
            .unwrap();
        assert_eq!(
            format!("{addr:#x}"),
            "0x742d35cc6634c0532925a3b844bc9e7595f4ab12"
        );
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = WalletAddress::from("0x742d35Cc").parse().unwrap_err();
        assert_eq!(err.code(), "InvalidAddress");

        let long = format!("0x{}", "a".repeat(41));
        assert!(WalletAddress::from(long).parse().is_err());
    }

    #[test]
    fn parse_rejects_missing_prefix_and_non_hex() {
        let no_prefix = "a".repeat(42);
        assert!(WalletAddress::from(no_prefix).parse().is_err());

        let non_hex = format!("0x{}", "g".repeat(40));
        assert!(WalletAddress::from(non_hex).parse().is_err());
    }

    #[test]
    fn mint_request_network_is_optional() {
        let req: MintRequest =
            serde_json::from_str(r#"{"toAddress":"0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"}"#)
                .unwrap();
        assert!(req.network.is_none());

        let req: MintRequest = serde_json::from_str(
            r#"{"toAddress":"0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12","network":"secondary"}"#,
        )
        .unwrap();
        assert_eq!(req.network.as_deref(), Some("secondary"));
    }
}
