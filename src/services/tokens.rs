// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only queries against the NFT collection of each mint network.
//!
//! Lookups are not cached: ownership changes with every mint and transfer.

use std::sync::Arc;

use alloy::primitives::U256;

use crate::blockchain::{ChainClientError, ChainConnector, NftReader};
use crate::config::{NetworkBundles, UnknownNetworkPolicy};
use crate::error::GatewayError;
use crate::models::{OwnedTokens, TokenDetails, WalletAddress};

/// Upper bound on ids enumerated for one owner.
pub const MAX_LISTED_TOKENS: usize = 100;

/// Token ownership lookups through the collection's view functions.
pub struct TokenQueryService {
    bundles: NetworkBundles,
    connector: Arc<dyn ChainConnector>,
    policy: UnknownNetworkPolicy,
}

impl TokenQueryService {
    pub fn new(
        bundles: NetworkBundles,
        connector: Arc<dyn ChainConnector>,
        policy: UnknownNetworkPolicy,
    ) -> Self {
        Self {
            bundles,
            connector,
            policy,
        }
    }

    /// Owner and metadata URI of one token.
    pub async fn token_details(
        &self,
        token_id: &str,
        network: Option<&str>,
    ) -> Result<TokenDetails, GatewayError> {
        let id = parse_token_id(token_id)?;
        let bundle = self.bundles.resolve(network, self.policy)?;
        let client = self.connector.connect(&bundle.rpc_url)?;
        let nft = NftReader::new(client.as_ref(), bundle.contract_address);

        let owner = nft.owner_of(id).await.map_err(|e| match e {
            ChainClientError::Reverted(_) => GatewayError::TokenNotFound(id.to_string()),
            other => GatewayError::from(other),
        })?;
        let token_uri = nft.token_uri(id).await?;

        tracing::debug!(token_id = %id, %owner, network = %bundle.network, "Token details read");
        Ok(TokenDetails {
            token_id: id.to_string(),
            owner: owner.to_checksum(None),
            token_uri,
        })
    }

    /// Token ids held by `owner`, at most [`MAX_LISTED_TOKENS`] of them.
    pub async fn tokens_of(
        &self,
        owner: &str,
        network: Option<&str>,
    ) -> Result<OwnedTokens, GatewayError> {
        let holder = WalletAddress::from(owner).parse()?;
        let bundle = self.bundles.resolve(network, self.policy)?;
        let client = self.connector.connect(&bundle.rpc_url)?;
        let nft = NftReader::new(client.as_ref(), bundle.contract_address);

        let balance = nft.balance_of(holder).await?;
        let listed = usize::try_from(balance)
            .unwrap_or(usize::MAX)
            .min(MAX_LISTED_TOKENS);

        let mut tokens = Vec::with_capacity(listed);
        for index in 0..listed {
            let id = nft
                .token_of_owner_by_index(holder, U256::from(index))
                .await?;
            tokens.push(id.to_string());
        }

        let truncated = U256::from(tokens.len()) < balance;
        if truncated {
            tracing::debug!(owner = %holder, %balance, "Owned token list truncated");
        }
        Ok(OwnedTokens {
            owner: holder.to_checksum(None),
            balance: balance.to_string(),
            tokens,
            truncated,
        })
    }
}

/// Token ids are unsigned decimal integers that fit in 256 bits.
fn parse_token_id(raw: &str) -> Result<U256, GatewayError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GatewayError::InvalidTokenId(format!("not a decimal integer: {raw}")));
    }
    U256::from_str_radix(raw, 10).map_err(|e| GatewayError::InvalidTokenId(e.to_string()))
}
