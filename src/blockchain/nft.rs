// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT collection interface and read-only queries.
//!
//! Reads go through [`ChainClient::call`] rather than a provider-bound
//! contract instance, so they share the client's per-call timeout.

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::SolCall,
};

use super::client::{ChainClient, ChainClientError};

sol! {
    /// ERC-721 enumerable collection with an owner-only mint entry point.
    interface INftCollection {
        function safeMint(address to, string uri) external;
        function ownerOf(uint256 tokenId) external view returns (address);
        function tokenURI(uint256 tokenId) external view returns (string);
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
    }
}

/// NFT collection wrapper over a chain client.
pub struct NftReader<'a> {
    client: &'a dyn ChainClient,
    contract: Address,
}

impl<'a> NftReader<'a> {
    pub fn new(client: &'a dyn ChainClient, contract: Address) -> Self {
        Self { client, contract }
    }

    /// Run one view call and decode its return value.
    async fn view<C: SolCall>(&self, call: C) -> Result<C::Return, ChainClientError> {
        let output = self
            .client
            .call(self.contract, call.abi_encode().into())
            .await?;
        C::abi_decode_returns(&output).map_err(|e| ChainClientError::Decode(e.to_string()))
    }

    /// Current owner of a token. Reverts for tokens that were never minted.
    pub async fn owner_of(&self, token_id: U256) -> Result<Address, ChainClientError> {
        self.view(INftCollection::ownerOfCall { tokenId: token_id })
            .await
    }

    /// Metadata URI of a token.
    pub async fn token_uri(&self, token_id: U256) -> Result<String, ChainClientError> {
        self.view(INftCollection::tokenURICall { tokenId: token_id })
            .await
    }

    /// Number of tokens held by `owner`.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainClientError> {
        self.view(INftCollection::balanceOfCall { owner }).await
    }

    /// Token held by `owner` at position `index` of its enumeration.
    pub async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> Result<U256, ChainClientError> {
        self.view(INftCollection::tokenOfOwnerByIndexCall { owner, index })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::MockChain;

    fn contract() -> Address {
        Address::repeat_byte(0x11)
    }

    #[tokio::test]
    async fn reads_minted_tokens() {
        let chain = MockChain::new(1, 1, U256::ZERO);
        let alice = Address::repeat_byte(0xA1);
        let bob = Address::repeat_byte(0xB0);
        chain.seed_token(alice, "ipfs://0");
        chain.seed_token(bob, "ipfs://1");
        chain.seed_token(alice, "ipfs://2");

        let nft = NftReader::new(&chain, contract());
        assert_eq!(nft.owner_of(U256::from(1)).await.unwrap(), bob);
        assert_eq!(nft.token_uri(U256::from(2)).await.unwrap(), "ipfs://2");
        assert_eq!(nft.balance_of(alice).await.unwrap(), U256::from(2));
        assert_eq!(
            nft.token_of_owner_by_index(alice, U256::from(1)).await.unwrap(),
            U256::from(2)
        );
    }

    #[tokio::test]
    async fn unknown_token_reverts() {
        let chain = MockChain::new(1, 1, U256::ZERO);
        let nft = NftReader::new(&chain, contract());

        let err = nft.owner_of(U256::from(7)).await.unwrap_err();
        assert!(matches!(err, ChainClientError::Reverted(_)));
    }

    #[tokio::test]
    async fn garbage_return_data_is_a_decode_error() {
        let chain = MockChain::new(1, 1, U256::ZERO);
        chain.set_call_output(Some(vec![0xde, 0xad]));
        let nft = NftReader::new(&chain, contract());

        let err = nft.balance_of(Address::ZERO).await.unwrap_err();
        assert!(matches!(err, ChainClientError::Decode(_)));
    }
}
