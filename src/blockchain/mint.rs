// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT mint transaction building and offline signing.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    network::TxSignerSync,
    primitives::{Address, Bytes, TxKind, U256},
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};

use super::client::ChainClientError;
use super::nft::INftCollection;

/// Inputs for one mint transaction, fetched fresh right before signing.
#[derive(Debug, Clone)]
pub struct MintTx {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub contract: Address,
    pub to: Address,
    pub token_uri: String,
}

impl MintTx {
    /// ABI-encoded `safeMint(to, uri)` calldata.
    pub fn calldata(&self) -> Bytes {
        INftCollection::safeMintCall {
            to: self.to,
            uri: self.token_uri.clone(),
        }
        .abi_encode()
        .into()
    }

    /// Unsigned EIP-155 legacy transaction.
    pub fn build(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.contract),
            value: U256::ZERO,
            input: self.calldata(),
        }
    }

    /// Build, sign and EIP-2718 encode the transaction.
    pub fn sign(&self, signer: &PrivateKeySigner) -> Result<Vec<u8>, ChainClientError> {
        let mut tx = self.build();
        let signature = signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| ChainClientError::Signing(e.to_string()))?;

        let envelope: TxEnvelope = tx.into_signed(signature).into();
        Ok(envelope.encoded_2718())
    }
}
