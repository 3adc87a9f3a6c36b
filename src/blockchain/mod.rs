// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for EVM networks.
//!
//! This module provides functionality for:
//! - Querying gas price, block height, balances and nonces
//! - Building and signing NFT mint transactions offline
//! - Broadcasting signed transactions
//! - Reading token ownership from the NFT collection
//! - Exact wei/ether conversion

pub mod client;
pub mod mint;
pub mod nft;
pub mod signing;
pub mod types;
pub mod units;

pub use client::{ChainClient, ChainClientError, ChainConnector, RpcChainClient, RpcConnector};
pub use nft::NftReader;
pub use signing::KeyMaterial;
pub use types::*;
pub use units::{format_ether, parse_ether};
