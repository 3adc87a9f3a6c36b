// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain Gateway - EVM read/mint gateway
//!
//! Answers address-state queries (gas price, block height, ether balance)
//! through a two-tier in-process cache, records every fresh observation in an
//! embedded ledger, and mints NFTs with server-held keys on one of two
//! configured networks.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - JSON-RPC client, mint transactions, unit conversion
//! - `services` - Balance query and mint services
//! - `storage` - Tiered TTL cache and redb balance ledger

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod sweeper;
