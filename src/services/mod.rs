// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway services: cached balance reads, token lookups and server-signed
//! mints.

pub mod balance;
pub mod mint;
pub mod tokens;

#[cfg(test)]
pub(crate) mod testing;

pub use balance::BalanceQueryService;
pub use mint::{MintPhase, MintService, MintSettings, SignerLocks};
pub use tokens::{TokenQueryService, MAX_LISTED_TOKENS};
